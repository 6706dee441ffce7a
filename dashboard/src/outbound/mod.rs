//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest client for the dashboard REST API
//! - **session_file**: JSON session file written through `cap_std`
//!
//! Adapters are thin translators between domain types and wire or storage
//! representations. They contain no business logic.

pub mod http;
pub mod session_file;

pub use http::HttpApiClient;
pub use session_file::FileSessionStore;
