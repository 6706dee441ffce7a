//! Dashboard data layer library modules.
//!
//! The [`domain`] module holds records, validation, the query cache, view
//! state and the [`domain::Dashboard`] service. [`outbound`] adapts the
//! backend's REST API and local session storage to the domain ports.

pub mod domain;
pub mod outbound;
pub mod settings;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use settings::DashboardSettings;
