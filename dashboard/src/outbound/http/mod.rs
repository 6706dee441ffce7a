//! Dashboard REST API outbound adapter.
//!
//! This module provides a thin HTTP implementation of every backend API port.

mod client;
mod dto;

pub use client::HttpApiClient;
