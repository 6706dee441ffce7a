//! Shared harness for dashboard behaviour tests.
//!
//! Each scenario drives a [`Dashboard`] over an [`InMemoryBackend`] from
//! synchronous step functions by blocking on a dedicated Tokio runtime.
#![allow(dead_code, reason = "each test binary uses a subset of these helpers")]

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use dashboard::domain::ports::SessionStore;
use dashboard::domain::{Dashboard, EntityId};
use dashboard::test_support::InMemoryBackend;
use tokio::runtime::Runtime;

/// Runtime, backend double and service shared by the steps of one scenario.
#[derive(Clone)]
pub struct Harness {
    runtime: Arc<Runtime>,
    pub backend: Arc<InMemoryBackend>,
    pub dashboard: Dashboard<InMemoryBackend>,
}

impl Harness {
    /// Harness without session persistence.
    pub fn new() -> Self {
        let backend = Arc::new(InMemoryBackend::new());
        let dashboard = Dashboard::new(Arc::clone(&backend));
        Self {
            runtime: Arc::new(Runtime::new().expect("create runtime")),
            backend,
            dashboard,
        }
    }

    /// Harness persisting sessions through `store`.
    pub fn with_session_store(store: Arc<dyn SessionStore>) -> Self {
        let harness = Self::new();
        let dashboard = harness.dashboard.clone().with_session_store(store);
        Self {
            dashboard,
            ..harness
        }
    }

    /// Drive `future` to completion on the scenario runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Names given to seeded records in feature files, mapped to their ids.
pub type Names = BTreeMap<String, EntityId>;

/// Look up a seeded record by its feature-file name.
pub fn named(names: &Names, name: &str) -> EntityId {
    names
        .get(name)
        .cloned()
        .unwrap_or_else(|| panic!("{name} was not seeded"))
}
