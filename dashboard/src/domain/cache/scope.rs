//! Lifetime of a consuming view.
//!
//! Reads started through [`ViewScope::run`] are aborted when the scope is
//! closed or dropped. An aborted read never writes into the cache: its
//! in-flight guard is dropped and the entry returns to its previous state.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use futures_util::future::{AbortHandle, Abortable};
use tracing::debug;

use crate::domain::Error;

/// Cancellation handle tied to one view.
///
/// # Examples
/// ```
/// use dashboard::domain::{ErrorCode, ViewScope};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let scope = ViewScope::new("regions");
/// scope.close();
/// let err = scope.run(async { Ok::<_, dashboard::domain::Error>(1) }).await.unwrap_err();
/// assert_eq!(err.code(), ErrorCode::Cancelled);
/// # });
/// ```
#[derive(Debug)]
pub struct ViewScope {
    name: String,
    handles: Mutex<Vec<AbortHandle>>,
    closed: AtomicBool,
}

impl ViewScope {
    /// Open a scope for the named view.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handles: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// View name used in log fields.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the scope was closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Bind `future` to this scope.
    ///
    /// The returned future does not borrow the scope, so the scope may be
    /// closed or dropped while it is pending. A future bound to a closed
    /// scope resolves to a cancelled error without being polled.
    pub fn run<F, T>(&self, future: F) -> impl Future<Output = Result<T, Error>> + use<F, T>
    where
        F: Future<Output = Result<T, Error>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        {
            let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
            handles.retain(|existing| !existing.is_aborted());
            handles.push(handle.clone());
        }
        if self.is_closed() {
            handle.abort();
        }
        let view = self.name.clone();
        let bound = Abortable::new(future, registration);
        async move {
            match bound.await {
                Ok(result) => result,
                Err(_aborted) => {
                    debug!(view = %view, "view closed before request settled");
                    Err(Error::cancelled(format!("{view} closed before the request settled")))
                }
            }
        }
    }

    /// Abort every pending read bound to this scope.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let handles = std::mem::take(
            &mut *self.handles.lock().unwrap_or_else(PoisonError::into_inner),
        );
        debug!(view = %self.name, pending = handles.len(), "closing view scope");
        for handle in handles {
            handle.abort();
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.close();
    }
}
