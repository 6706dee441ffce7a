//! Tag-invalidated query cache.
//!
//! Reads are identified by [`QueryKey`] and provide [`CacheTag`]s; writes are
//! described by [`Mutation`] and invalidate tags through one explicit graph.

mod graph;
mod query;
mod scope;
mod store;
mod tag;

pub use self::graph::Mutation;
pub use self::query::{QueryData, QueryKey, QueryPayload};
pub use self::scope::ViewScope;
pub(crate) use self::store::{FetchOutcome, Probe};
pub use self::store::{QueryCache, QuerySnapshot, QueryStatus, QuerySubscription};
pub use self::tag::{CacheTag, EntityKind, TagScope};
