//! Run-scoped execution state for the workflow canvas.
//!
//! Holds the single source of truth both visualization views read: the
//! per-node status map and the append-only run log. Updates arrive
//! through the [`RunFeed`] broadcast channel and are applied by one
//! ingest task; everything else is a read-only consumer.

mod backend;
mod controller;
mod feed;
mod store;

pub use backend::{ExecutionBackend, ScriptedBackend};
pub use controller::RunController;
pub use feed::{spawn_ingest, RunFeed, SharedStore};
pub use store::ExecutionStateStore;
