//! quorumgrid-state — embedded object store for QuorumGrid.
//!
//! Backed by [redb](https://docs.rs/redb), holds the persisted objects
//! the scaling controller operates on: replica sets, storage claims,
//! one-shot jobs, and recorded events.
//!
//! # Architecture
//!
//! All domain types are JSON-serialized into redb's `&[u8]` value
//! columns. Composite keys (`{namespace}/{name}`, `{cluster_key}:{seq}`)
//! enable efficient prefix scans for related records.
//!
//! Replica sets and storage claims carry a `resource_version` that the
//! store checks on update, so concurrent writers surface as
//! `StateError::Conflict` instead of silently clobbering each other.
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` (backed by
//! `Arc<Database>`) and can be shared across worker threads.

pub mod error;
pub mod store;
pub mod tables;
pub mod testing;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::StateStore;
pub use types::*;
