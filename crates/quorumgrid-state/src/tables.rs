//! redb table definitions for the QuorumGrid object store.
//!
//! Each table uses `&str` keys and `&[u8]` values (JSON-serialized domain types).
//! Composite keys follow the pattern `{namespace}/{name}` or `{cluster_key}:{seq}`.

use redb::TableDefinition;

/// Replica-set objects keyed by `{namespace}/{name}`.
pub const REPLICA_SETS: TableDefinition<&str, &[u8]> = TableDefinition::new("replica_sets");

/// Storage claims keyed by `{namespace}/{name}`.
pub const CLAIMS: TableDefinition<&str, &[u8]> = TableDefinition::new("claims");

/// One-shot jobs keyed by `{namespace}/{name}`.
pub const JOBS: TableDefinition<&str, &[u8]> = TableDefinition::new("jobs");

/// Recorded events keyed by `{cluster_key}:{seq}` (seq zero-padded for ordering).
pub const EVENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("events");
