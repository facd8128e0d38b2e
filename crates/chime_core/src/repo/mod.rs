//! Repository layer: snapshot persistence over the key-value store.
//!
//! # Responsibility
//! - Translate the schedule snapshot to and from its persisted JSON
//!   layout.
//! - Isolate storage keys and wire details from the reconciler.
//!
//! # Invariants
//! - Load paths reject inconsistent persisted state and fall back to the
//!   canonical initial snapshot; no partial merging.

pub mod snapshot_repo;
