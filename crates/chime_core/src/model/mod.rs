//! Schedule set model for hourly chimes.
//!
//! # Responsibility
//! - Define the canonical in-memory shape of the 24 chime slots and the
//!   shared weekday selection.
//! - Provide pure query/update primitives with no I/O.
//!
//! # Invariants
//! - A slot is `enabled` exactly when it holds at least one live
//!   (day, identifier) entry.
//! - Slot identity is the hour; hours are unique and cover 0..=23.

pub mod chime;
