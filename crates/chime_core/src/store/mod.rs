//! Persistent key-value store contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the string key-value interface the snapshot repository
//!   persists through.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - `get` of an absent key is `Ok(None)`, never an error.
//! - `set` replaces any existing value for the key.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite;

pub use sqlite::SqliteKeyValueStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a single store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    ReadFailed(String),
    WriteFailed(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed(reason) => write!(f, "store read failed: {reason}"),
            Self::WriteFailed(reason) => write!(f, "store write failed: {reason}"),
        }
    }
}

impl Error for StoreError {}

/// String key-value storage used for snapshot persistence.
///
/// Mirrors the two-method surface of a mobile key-value store; both
/// operations are independently fallible.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
}
