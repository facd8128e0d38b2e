//! Snapshot persistence over the key-value store.
//!
//! # Responsibility
//! - Persist and restore the full `ScheduleSnapshot` under the `chimes`
//!   and `days` storage keys.
//! - Enforce the strict load-or-initialize rule: a stored snapshot is
//!   used verbatim only when it decodes and validates; anything else
//!   yields `ScheduleSnapshot::initial()`.
//!
//! # Invariants
//! - `save` writes the whole snapshot; there is no partial write path.
//! - `load_or_initial` never fails; fallback reasons are logged.

use crate::model::chime::{ChimeSlot, ChimeValidationError, DaySet, ScheduleSnapshot};
use crate::store::{KeyValueStore, StoreError, StoreResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized array of 24 chime slots.
pub const CHIME_STORAGE_KEY: &str = "chimes";

/// Storage key holding the serialized weekday selection.
pub const DAYS_STORAGE_KEY: &str = "days";

/// Reason a stored snapshot was not usable. Load paths log this and fall
/// back to the initial snapshot rather than propagating it.
#[derive(Debug)]
pub enum SnapshotLoadError {
    Missing(&'static str),
    Store(StoreError),
    Decode(serde_json::Error),
    Invalid(ChimeValidationError),
}

impl Display for SnapshotLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "storage key `{key}` is absent"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "stored snapshot is not valid JSON: {err}"),
            Self::Invalid(err) => write!(f, "stored snapshot is inconsistent: {err}"),
        }
    }
}

impl Error for SnapshotLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Missing(_) => None,
            Self::Store(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<StoreError> for SnapshotLoadError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<serde_json::Error> for SnapshotLoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

impl From<ChimeValidationError> for SnapshotLoadError {
    fn from(value: ChimeValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Persistence gateway for the schedule snapshot.
pub struct SnapshotRepository<K: KeyValueStore> {
    store: K,
}

impl<K: KeyValueStore> SnapshotRepository<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// Releases the underlying store.
    pub fn into_store(self) -> K {
        self.store
    }

    /// Restores the persisted snapshot, or returns the canonical initial
    /// snapshot when nothing usable is stored.
    pub fn load_or_initial(&self) -> ScheduleSnapshot {
        match self.try_load() {
            Ok(snapshot) => {
                info!(
                    "event=snapshot_load module=repo status=ok enabled_hours={} days={}",
                    snapshot.enabled_hours().len(),
                    snapshot.days().len()
                );
                snapshot
            }
            Err(SnapshotLoadError::Missing(key)) => {
                info!("event=snapshot_load module=repo status=initial missing_key={key}");
                ScheduleSnapshot::initial()
            }
            Err(err) => {
                warn!("event=snapshot_load module=repo status=fallback error={err}");
                ScheduleSnapshot::initial()
            }
        }
    }

    /// Attempts a strict load of both storage keys.
    pub fn try_load(&self) -> Result<ScheduleSnapshot, SnapshotLoadError> {
        let chimes_json = self
            .store
            .get(CHIME_STORAGE_KEY)?
            .ok_or(SnapshotLoadError::Missing(CHIME_STORAGE_KEY))?;
        let days_json = self
            .store
            .get(DAYS_STORAGE_KEY)?
            .ok_or(SnapshotLoadError::Missing(DAYS_STORAGE_KEY))?;

        let slots: Vec<ChimeSlot> = serde_json::from_str(&chimes_json)?;
        let days: DaySet = serde_json::from_str(&days_json)?;

        Ok(ScheduleSnapshot::from_parts(slots, days)?)
    }

    /// Writes the full snapshot under both storage keys.
    ///
    /// Serialization of in-memory state cannot fail; store write errors
    /// are returned for the caller to report.
    pub fn save(&mut self, snapshot: &ScheduleSnapshot) -> StoreResult<()> {
        let chimes_json = serde_json::to_string(snapshot.slots())
            .map_err(|err| StoreError::WriteFailed(err.to_string()))?;
        let days_json = serde_json::to_string(&snapshot.days())
            .map_err(|err| StoreError::WriteFailed(err.to_string()))?;

        self.store.set(CHIME_STORAGE_KEY, &chimes_json)?;
        self.store.set(DAYS_STORAGE_KEY, &days_json)?;
        Ok(())
    }
}
