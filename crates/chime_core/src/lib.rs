//! Core reconciliation engine for hourly chime notifications.
//!
//! Guarantees that exactly one recurring notification exists for each
//! selected (hour, weekday) pair — no duplicates, no orphans — across
//! toggles, day-set edits, restarts, and partial scheduler failures.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod scheduler;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::chime::{
    ensure_day, ensure_hour, format_time_12h, ChimeSlot, ChimeValidationError, DaySet, ScheduleId,
    ScheduleSnapshot, DAYS_PER_WEEK, HOURS_PER_DAY,
};
pub use repo::snapshot_repo::{
    SnapshotLoadError, SnapshotRepository, CHIME_STORAGE_KEY, DAYS_STORAGE_KEY,
};
pub use scheduler::{
    ChimeRequest, MemoryScheduler, NotificationScheduler, Recurrence, SchedulerError,
};
pub use service::chime_service::{
    ChimeService, ReconcileFailure, ReconcileOutcome, ScheduleAction,
};
pub use store::{KeyValueStore, SqliteKeyValueStore, StoreError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
