//! Chime reconciliation service.
//!
//! # Responsibility
//! - Translate hour/day toggles into the minimal set of schedule and
//!   cancel calls against the notification scheduler.
//! - Persist the resulting snapshot once per operation, after every
//!   scheduler call for that operation has been attempted.
//!
//! # Invariants
//! - Scheduler calls never short-circuit each other: one failure leaves
//!   the remaining calls attempted.
//! - The snapshot only records identifiers confirmed by `schedule`;
//!   entries are removed whenever `cancel` was attempted, regardless of
//!   its outcome.
//! - Per-call scheduler failures and store write failures never escape
//!   as errors; callers read them from the returned outcome.

use crate::model::chime::{
    ensure_day, ensure_hour, ChimeValidationError, DaySet, ScheduleId, ScheduleSnapshot,
};
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::scheduler::{ChimeRequest, NotificationScheduler, SchedulerError};
use crate::store::KeyValueStore;
use log::{debug, error, info, warn};
use std::time::Instant;

/// Which scheduler call a reconcile failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleAction {
    Schedule,
    Cancel,
}

/// One captured per-(hour, day) scheduler failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileFailure {
    pub hour: u8,
    pub day: u8,
    pub action: ScheduleAction,
    pub error: SchedulerError,
}

/// Authoritative result of one reconciliation operation.
///
/// The embedded snapshot reflects exactly the successfully completed
/// subset of scheduler calls; presentation layers render it as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub snapshot: ScheduleSnapshot,
    /// Successful `schedule` calls.
    pub scheduled: usize,
    /// Attempted `cancel` calls (optimistic removal counts attempts).
    pub cancelled: usize,
    pub failures: Vec<ReconcileFailure>,
    /// Whether the final snapshot write reached the store.
    pub persisted: bool,
}

/// Reconciler owning the snapshot for the duration of each operation.
///
/// Operations take `&mut self`, so two reconciliations can never run
/// concurrently on the same snapshot.
pub struct ChimeService<S: NotificationScheduler, K: KeyValueStore> {
    scheduler: S,
    repo: SnapshotRepository<K>,
    snapshot: ScheduleSnapshot,
}

struct OpStats {
    scheduled: usize,
    cancelled: usize,
    failures: Vec<ReconcileFailure>,
}

impl OpStats {
    fn new() -> Self {
        Self {
            scheduled: 0,
            cancelled: 0,
            failures: Vec::new(),
        }
    }
}

impl<S: NotificationScheduler, K: KeyValueStore> ChimeService<S, K> {
    /// Restores the persisted snapshot (or the initial one) and takes
    /// ownership of the scheduler and store.
    pub fn load(scheduler: S, store: K) -> Self {
        let repo = SnapshotRepository::new(store);
        let snapshot = repo.load_or_initial();
        Self {
            scheduler,
            repo,
            snapshot,
        }
    }

    /// Current in-memory snapshot, the source of truth between writes.
    pub fn snapshot(&self) -> &ScheduleSnapshot {
        &self.snapshot
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Toggles one hour slot on or off.
    ///
    /// Enabling schedules one notification per day in the current day
    /// set, recording only confirmed identifiers. Disabling cancels every
    /// entry best-effort and clears the slot either way.
    ///
    /// # Errors
    /// - `HourOutOfRange` for hours above 23. Scheduler and store
    ///   failures are captured in the outcome instead.
    pub fn toggle_hour(&mut self, hour: u8) -> Result<ReconcileOutcome, ChimeValidationError> {
        ensure_hour(hour)?;
        let started_at = Instant::now();
        let enabling = !self.snapshot.slot(hour)?.enabled;
        let mut stats = OpStats::new();

        if enabling {
            let days: Vec<u8> = self.snapshot.days().iter().collect();
            for day in days {
                self.schedule_entry(hour, day, &mut stats)?;
            }
        } else {
            let entries: Vec<(u8, ScheduleId)> = self
                .snapshot
                .slot(hour)?
                .identifiers
                .iter()
                .map(|(day, id)| (*day, id.clone()))
                .collect();
            for (day, identifier) in entries {
                self.cancel_entry(hour, day, &identifier, &mut stats)?;
            }
        }

        let persisted = self.persist("toggle_hour");
        info!(
            "event=toggle_hour module=service status=ok hour={hour} enabling={enabling} \
             scheduled={} cancelled={} failed={} persisted={persisted} duration_ms={}",
            stats.scheduled,
            stats.cancelled,
            stats.failures.len(),
            started_at.elapsed().as_millis()
        );
        Ok(self.outcome(stats, persisted))
    }

    /// Flips one weekday in the day set and reconciles every enabled
    /// slot against the new selection.
    ///
    /// # Errors
    /// - `DayOutOfRange` for days above 6.
    pub fn toggle_day(&mut self, day: u8) -> Result<ReconcileOutcome, ChimeValidationError> {
        ensure_day(day)?;
        let days = self.snapshot.days().toggled(day)?;
        self.set_days(days)
    }

    /// Replaces the day set and reconciles every enabled slot with a
    /// full diff: entries for days outside the new set are cancelled and
    /// removed, missing entries for new-set days are scheduled and added.
    /// Disabled slots hold no entries and are untouched. Re-applying the
    /// current day set issues zero scheduler calls.
    pub fn set_days(&mut self, days: DaySet) -> Result<ReconcileOutcome, ChimeValidationError> {
        let started_at = Instant::now();
        let mut stats = OpStats::new();

        self.snapshot.set_days(days);
        for hour in self.snapshot.enabled_hours() {
            // Full diff against the slot's actual entries, not against the
            // previous day set, so externally drifted state also converges.
            let stale: Vec<(u8, ScheduleId)> = self
                .snapshot
                .slot(hour)?
                .identifiers
                .iter()
                .filter(|(day, _)| !days.contains(**day))
                .map(|(day, id)| (*day, id.clone()))
                .collect();
            for (day, identifier) in stale {
                self.cancel_entry(hour, day, &identifier, &mut stats)?;
            }

            let missing: Vec<u8> = {
                let slot = self.snapshot.slot(hour)?;
                days.iter()
                    .filter(|day| !slot.identifiers.contains_key(day))
                    .collect()
            };
            for day in missing {
                self.schedule_entry(hour, day, &mut stats)?;
            }
        }

        let persisted = self.persist("set_days");
        info!(
            "event=set_days module=service status=ok days={} scheduled={} cancelled={} \
             failed={} persisted={persisted} duration_ms={}",
            days.len(),
            stats.scheduled,
            stats.cancelled,
            stats.failures.len(),
            started_at.elapsed().as_millis()
        );
        Ok(self.outcome(stats, persisted))
    }

    fn schedule_entry(
        &mut self,
        hour: u8,
        day: u8,
        stats: &mut OpStats,
    ) -> Result<(), ChimeValidationError> {
        let request = ChimeRequest::weekly(hour, day);
        match self.scheduler.schedule(&request) {
            Ok(identifier) => {
                self.snapshot.record_schedule(hour, day, identifier)?;
                stats.scheduled += 1;
            }
            Err(err) => {
                error!(
                    "event=schedule_call module=service status=error hour={hour} day={day} error={err}"
                );
                stats.failures.push(ReconcileFailure {
                    hour,
                    day,
                    action: ScheduleAction::Schedule,
                    error: err,
                });
            }
        }
        Ok(())
    }

    fn cancel_entry(
        &mut self,
        hour: u8,
        day: u8,
        identifier: &str,
        stats: &mut OpStats,
    ) -> Result<(), ChimeValidationError> {
        match self.scheduler.cancel(identifier) {
            Ok(()) => {}
            Err(SchedulerError::UnknownIdentifier(_)) => {
                debug!(
                    "event=cancel_call module=service status=already_cancelled hour={hour} day={day}"
                );
            }
            Err(err) => {
                warn!(
                    "event=cancel_call module=service status=error hour={hour} day={day} error={err}"
                );
                stats.failures.push(ReconcileFailure {
                    hour,
                    day,
                    action: ScheduleAction::Cancel,
                    error: err,
                });
            }
        }
        // Optimistic removal: a failed cancel may leave a stale OS-side
        // schedule, but never a stuck-enabled slot.
        self.snapshot.clear_schedule(hour, day)?;
        stats.cancelled += 1;
        Ok(())
    }

    fn persist(&mut self, op: &str) -> bool {
        match self.repo.save(&self.snapshot) {
            Ok(()) => true,
            Err(err) => {
                // In-memory state stays the source of truth until the next
                // successful write; no retry loop here.
                error!("event=snapshot_persist module=service status=error op={op} error={err}");
                false
            }
        }
    }

    fn outcome(&self, stats: OpStats, persisted: bool) -> ReconcileOutcome {
        ReconcileOutcome {
            snapshot: self.snapshot.clone(),
            scheduled: stats.scheduled,
            cancelled: stats.cancelled,
            failures: stats.failures,
            persisted,
        }
    }
}
