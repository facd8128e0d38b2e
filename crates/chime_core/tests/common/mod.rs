//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use chime_core::{
    ChimeRequest, KeyValueStore, NotificationScheduler, ScheduleId, SchedulerError, StoreError,
};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// One recorded scheduler call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Schedule { hour: u8, weekday: Option<u8> },
    Cancel { identifier: ScheduleId },
}

/// Scheduler double recording every call, with scriptable per-(hour, day)
/// schedule failures and forced cancel failures.
///
/// Identifiers carry a per-instance nonce: a fresh double standing in
/// for a restarted scheduler must never re-issue an identifier that an
/// earlier instance put into a persisted snapshot.
#[derive(Debug)]
pub struct ScriptedScheduler {
    nonce: Uuid,
    next_id: u32,
    calls: Vec<Call>,
    live: BTreeSet<ScheduleId>,
    failing_schedules: BTreeSet<(u8, u8)>,
    failing_cancels: bool,
}

impl Default for ScriptedScheduler {
    fn default() -> Self {
        Self {
            nonce: Uuid::new_v4(),
            next_id: 0,
            calls: Vec::new(),
            live: BTreeSet::new(),
            failing_schedules: BTreeSet::new(),
            failing_cancels: false,
        }
    }
}

impl ScriptedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `schedule` fail for one (hour, weekday) pair.
    pub fn fail_schedule_for(mut self, hour: u8, weekday: u8) -> Self {
        self.failing_schedules.insert((hour, weekday));
        self
    }

    /// Makes every `cancel` fail while leaving the schedule live.
    pub fn fail_cancels(mut self) -> Self {
        self.failing_cancels = true;
        self
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn schedule_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Schedule { .. }))
            .count()
    }

    pub fn cancel_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Cancel { .. }))
            .count()
    }

    pub fn live(&self) -> &BTreeSet<ScheduleId> {
        &self.live
    }
}

impl NotificationScheduler for ScriptedScheduler {
    fn schedule(&mut self, request: &ChimeRequest) -> Result<ScheduleId, SchedulerError> {
        self.calls.push(Call::Schedule {
            hour: request.hour,
            weekday: request.weekday,
        });
        if let Some(weekday) = request.weekday {
            if self.failing_schedules.contains(&(request.hour, weekday)) {
                return Err(SchedulerError::CallFailed(format!(
                    "scripted failure for hour {} day {weekday}",
                    request.hour
                )));
            }
        }
        self.next_id += 1;
        let identifier = format!("sched-{}-{}", self.nonce.simple(), self.next_id);
        self.live.insert(identifier.clone());
        Ok(identifier)
    }

    fn cancel(&mut self, identifier: &str) -> Result<(), SchedulerError> {
        self.calls.push(Call::Cancel {
            identifier: identifier.to_string(),
        });
        if !self.live.contains(identifier) {
            return Err(SchedulerError::UnknownIdentifier(identifier.to_string()));
        }
        if self.failing_cancels {
            return Err(SchedulerError::CallFailed(
                "scripted cancel failure".to_string(),
            ));
        }
        self.live.remove(identifier);
        Ok(())
    }
}

/// Store whose writes always fail; reads see an empty store.
#[derive(Debug, Default)]
pub struct WriteFailingStore {
    values: BTreeMap<String, String>,
}

impl KeyValueStore for WriteFailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::WriteFailed("disk full".to_string()))
    }
}
