//! In-process notification scheduler.
//!
//! # Responsibility
//! - Provide a real `NotificationScheduler` for tests and the CLI smoke
//!   path, with the same identifier semantics as a device scheduler.
//!
//! # Invariants
//! - Issued identifiers are unique for the lifetime of the instance.
//! - Cancelling an identifier twice reports `UnknownIdentifier`.

use super::{ChimeRequest, NotificationScheduler, SchedulerError};
use crate::model::chime::ScheduleId;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Scheduler keeping live requests in memory, keyed by issued identifier.
#[derive(Debug, Default)]
pub struct MemoryScheduler {
    live: BTreeMap<ScheduleId, ChimeRequest>,
}

impl MemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently live requests, keyed by identifier.
    pub fn live_requests(&self) -> &BTreeMap<ScheduleId, ChimeRequest> {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl NotificationScheduler for MemoryScheduler {
    fn schedule(&mut self, request: &ChimeRequest) -> Result<ScheduleId, SchedulerError> {
        let identifier = Uuid::new_v4().to_string();
        self.live.insert(identifier.clone(), request.clone());
        Ok(identifier)
    }

    fn cancel(&mut self, identifier: &str) -> Result<(), SchedulerError> {
        if self.live.remove(identifier).is_none() {
            return Err(SchedulerError::UnknownIdentifier(identifier.to_string()));
        }
        Ok(())
    }
}
