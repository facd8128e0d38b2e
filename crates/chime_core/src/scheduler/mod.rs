//! Notification scheduler contract.
//!
//! # Responsibility
//! - Define the interface the reconciler uses to realize and revoke
//!   recurring chime notifications.
//! - Keep scheduler failure semantics explicit: every call is
//!   independently fallible.
//!
//! # Invariants
//! - A successful `schedule` returns an identifier that is unique among
//!   currently live schedules.
//! - `cancel` of an unknown identifier is reported as
//!   `UnknownIdentifier`, which callers treat as already-cancelled.

use crate::model::chime::{format_time_12h, ScheduleId};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;

pub use memory::MemoryScheduler;

/// Recurrence of one scheduled notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    /// Fires every day at the slot hour; carries no weekday.
    Daily,
    /// Fires once a week at the slot hour on `weekday`.
    Weekly,
}

/// Parameters for one recurring chime notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChimeRequest {
    pub hour: u8,
    /// Present for weekly recurrence, absent for daily.
    pub weekday: Option<u8>,
    pub recurrence: Recurrence,
}

impl ChimeRequest {
    /// Weekly request for one (hour, weekday) pair.
    pub fn weekly(hour: u8, weekday: u8) -> Self {
        Self {
            hour,
            weekday: Some(weekday),
            recurrence: Recurrence::Weekly,
        }
    }

    /// Daily request for an hour, with no weekday filtering.
    pub fn daily(hour: u8) -> Self {
        Self {
            hour,
            weekday: None,
            recurrence: Recurrence::Daily,
        }
    }

    /// Notification title shown when the chime fires.
    pub fn title(&self) -> String {
        format!("The time is {}", format_time_12h(self.hour))
    }
}

/// Failure of a single scheduler call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The scheduling subsystem refuses all calls, e.g. permission not
    /// granted or no real device backing it.
    Unavailable(String),
    /// One schedule/cancel call failed; other calls may still succeed.
    CallFailed(String),
    /// Cancel target does not exist (treated as already cancelled).
    UnknownIdentifier(ScheduleId),
}

impl Display for SchedulerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "scheduler unavailable: {reason}"),
            Self::CallFailed(reason) => write!(f, "scheduler call failed: {reason}"),
            Self::UnknownIdentifier(identifier) => {
                write!(f, "unknown schedule identifier `{identifier}`")
            }
        }
    }
}

impl Error for SchedulerError {}

/// Device-level notification scheduling interface consumed by the
/// reconciler. Implementations live at the platform boundary; tests and
/// the CLI use [`MemoryScheduler`].
pub trait NotificationScheduler {
    /// Registers one recurring notification and returns its identifier.
    fn schedule(&mut self, request: &ChimeRequest) -> Result<ScheduleId, SchedulerError>;

    /// Revokes a previously issued schedule.
    fn cancel(&mut self, identifier: &str) -> Result<(), SchedulerError>;
}
