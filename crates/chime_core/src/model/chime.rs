//! Chime slot and snapshot domain model.
//!
//! # Responsibility
//! - Define `ChimeSlot`, `DaySet` and `ScheduleSnapshot`, the unit of
//!   persistence for the reconciliation engine.
//! - Provide total, side-effect-free mutation primitives; no scheduler or
//!   store call ever happens in this module.
//!
//! # Invariants
//! - `enabled == !identifiers.is_empty()` for every slot after every
//!   primitive.
//! - A validated snapshot holds no entry for a day outside its day set
//!   and no identifier twice.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of chime slots, one per hour of the day.
pub const HOURS_PER_DAY: u8 = 24;

/// Number of selectable weekdays; day 0 is Sunday.
pub const DAYS_PER_WEEK: u8 = 7;

/// Opaque handle issued by the notification scheduler for one scheduled
/// notification. Kept as a type alias to make semantic intent explicit.
pub type ScheduleId = String;

/// Validation error for model primitives and persisted snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChimeValidationError {
    HourOutOfRange(u8),
    DayOutOfRange(u8),
    WrongSlotCount(usize),
    SlotHourMismatch { index: usize, hour: u8 },
    SlotIdMismatch { hour: u8, id: String },
    EnabledFlagDrift { hour: u8 },
    OrphanedDay { hour: u8, day: u8 },
    DuplicateIdentifier { identifier: ScheduleId },
}

impl Display for ChimeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HourOutOfRange(hour) => write!(f, "hour {hour} is outside 0..=23"),
            Self::DayOutOfRange(day) => write!(f, "weekday {day} is outside 0..=6"),
            Self::WrongSlotCount(count) => {
                write!(f, "snapshot holds {count} slots, expected {HOURS_PER_DAY}")
            }
            Self::SlotHourMismatch { index, hour } => {
                write!(f, "slot at index {index} carries hour {hour}")
            }
            Self::SlotIdMismatch { hour, id } => {
                write!(f, "slot for hour {hour} carries id `{id}`")
            }
            Self::EnabledFlagDrift { hour } => write!(
                f,
                "slot for hour {hour} has an enabled flag inconsistent with its entries"
            ),
            Self::OrphanedDay { hour, day } => write!(
                f,
                "slot for hour {hour} holds an entry for day {day} outside the day set"
            ),
            Self::DuplicateIdentifier { identifier } => {
                write!(f, "identifier `{identifier}` appears more than once")
            }
        }
    }
}

impl Error for ChimeValidationError {}

/// Returns `Ok(())` when `hour` is a valid slot hour.
pub fn ensure_hour(hour: u8) -> Result<(), ChimeValidationError> {
    if hour < HOURS_PER_DAY {
        Ok(())
    } else {
        Err(ChimeValidationError::HourOutOfRange(hour))
    }
}

/// Returns `Ok(())` when `day` is a valid weekday (0 = Sunday).
pub fn ensure_day(day: u8) -> Result<(), ChimeValidationError> {
    if day < DAYS_PER_WEEK {
        Ok(())
    } else {
        Err(ChimeValidationError::DayOutOfRange(day))
    }
}

/// Formats an hour as the 12-hour label shown in notification titles,
/// e.g. `0 -> "12:00 AM"`, `13 -> "1:00 PM"`.
pub fn format_time_12h(hour: u8) -> String {
    let period = if hour < 12 { "AM" } else { "PM" };
    let hour_12 = match hour % 12 {
        0 => 12,
        other => other,
    };
    format!("{hour_12}:00 {period}")
}

/// Set of weekdays for which enabled chimes fire, shared by all slots.
///
/// Backed by a 7-bit mask so membership and diffing are O(1); the wire
/// format stays a sorted array of day numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaySet(u8);

impl DaySet {
    /// Returns the empty selection.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Builds a set from day numbers, rejecting values outside 0..=6.
    pub fn from_days(days: &[u8]) -> Result<Self, ChimeValidationError> {
        let mut set = Self::empty();
        for &day in days {
            ensure_day(day)?;
            set.0 |= 1 << day;
        }
        Ok(set)
    }

    /// Membership test; days outside 0..=6 are never members.
    pub fn contains(self, day: u8) -> bool {
        day < DAYS_PER_WEEK && self.0 & (1 << day) != 0
    }

    /// Returns this set with `day` flipped.
    pub fn toggled(self, day: u8) -> Result<Self, ChimeValidationError> {
        ensure_day(day)?;
        Ok(Self(self.0 ^ (1 << day)))
    }

    /// Iterates member days in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..DAYS_PER_WEEK).filter(move |&day| self.contains(day))
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Serialize for DaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for DaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let days = Vec::<u8>::deserialize(deserializer)?;
        Self::from_days(&days).map_err(D::Error::custom)
    }
}

/// One hour bucket that may have recurring notifications scheduled.
///
/// Wire shape matches the persisted layout: `id` is the stable
/// `chime-<hour>` string and `identifiers` maps weekday numbers to
/// scheduler-issued handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChimeSlot {
    pub id: String,
    pub hour: u8,
    pub enabled: bool,
    pub identifiers: BTreeMap<u8, ScheduleId>,
}

impl ChimeSlot {
    /// Stable slot id for an hour.
    pub fn slot_id(hour: u8) -> String {
        format!("chime-{hour}")
    }

    fn disabled(hour: u8) -> Self {
        Self {
            id: Self::slot_id(hour),
            hour,
            enabled: false,
            identifiers: BTreeMap::new(),
        }
    }

    /// Days with a live entry, ascending.
    pub fn scheduled_days(&self) -> Vec<u8> {
        self.identifiers.keys().copied().collect()
    }

    fn recompute_enabled(&mut self) {
        self.enabled = !self.identifiers.is_empty();
    }

    fn validate(&self, index: usize, days: DaySet) -> Result<(), ChimeValidationError> {
        if usize::from(self.hour) != index {
            return Err(ChimeValidationError::SlotHourMismatch {
                index,
                hour: self.hour,
            });
        }
        if self.id != Self::slot_id(self.hour) {
            return Err(ChimeValidationError::SlotIdMismatch {
                hour: self.hour,
                id: self.id.clone(),
            });
        }
        if self.enabled != !self.identifiers.is_empty() {
            return Err(ChimeValidationError::EnabledFlagDrift { hour: self.hour });
        }
        for &day in self.identifiers.keys() {
            ensure_day(day)?;
            if !days.contains(day) {
                return Err(ChimeValidationError::OrphanedDay {
                    hour: self.hour,
                    day,
                });
            }
        }
        Ok(())
    }
}

/// Full collection of 24 chime slots plus the shared day set — the unit
/// of persistence, mutated exclusively by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSnapshot {
    slots: Vec<ChimeSlot>,
    days: DaySet,
}

impl ScheduleSnapshot {
    /// Canonical first-launch state: 24 disabled slots, empty day set.
    pub fn initial() -> Self {
        Self {
            slots: (0..HOURS_PER_DAY).map(ChimeSlot::disabled).collect(),
            days: DaySet::empty(),
        }
    }

    /// Rebuilds a snapshot from persisted parts, rejecting inconsistent
    /// state instead of masking it.
    pub fn from_parts(slots: Vec<ChimeSlot>, days: DaySet) -> Result<Self, ChimeValidationError> {
        let snapshot = Self { slots, days };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn slots(&self) -> &[ChimeSlot] {
        &self.slots
    }

    pub fn days(&self) -> DaySet {
        self.days
    }

    /// Borrows the slot for an hour.
    pub fn slot(&self, hour: u8) -> Result<&ChimeSlot, ChimeValidationError> {
        ensure_hour(hour)?;
        Ok(&self.slots[usize::from(hour)])
    }

    /// Records a confirmed schedule for `(hour, day)` and re-derives the
    /// slot's enabled flag. Never talks to the scheduler.
    pub fn record_schedule(
        &mut self,
        hour: u8,
        day: u8,
        identifier: ScheduleId,
    ) -> Result<(), ChimeValidationError> {
        ensure_hour(hour)?;
        ensure_day(day)?;
        let slot = &mut self.slots[usize::from(hour)];
        slot.identifiers.insert(day, identifier);
        slot.recompute_enabled();
        Ok(())
    }

    /// Removes the `(hour, day)` entry, returning the identifier that was
    /// held, and re-derives the slot's enabled flag.
    pub fn clear_schedule(
        &mut self,
        hour: u8,
        day: u8,
    ) -> Result<Option<ScheduleId>, ChimeValidationError> {
        ensure_hour(hour)?;
        ensure_day(day)?;
        let slot = &mut self.slots[usize::from(hour)];
        let removed = slot.identifiers.remove(&day);
        slot.recompute_enabled();
        Ok(removed)
    }

    /// Replaces the day set only. Per-slot entries are reconciled
    /// separately by the caller.
    pub fn set_days(&mut self, days: DaySet) {
        self.days = days;
    }

    /// Hours whose slot currently holds at least one live entry.
    pub fn enabled_hours(&self) -> Vec<u8> {
        self.slots
            .iter()
            .filter(|slot| slot.enabled)
            .map(|slot| slot.hour)
            .collect()
    }

    /// Checks structural consistency: slot count and order, stable ids,
    /// enabled-flag derivation, no entries outside the day set, and
    /// identifier uniqueness across all slots.
    pub fn validate(&self) -> Result<(), ChimeValidationError> {
        if self.slots.len() != usize::from(HOURS_PER_DAY) {
            return Err(ChimeValidationError::WrongSlotCount(self.slots.len()));
        }
        let mut seen = BTreeSet::new();
        for (index, slot) in self.slots.iter().enumerate() {
            slot.validate(index, self.days)?;
            for identifier in slot.identifiers.values() {
                if !seen.insert(identifier.as_str()) {
                    return Err(ChimeValidationError::DuplicateIdentifier {
                        identifier: identifier.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
