use chime_core::{ChimeSlot, ChimeValidationError, DaySet, ScheduleSnapshot, HOURS_PER_DAY};
use std::collections::BTreeMap;

#[test]
fn initial_snapshot_has_24_disabled_slots_and_empty_days() {
    let snapshot = ScheduleSnapshot::initial();

    assert_eq!(snapshot.slots().len(), usize::from(HOURS_PER_DAY));
    assert!(snapshot.days().is_empty());
    for (hour, slot) in snapshot.slots().iter().enumerate() {
        assert_eq!(usize::from(slot.hour), hour);
        assert_eq!(slot.id, format!("chime-{hour}"));
        assert!(!slot.enabled);
        assert!(slot.identifiers.is_empty());
    }
    snapshot.validate().unwrap();
}

#[test]
fn record_and_clear_keep_enabled_derived_from_entries() {
    let mut snapshot = ScheduleSnapshot::initial();
    snapshot.set_days(DaySet::from_days(&[2, 4]).unwrap());

    snapshot.record_schedule(9, 2, "a".to_string()).unwrap();
    assert!(snapshot.slot(9).unwrap().enabled);

    snapshot.record_schedule(9, 4, "b".to_string()).unwrap();
    assert_eq!(snapshot.slot(9).unwrap().scheduled_days(), vec![2, 4]);
    snapshot.validate().unwrap();

    assert_eq!(
        snapshot.clear_schedule(9, 2).unwrap(),
        Some("a".to_string())
    );
    assert!(snapshot.slot(9).unwrap().enabled);

    assert_eq!(
        snapshot.clear_schedule(9, 4).unwrap(),
        Some("b".to_string())
    );
    assert!(!snapshot.slot(9).unwrap().enabled);
    assert_eq!(snapshot.clear_schedule(9, 4).unwrap(), None);
}

#[test]
fn primitives_reject_out_of_range_input() {
    let mut snapshot = ScheduleSnapshot::initial();

    assert_eq!(
        snapshot.record_schedule(24, 0, "x".to_string()),
        Err(ChimeValidationError::HourOutOfRange(24))
    );
    assert_eq!(
        snapshot.record_schedule(0, 7, "x".to_string()),
        Err(ChimeValidationError::DayOutOfRange(7))
    );
    assert!(snapshot.slot(24).is_err());
}

#[test]
fn set_days_replaces_day_set_only() {
    let mut snapshot = ScheduleSnapshot::initial();
    snapshot.set_days(DaySet::from_days(&[1]).unwrap());
    snapshot.record_schedule(7, 1, "keep".to_string()).unwrap();

    snapshot.set_days(DaySet::from_days(&[3]).unwrap());

    // The primitive leaves entries alone; reconciling them is the
    // caller's job, and validation now reports the orphan.
    assert_eq!(snapshot.slot(7).unwrap().scheduled_days(), vec![1]);
    assert_eq!(
        snapshot.validate(),
        Err(ChimeValidationError::OrphanedDay { hour: 7, day: 1 })
    );
}

#[test]
fn slots_serialize_to_persisted_wire_shape() {
    let mut snapshot = ScheduleSnapshot::initial();
    snapshot.set_days(DaySet::from_days(&[1, 3]).unwrap());
    snapshot.record_schedule(9, 1, "id-a".to_string()).unwrap();
    snapshot.record_schedule(9, 3, "id-b".to_string()).unwrap();

    let chimes = serde_json::to_value(snapshot.slots()).unwrap();
    assert_eq!(chimes.as_array().unwrap().len(), 24);
    assert_eq!(chimes[0]["id"], "chime-0");
    assert_eq!(chimes[0]["hour"], 0);
    assert_eq!(chimes[0]["enabled"], false);
    assert_eq!(chimes[9]["id"], "chime-9");
    assert_eq!(chimes[9]["enabled"], true);
    assert_eq!(chimes[9]["identifiers"]["1"], "id-a");
    assert_eq!(chimes[9]["identifiers"]["3"], "id-b");

    let days = serde_json::to_value(snapshot.days()).unwrap();
    assert_eq!(days, serde_json::json!([1, 3]));

    let decoded_slots: Vec<ChimeSlot> = serde_json::from_value(chimes).unwrap();
    let decoded_days: DaySet = serde_json::from_value(days).unwrap();
    let decoded = ScheduleSnapshot::from_parts(decoded_slots, decoded_days).unwrap();
    assert_eq!(decoded, snapshot);
}

#[test]
fn from_parts_rejects_inconsistent_snapshots() {
    let make_slots = || -> Vec<ChimeSlot> {
        (0..HOURS_PER_DAY)
            .map(|hour| ChimeSlot {
                id: ChimeSlot::slot_id(hour),
                hour,
                enabled: false,
                identifiers: BTreeMap::new(),
            })
            .collect()
    };
    let days = DaySet::from_days(&[1]).unwrap();

    let short = make_slots()[..23].to_vec();
    assert_eq!(
        ScheduleSnapshot::from_parts(short, days),
        Err(ChimeValidationError::WrongSlotCount(23))
    );

    let mut swapped = make_slots();
    swapped[5].hour = 6;
    assert!(matches!(
        ScheduleSnapshot::from_parts(swapped, days),
        Err(ChimeValidationError::SlotHourMismatch { index: 5, hour: 6 })
    ));

    let mut drifted = make_slots();
    drifted[9].enabled = true;
    assert_eq!(
        ScheduleSnapshot::from_parts(drifted, days),
        Err(ChimeValidationError::EnabledFlagDrift { hour: 9 })
    );

    let mut orphaned = make_slots();
    orphaned[9].identifiers.insert(4, "x".to_string());
    orphaned[9].enabled = true;
    assert_eq!(
        ScheduleSnapshot::from_parts(orphaned, days),
        Err(ChimeValidationError::OrphanedDay { hour: 9, day: 4 })
    );

    let mut duplicated = make_slots();
    duplicated[9].identifiers.insert(1, "same".to_string());
    duplicated[9].enabled = true;
    duplicated[17].identifiers.insert(1, "same".to_string());
    duplicated[17].enabled = true;
    assert_eq!(
        ScheduleSnapshot::from_parts(duplicated, days),
        Err(ChimeValidationError::DuplicateIdentifier {
            identifier: "same".to_string()
        })
    );
}
