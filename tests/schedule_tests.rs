use shiftledger::core::finance::FinanceLogic;
use shiftledger::core::schedule::{MAX_BULK_SLOTS, ScheduleLogic};
use shiftledger::db::queries::SlotFilter;
use shiftledger::errors::{AppError, ErrorKind};
use shiftledger::models::shift::Shift;
use shiftledger::models::site::Site;
use shiftledger::models::slot::SlotInput;

mod common;
use common::{director, monitor, pool, slot};

fn inputs(raw: &[&str]) -> Vec<SlotInput> {
    raw.iter()
        .map(|s| SlotInput::parse_compact(s).expect("compact slot"))
        .collect()
}

#[test]
fn duplicate_weekday_and_shift_is_refused() {
    let mut pool = pool();
    let mon = monitor(&mut pool, "mon", "Mario");
    slot(&mut pool, &mon, 0, "M", "SA");

    // same day and shift, other site: still a duplicate
    let err = ScheduleLogic::create_slot(&mut pool, &mon, mon.id, &SlotInput::new(0, "M", "BA"))
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateSlot(_)));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // the afternoon is free
    slot(&mut pool, &mon, 0, "T", "BA");
    assert_eq!(FinanceLogic::slot_count(&pool, mon.id).unwrap(), 2);
}

#[test]
fn invalid_slot_values_are_rejected() {
    let mut pool = pool();
    let mon = monitor(&mut pool, "mon", "Mario");

    for bad in [
        SlotInput::new(7, "M", "SA"),
        SlotInput::new(-1, "M", "SA"),
        SlotInput::new(0, "N", "SA"),
        SlotInput::new(0, "M", "XX"),
    ] {
        let err = ScheduleLogic::create_slot(&mut pool, &mon, mon.id, &bad).unwrap_err();
        assert!(matches!(err, AppError::InvalidSlotData(_)), "{:?}", bad);
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    // lowercase codes are accepted
    let s = ScheduleLogic::create_slot(&mut pool, &mon, mon.id, &SlotInput::new(6, "t", "ba"))
        .unwrap();
    assert_eq!(s.shift, Shift::Afternoon);
    assert_eq!(s.site, Site::Barcelona);
    assert_eq!(s.weekday_index(), 6);
}

#[test]
fn bulk_create_is_best_effort() {
    let mut pool = pool();
    let mon = monitor(&mut pool, "mon", "Mario");

    let report = ScheduleLogic::bulk_create(
        &mut pool,
        &mon,
        mon.id,
        &inputs(&["0:M:SA", "0:M:BA", "9:M:SA", "1:T:BA"]),
    )
    .unwrap();

    assert_eq!(report.requested, 4);
    assert_eq!(report.created.len(), 2);
    assert_eq!(report.deleted, None);
    assert_eq!(
        report.errors.iter().map(|e| e.item).collect::<Vec<_>>(),
        vec![2, 3]
    );
    assert!(!report.is_complete());
    assert_eq!(FinanceLogic::slot_count(&pool, mon.id).unwrap(), 2);
}

#[test]
fn bulk_replace_leaves_only_the_new_set() {
    let mut pool = pool();
    let mon = monitor(&mut pool, "mon", "Mario");
    slot(&mut pool, &mon, 0, "M", "SA");
    slot(&mut pool, &mon, 1, "M", "SA");
    slot(&mut pool, &mon, 2, "T", "BA");

    let report = ScheduleLogic::bulk_replace(
        &mut pool,
        &mon,
        mon.id,
        &inputs(&["2:M:SA", "2:M:BA", "3:T:BA"]),
    )
    .unwrap();

    assert_eq!(report.deleted, Some(3));
    assert_eq!(report.created.len(), 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].item, 2);

    let slots = ScheduleLogic::list_slots(&pool, &mon, mon.id).unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(FinanceLogic::slot_count(&pool, mon.id).unwrap(), 2);
    assert!(slots.iter().all(|s| s.weekday_index() >= 2));
}

#[test]
fn batch_size_is_bounded() {
    let mut pool = pool();
    let mon = monitor(&mut pool, "mon", "Mario");

    let err = ScheduleLogic::bulk_create(&mut pool, &mon, mon.id, &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let too_many: Vec<SlotInput> = (0..=MAX_BULK_SLOTS)
        .map(|_| SlotInput::new(0, "M", "SA"))
        .collect();
    let err = ScheduleLogic::bulk_replace(&mut pool, &mon, mon.id, &too_many).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn update_and_delete_slots() {
    let mut pool = pool();
    let mon = monitor(&mut pool, "mon", "Mario");
    let a = slot(&mut pool, &mon, 0, "M", "SA");
    slot(&mut pool, &mon, 1, "M", "SA");

    let moved =
        ScheduleLogic::update_slot(&mut pool, &mon, mon.id, a.id, &SlotInput::new(4, "T", "BA"))
            .unwrap();
    assert_eq!(moved.weekday_index(), 4);

    let err =
        ScheduleLogic::update_slot(&mut pool, &mon, mon.id, a.id, &SlotInput::new(1, "M", "BA"))
            .unwrap_err();
    assert!(matches!(err, AppError::DuplicateSlot(_)));

    ScheduleLogic::delete_slot(&mut pool, &mon, mon.id, a.id).unwrap();
    let err = ScheduleLogic::delete_slot(&mut pool, &mon, mon.id, a.id).unwrap_err();
    assert!(matches!(err, AppError::SlotNotFound(_)));
}

#[test]
fn monitors_manage_only_their_own_schedule() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    let other = monitor(&mut pool, "other", "Otto");

    let err = ScheduleLogic::create_slot(&mut pool, &other, mon.id, &SlotInput::new(0, "M", "SA"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    // directors may, but only for monitors
    ScheduleLogic::create_slot(&mut pool, &boss, mon.id, &SlotInput::new(0, "M", "SA")).unwrap();
    let err = ScheduleLogic::create_slot(&mut pool, &boss, boss.id, &SlotInput::new(0, "M", "SA"))
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidMonitor(_)));
}

#[test]
fn fleet_listing_counts_slots_and_monitors() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let a = monitor(&mut pool, "a", "Ana");
    let b = monitor(&mut pool, "b", "Bea");
    slot(&mut pool, &a, 0, "M", "SA");
    slot(&mut pool, &a, 2, "T", "BA");
    slot(&mut pool, &b, 0, "T", "SA");

    let fleet = ScheduleLogic::list_fleet_slots(&pool, &boss, &SlotFilter::default()).unwrap();
    assert_eq!(fleet.total_slots, 3);
    assert_eq!(fleet.total_monitors, 2);
    assert_eq!(fleet.slots[0].monitor_name, "Ana");

    let sa = ScheduleLogic::list_fleet_slots(
        &pool,
        &boss,
        &SlotFilter::shift_site(None, Some(Site::SanAntonio)),
    )
    .unwrap();
    assert_eq!(sa.total_slots, 2);
    assert_eq!(sa.total_monitors, 2);

    let err = ScheduleLogic::list_fleet_slots(&pool, &a, &SlotFilter::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}
