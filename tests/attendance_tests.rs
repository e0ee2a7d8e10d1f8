use shiftledger::core::attendance::{AttendanceLogic, ensure_records_for};
use shiftledger::db::initialize::open_db;
use shiftledger::db::queries::SlotFilter;
use shiftledger::errors::{AppError, ErrorKind};
use shiftledger::models::authorization::AuthorizationState;
use shiftledger::models::shift::Shift;
use shiftledger::models::site::Site;

mod common;
use common::{d, director, monitor, pool, setup_test_db, slot};
use std::thread;

// 2025-09-01 is a Monday.

#[test]
fn authorize_then_mark_credits_four_hours() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    slot(&mut pool, &mon, 0, "M", "SA");

    let monday = d("2025-09-01");
    let created = ensure_records_for(&pool.conn, &SlotFilter::default(), &monday).unwrap();
    assert_eq!(created, 1);

    let day = AttendanceLogic::monitor_day(&mut pool, &mon, mon.id, monday).unwrap();
    assert_eq!(day.len(), 1);
    let rec = &day[0];
    assert_eq!(rec.state(), AuthorizationState::Pending);
    assert!(!rec.present());
    assert_eq!(rec.hours(), 0.0);

    let rec = AttendanceLogic::authorize(&mut pool, &boss, rec.id).unwrap();
    assert_eq!(rec.state(), AuthorizationState::Authorized);
    assert_eq!(rec.hours(), 0.0);

    let rec = AttendanceLogic::mark_present(&mut pool, &mon, monday, Shift::Morning, monday).unwrap();
    assert!(rec.present());
    assert_eq!(rec.hours(), 4.0);

    // the stored row agrees with the returned one
    let stored = AttendanceLogic::get(&pool, &boss, rec.id).unwrap();
    assert_eq!(stored.hours(), 4.0);
    assert_eq!(stored.site, Site::SanAntonio);
}

#[test]
fn hours_follow_presence_and_state() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    slot(&mut pool, &mon, 0, "M", "SA");
    let monday = d("2025-09-01");

    let rec = AttendanceLogic::monitor_day(&mut pool, &mon, mon.id, monday).unwrap()[0].clone();
    AttendanceLogic::authorize(&mut pool, &boss, rec.id).unwrap();
    AttendanceLogic::mark_present(&mut pool, &mon, monday, Shift::Morning, monday).unwrap();

    let rejected = AttendanceLogic::reject(&mut pool, &boss, rec.id).unwrap();
    assert!(rejected.present());
    assert_eq!(rejected.hours(), 0.0);

    let again = AttendanceLogic::authorize(&mut pool, &boss, rec.id).unwrap();
    assert_eq!(again.hours(), 4.0);

    for r in AttendanceLogic::list_for_date(&mut pool, &boss, monday, &SlotFilter::default(), None)
        .unwrap()
    {
        let expected = if r.present() && r.state().is_creditable() { 4.0 } else { 0.0 };
        assert_eq!(r.hours(), expected);
    }
}

#[test]
fn ensure_records_twice_creates_no_duplicates() {
    let mut pool = pool();
    let a = monitor(&mut pool, "a", "Ana");
    let b = monitor(&mut pool, "b", "Bea");
    slot(&mut pool, &a, 0, "M", "SA");
    slot(&mut pool, &a, 0, "T", "BA");
    slot(&mut pool, &b, 0, "M", "BA");
    slot(&mut pool, &b, 1, "M", "BA");

    let monday = d("2025-09-01");
    assert_eq!(ensure_records_for(&pool.conn, &SlotFilter::default(), &monday).unwrap(), 3);
    assert_eq!(ensure_records_for(&pool.conn, &SlotFilter::default(), &monday).unwrap(), 0);

    let boss = director(&mut pool, "boss");
    let all = AttendanceLogic::list_for_date(&mut pool, &boss, monday, &SlotFilter::default(), None)
        .unwrap();
    assert_eq!(all.len(), 3);

    let ba_only = AttendanceLogic::list_for_date(
        &mut pool,
        &boss,
        monday,
        &SlotFilter::shift_site(None, Some(Site::Barcelona)),
        None,
    )
    .unwrap();
    assert_eq!(ba_only.len(), 2);
}

#[test]
fn state_filter_is_applied_after_generation() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    slot(&mut pool, &mon, 0, "M", "SA");
    slot(&mut pool, &mon, 0, "T", "SA");
    let monday = d("2025-09-01");

    let pending = AttendanceLogic::list_for_date(
        &mut pool,
        &boss,
        monday,
        &SlotFilter::default(),
        Some(AuthorizationState::Pending),
    )
    .unwrap();
    assert_eq!(pending.len(), 2);

    AttendanceLogic::authorize(&mut pool, &boss, pending[0].id).unwrap();
    let authorized = AttendanceLogic::list_for_date(
        &mut pool,
        &boss,
        monday,
        &SlotFilter::default(),
        Some(AuthorizationState::Authorized),
    )
    .unwrap();
    assert_eq!(authorized.len(), 1);
}

#[test]
fn recover_only_pending_past_records() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    slot(&mut pool, &mon, 0, "M", "SA");
    slot(&mut pool, &mon, 0, "T", "SA");

    let monday = d("2025-09-01");
    let recs = AttendanceLogic::monitor_day(&mut pool, &mon, mon.id, monday).unwrap();
    let (first, second) = (recs[0].id, recs[1].id);

    // same day is not recoverable
    let err = AttendanceLogic::recover(&mut pool, &boss, first, monday).unwrap_err();
    assert!(matches!(err, AppError::InvalidDate(_)));
    assert_eq!(err.kind(), ErrorKind::StateViolation);

    // nor is a block still ahead
    let err = AttendanceLogic::recover(&mut pool, &boss, first, d("2025-08-31")).unwrap_err();
    assert!(matches!(err, AppError::InvalidDate(_)));
    assert_eq!(err.kind(), ErrorKind::StateViolation);

    let rec = AttendanceLogic::recover(&mut pool, &boss, first, d("2025-09-02")).unwrap();
    assert_eq!(rec.state(), AuthorizationState::Recovered);
    assert_eq!(rec.hours(), 0.0);

    // recovered blocks can then be marked
    let marked =
        AttendanceLogic::mark_present(&mut pool, &mon, monday, rec.shift, d("2025-09-02")).unwrap();
    assert_eq!(marked.hours(), 4.0);

    AttendanceLogic::reject(&mut pool, &boss, second).unwrap();
    let err = AttendanceLogic::recover(&mut pool, &boss, second, d("2025-09-02")).unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    assert_eq!(err.kind(), ErrorKind::StateViolation);
}

#[test]
fn mark_present_rejections() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    slot(&mut pool, &mon, 0, "M", "SA");
    let monday = d("2025-09-01");

    // no Tuesday slot
    let err = AttendanceLogic::mark_present(&mut pool, &mon, d("2025-09-02"), Shift::Morning, d("2025-09-03"))
        .unwrap_err();
    assert!(matches!(err, AppError::NoScheduleForSlot(_)));

    // no Monday afternoon slot
    let err = AttendanceLogic::mark_present(&mut pool, &mon, monday, Shift::Afternoon, monday)
        .unwrap_err();
    assert!(matches!(err, AppError::NoScheduleForSlot(_)));

    let err = AttendanceLogic::mark_present(&mut pool, &mon, monday, Shift::Morning, d("2025-08-31"))
        .unwrap_err();
    assert!(matches!(err, AppError::FutureDateNotAllowed(_)));

    let err = AttendanceLogic::mark_present(&mut pool, &mon, monday, Shift::Morning, monday)
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized(_)));
    assert_eq!(err.kind(), ErrorKind::StateViolation);

    let rec = AttendanceLogic::monitor_day(&mut pool, &mon, mon.id, monday).unwrap()[0].clone();
    AttendanceLogic::authorize(&mut pool, &boss, rec.id).unwrap();
    AttendanceLogic::mark_present(&mut pool, &mon, monday, Shift::Morning, monday).unwrap();

    let err = AttendanceLogic::mark_present(&mut pool, &mon, monday, Shift::Morning, monday)
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyMarked(_)));

    let still = AttendanceLogic::get(&pool, &boss, rec.id).unwrap();
    assert_eq!(still.hours(), 4.0);
}

#[test]
fn roles_are_enforced() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    let other = monitor(&mut pool, "other", "Otto");
    slot(&mut pool, &mon, 0, "M", "SA");
    let monday = d("2025-09-01");

    let rec = AttendanceLogic::monitor_day(&mut pool, &mon, mon.id, monday).unwrap()[0].clone();

    let err = AttendanceLogic::authorize(&mut pool, &mon, rec.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = AttendanceLogic::mark_present(&mut pool, &boss, monday, Shift::Morning, monday)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = AttendanceLogic::monitor_day(&mut pool, &other, mon.id, monday).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = AttendanceLogic::get(&pool, &other, rec.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = AttendanceLogic::delete(&mut pool, &mon, rec.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[test]
fn delete_is_an_admin_override() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    slot(&mut pool, &mon, 0, "M", "SA");
    let monday = d("2025-09-01");

    let rec = AttendanceLogic::monitor_day(&mut pool, &mon, mon.id, monday).unwrap()[0].clone();
    AttendanceLogic::delete(&mut pool, &boss, rec.id).unwrap();

    let err = AttendanceLogic::get(&pool, &boss, rec.id).unwrap_err();
    assert!(matches!(err, AppError::RecordNotFound(_)));

    // the next query regenerates a fresh pending block
    let again = AttendanceLogic::monitor_day(&mut pool, &mon, mon.id, monday).unwrap();
    assert_eq!(again.len(), 1);
    assert_eq!(again[0].state(), AuthorizationState::Pending);
}

#[test]
fn concurrent_generation_creates_each_block_once() {
    let db = setup_test_db("attendance_concurrent");
    {
        let mut pool = open_db(&db).unwrap();
        let mon = monitor(&mut pool, "mon", "Mario");
        slot(&mut pool, &mon, 0, "M", "SA");
        slot(&mut pool, &mon, 0, "T", "BA");
    }

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let db = db.clone();
            thread::spawn(move || {
                let pool = open_db(&db).unwrap();
                ensure_records_for(&pool.conn, &SlotFilter::default(), &d("2025-09-01")).unwrap()
            })
        })
        .collect();
    let created: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(created, 2);

    let pool = open_db(&db).unwrap();
    let rows: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM attendance", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 2);
}
