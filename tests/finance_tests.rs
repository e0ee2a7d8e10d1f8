use shiftledger::core::adjustments::AdjustmentLogic;
use shiftledger::core::attendance::AttendanceLogic;
use shiftledger::core::finance::FinanceLogic;
use shiftledger::core::settings::SettingsLogic;
use shiftledger::db::pool::DbPool;
use shiftledger::db::queries::SlotFilter;
use shiftledger::errors::{AppError, ErrorKind};
use shiftledger::models::actor::Actor;
use shiftledger::models::adjustment::NewAdjustment;
use shiftledger::models::setting::SettingType;
use shiftledger::models::shift::Shift;
use shiftledger::models::site::Site;

mod common;
use common::{d, director, monitor, pool, slot};

fn adj(monitor: &Actor, date: &str, delta: f64) -> NewAdjustment {
    NewAdjustment {
        user_id: monitor.id,
        date: d(date),
        delta_hours: delta,
        reason: "manual correction".into(),
        attendance_id: None,
    }
}

/// Authorize and mark one shift of `date`.
fn work(pool: &mut DbPool, boss: &Actor, mon: &Actor, date: &str, shift: Shift) {
    let day = d(date);
    let rec = AttendanceLogic::monitor_day(pool, mon, mon.id, day)
        .unwrap()
        .into_iter()
        .find(|r| r.shift == shift)
        .expect("scheduled block");
    AttendanceLogic::authorize(pool, boss, rec.id).unwrap();
    AttendanceLogic::mark_present(pool, mon, day, shift, day).unwrap();
}

#[test]
fn adjustments_add_to_attendance_hours() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    slot(&mut pool, &mon, 0, "M", "SA");
    work(&mut pool, &boss, &mon, "2025-09-01", Shift::Morning);

    AdjustmentLogic::create(&mut pool, &boss, &adj(&mon, "2025-09-02", -2.5)).unwrap();
    AdjustmentLogic::create(&mut pool, &boss, &adj(&mon, "2025-09-04", 5.0)).unwrap();

    let t = FinanceLogic::total_hours(
        &pool,
        mon.id,
        d("2025-09-01"),
        d("2025-09-07"),
        &SlotFilter::default(),
    )
    .unwrap();

    assert_eq!(t.attendance_hours, 4.0);
    assert_eq!(t.adjustment_hours, 2.5);
    assert_eq!(t.total_hours, 6.5);
    assert_eq!(t.attendance_count, 1);
    assert_eq!(t.adjustment_count, 2);
}

#[test]
fn adjustment_range_and_reason_are_checked() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");

    for bad in [0.0, 30.0, -24.5, f64::NAN] {
        let err = AdjustmentLogic::create(&mut pool, &boss, &adj(&mon, "2025-09-01", bad))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRange(_)), "delta {}", bad);
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    // bounds are inclusive
    AdjustmentLogic::create(&mut pool, &boss, &adj(&mon, "2025-09-01", 24.0)).unwrap();
    AdjustmentLogic::create(&mut pool, &boss, &adj(&mon, "2025-09-01", -24.0)).unwrap();

    let mut blank = adj(&mon, "2025-09-01", 1.0);
    blank.reason = "   ".into();
    let err = AdjustmentLogic::create(&mut pool, &boss, &blank).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn adjustment_targets_and_authors() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    let other = monitor(&mut pool, "other", "Otto");
    slot(&mut pool, &other, 0, "M", "SA");

    let err = AdjustmentLogic::create(&mut pool, &mon, &adj(&mon, "2025-09-01", 1.0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = AdjustmentLogic::create(&mut pool, &boss, &adj(&boss, "2025-09-01", 1.0)).unwrap_err();
    assert!(matches!(err, AppError::InvalidMonitor(_)));

    let foreign = AttendanceLogic::monitor_day(&mut pool, &other, other.id, d("2025-09-01"))
        .unwrap()[0]
        .id;
    let mut linked = adj(&mon, "2025-09-01", 1.0);
    linked.attendance_id = Some(foreign);
    let err = AdjustmentLogic::create(&mut pool, &boss, &linked).unwrap_err();
    assert!(matches!(err, AppError::MismatchedAttendance { .. }));

    linked.user_id = other.id;
    let ok = AdjustmentLogic::create(&mut pool, &boss, &linked).unwrap();
    assert_eq!(ok.attendance_id, Some(foreign));
    assert_eq!(ok.director_id, boss.id);
}

#[test]
fn adjustments_list_newest_first_and_delete() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");

    let a = AdjustmentLogic::create(&mut pool, &boss, &adj(&mon, "2025-09-01", 1.0)).unwrap();
    let b = AdjustmentLogic::create(&mut pool, &boss, &adj(&mon, "2025-09-10", 2.0)).unwrap();

    let all = AdjustmentLogic::list(&pool, &boss, Some(mon.id), None, None).unwrap();
    assert_eq!(all.iter().map(|x| x.id).collect::<Vec<_>>(), vec![b.id, a.id]);

    let early =
        AdjustmentLogic::list(&pool, &boss, None, Some(d("2025-09-01")), Some(d("2025-09-05")))
            .unwrap();
    assert_eq!(early.len(), 1);

    AdjustmentLogic::delete(&mut pool, &boss, a.id).unwrap();
    let err = AdjustmentLogic::get(&pool, &boss, a.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn total_hours_is_additive_over_disjoint_ranges() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    slot(&mut pool, &mon, 0, "M", "SA");
    slot(&mut pool, &mon, 2, "T", "BA");

    work(&mut pool, &boss, &mon, "2025-09-01", Shift::Morning);
    work(&mut pool, &boss, &mon, "2025-09-03", Shift::Afternoon);
    work(&mut pool, &boss, &mon, "2025-09-08", Shift::Morning);
    AdjustmentLogic::create(&mut pool, &boss, &adj(&mon, "2025-09-05", 1.5)).unwrap();
    AdjustmentLogic::create(&mut pool, &boss, &adj(&mon, "2025-09-09", -0.5)).unwrap();

    let f = SlotFilter::default();
    let a = FinanceLogic::total_hours(&pool, mon.id, d("2025-09-01"), d("2025-09-05"), &f).unwrap();
    let b = FinanceLogic::total_hours(&pool, mon.id, d("2025-09-06"), d("2025-09-14"), &f).unwrap();
    let all = FinanceLogic::total_hours(&pool, mon.id, d("2025-09-01"), d("2025-09-14"), &f).unwrap();

    assert_eq!(a.total_hours, 9.5);
    assert_eq!(b.total_hours, 3.5);
    assert_eq!(all.total_hours, a.total_hours + b.total_hours);
    assert_eq!(all.attendance_count, a.attendance_count + b.attendance_count);
}

#[test]
fn sub_cent_deltas_are_stored_in_hundredths() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");

    let first = AdjustmentLogic::create(&mut pool, &boss, &adj(&mon, "2025-09-01", 0.126)).unwrap();
    AdjustmentLogic::create(&mut pool, &boss, &adj(&mon, "2025-09-09", 0.126)).unwrap();
    assert_eq!(first.delta_hours, 0.13);

    let f = SlotFilter::default();
    let a = FinanceLogic::total_hours(&pool, mon.id, d("2025-09-01"), d("2025-09-05"), &f).unwrap();
    let b = FinanceLogic::total_hours(&pool, mon.id, d("2025-09-06"), d("2025-09-14"), &f).unwrap();
    let all = FinanceLogic::total_hours(&pool, mon.id, d("2025-09-01"), d("2025-09-14"), &f).unwrap();
    assert_eq!(a.total_hours, 0.13);
    assert_eq!(all.total_hours, a.total_hours + b.total_hours);

    // rounds to nothing
    let err = AdjustmentLogic::create(&mut pool, &boss, &adj(&mon, "2025-09-02", 0.004)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn site_filter_does_not_apply_to_adjustments() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    slot(&mut pool, &mon, 0, "M", "SA");
    work(&mut pool, &boss, &mon, "2025-09-01", Shift::Morning);
    AdjustmentLogic::create(&mut pool, &boss, &adj(&mon, "2025-09-01", 2.0)).unwrap();

    let ba = FinanceLogic::total_hours(
        &pool,
        mon.id,
        d("2025-09-01"),
        d("2025-09-01"),
        &SlotFilter::shift_site(None, Some(Site::Barcelona)),
    )
    .unwrap();
    assert_eq!(ba.attendance_hours, 0.0);
    assert_eq!(ba.adjustment_hours, 2.0);
    assert_eq!(ba.total_hours, 2.0);
}

#[test]
fn inverted_range_is_refused() {
    let mut pool = pool();
    let mon = monitor(&mut pool, "mon", "Mario");
    let err = FinanceLogic::total_hours(
        &pool,
        mon.id,
        d("2025-09-10"),
        d("2025-09-01"),
        &SlotFilter::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn projection_uses_configured_rate_and_weeks() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    slot(&mut pool, &mon, 0, "M", "SA");
    slot(&mut pool, &mon, 3, "T", "BA");

    assert_eq!(FinanceLogic::weekly_scheduled_hours(&pool, mon.id).unwrap(), 8.0);

    let p = FinanceLogic::projected_cost(&pool, mon.id, 4, None).unwrap();
    assert_eq!(p.total_weeks, 14);
    assert_eq!(p.weeks_remaining, 10);
    assert_eq!(p.hourly_rate, 9965.0);
    assert_eq!(p.projected_total_hours, 112.0);
    assert_eq!(p.projected_total_cost, 112.0 * 9965.0);
    assert_eq!(p.worked_hours, 32.0);
    assert_eq!(p.remaining_hours, 80.0);

    SettingsLogic::set(&mut pool, &boss, "costo_por_hora", "10000", SettingType::Decimal, "")
        .unwrap();
    let p = FinanceLogic::projected_cost(&pool, mon.id, 0, Some(10)).unwrap();
    assert_eq!(p.projected_total_cost, 800_000.0);
    assert_eq!(p.worked_cost, 0.0);
}

#[test]
fn weeks_worked_outside_the_semester_is_refused() {
    let mut pool = pool();
    let mon = monitor(&mut pool, "mon", "Mario");

    for weeks in [-1, 15] {
        let err = FinanceLogic::projected_cost(&pool, mon.id, weeks, None).unwrap_err();
        assert!(matches!(err, AppError::InvalidWeeks(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    // a full semester is fine
    FinanceLogic::projected_cost(&pool, mon.id, 14, None).unwrap();
}
