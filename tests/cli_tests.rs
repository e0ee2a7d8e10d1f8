use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{init_db_with_users, setup_test_db, sl, temp_out};

/// Monitor 2 gets a Monday morning slot; director 1 authorizes the block of
/// 2025-09-01 and the monitor marks it.
fn one_worked_block(db: &str) {
    sl().args([
        "--db", db, "--as", "2", "schedule", "add", "--day", "0", "--shift", "M", "--site", "SA",
    ])
    .assert()
    .success()
    .stdout(contains("Slot #1 created"));

    sl().args([
        "--db", db, "--as", "1", "--today", "2025-09-01", "attendance", "day", "--date",
        "2025-09-01",
    ])
    .assert()
    .success()
    .stdout(contains("pendiente"));

    sl().args(["--db", db, "--as", "1", "attendance", "authorize", "1"])
        .assert()
        .success()
        .stdout(contains("Record #1 authorized"));

    sl().args([
        "--db", db, "--as", "2", "--today", "2025-09-01", "attendance", "mark", "--date",
        "2025-09-01", "--shift", "M",
    ])
    .assert()
    .success()
    .stdout(contains("Presence marked").and(contains("4.00h")));
}

#[test]
fn test_init_creates_schema() {
    let db = setup_test_db("cli_init");

    sl().args(["--db", &db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    sl().args(["--db", &db, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));
}

#[test]
fn test_first_director_needs_no_identity() {
    let db = setup_test_db("cli_director_bootstrap");
    init_db_with_users(&db);

    // a second one does
    sl().args([
        "--db", &db, "user", "director", "boss2", "Second", "--password", "secret123",
    ])
    .assert()
    .failure()
    .stderr(contains("--as"));

    sl().args([
        "--db", &db, "--as", "1", "user", "director", "boss2", "Second", "--password", "secret123",
    ])
    .assert()
    .success();

    sl().args(["--db", &db, "--as", "1", "user", "list", "--role", "monitor"])
        .assert()
        .success()
        .stdout(contains("Mario Monitor").and(contains("Second").not()));
}

#[test]
fn test_attendance_flow_and_hours_report() {
    let db = setup_test_db("cli_flow");
    init_db_with_users(&db);
    one_worked_block(&db);

    sl().args([
        "--db", &db, "--as", "2", "--today", "2025-09-01", "attendance", "mark", "--date",
        "2025-09-01", "--shift", "M",
    ])
    .assert()
    .failure()
    .code(1)
    .stderr(contains("already marked"));

    sl().args([
        "--db", &db, "--as", "2", "report", "hours", "--period", "2025-09",
    ])
    .assert()
    .success()
    .stdout(contains("4.00h").and(contains("39,860.00")));
}

#[test]
fn test_password_from_env_or_stdin() {
    let db = setup_test_db("cli_password_sources");
    init_db_with_users(&db);

    sl().env("SHIFTLEDGER_PASSWORD", "secret123")
        .args(["--db", &db, "user", "register", "envmon", "Env Monitor"])
        .assert()
        .success()
        .stdout(contains("registered with id 3"));

    sl().env_remove("SHIFTLEDGER_PASSWORD")
        .args(["--db", &db, "user", "register", "stdinmon", "Stdin Monitor"])
        .write_stdin("secret123\n")
        .assert()
        .success()
        .stdout(contains("registered with id 4"));

    sl().env_remove("SHIFTLEDGER_PASSWORD")
        .args(["--db", &db, "user", "register", "short", "Short Monitor"])
        .write_stdin("abc\n")
        .assert()
        .failure()
        .stderr(contains("at least 6"));
}

#[test]
fn test_future_and_unscheduled_marks_fail() {
    let db = setup_test_db("cli_mark_errors");
    init_db_with_users(&db);

    sl().args([
        "--db", &db, "--as", "2", "schedule", "bulk", "0:M:SA", "0:M:BA", "2:T:BA",
    ])
    .assert()
    .success()
    .stdout(contains("2 of 3 slots created"))
    .stdout(contains("item 2"));

    sl().args([
        "--db", &db, "--as", "2", "--today", "2025-09-01", "attendance", "mark", "--date",
        "2025-09-02", "--shift", "M",
    ])
    .assert()
    .failure()
    .stderr(contains("No schedule"));

    sl().args([
        "--db", &db, "--as", "2", "--today", "2025-09-01", "attendance", "mark", "--date",
        "2025-09-03", "--shift", "T",
    ])
    .assert()
    .failure()
    .stderr(contains("future date"));
}

#[test]
fn test_commands_need_an_identity() {
    let db = setup_test_db("cli_identity");
    init_db_with_users(&db);

    sl().args(["--db", &db, "schedule", "list"])
        .assert()
        .failure()
        .stderr(contains("--as"));

    sl().args(["--db", &db, "--as", "99", "schedule", "list"])
        .assert()
        .failure()
        .stderr(contains("User not found: 99"));

    sl().args(["--db", &db, "--as", "2", "setting", "init"])
        .assert()
        .failure()
        .stderr(contains("Forbidden"));
}

#[test]
fn test_invalid_date_falls_back_to_today() {
    let db = setup_test_db("cli_lenient_date");
    init_db_with_users(&db);

    sl().args([
        "--db", &db, "--as", "2", "--today", "2025-09-01", "attendance", "mine", "--date",
        "not-a-date",
    ])
    .assert()
    .success()
    .stdout(contains("Invalid date 'not-a-date'").and(contains("2025-09-01")));
}

#[test]
fn test_adjustments_and_settings() {
    let db = setup_test_db("cli_adjust_settings");
    init_db_with_users(&db);

    sl().args(["--db", &db, "--as", "1", "setting", "init"])
        .assert()
        .success()
        .stdout(contains("costo_por_hora"));

    sl().args([
        "--db", &db, "--as", "1", "setting", "update", "costo_por_hora", "10000",
    ])
    .assert()
    .success();

    sl().args(["--db", &db, "setting", "list"])
        .assert()
        .success()
        .stdout(contains("10000").and(contains("semanas_semestre")));

    sl().args([
        "--db", &db, "--as", "1", "adjust", "add", "--monitor", "2", "--hours", "-2.5",
        "--reason", "left early", "--date", "2025-09-02",
    ])
    .assert()
    .success()
    .stdout(contains("-2.50h"));

    sl().args([
        "--db", &db, "--as", "1", "adjust", "add", "--monitor", "2", "--hours", "30",
        "--reason", "too much",
    ])
    .assert()
    .failure()
    .stderr(contains("out of range"));

    sl().args(["--db", &db, "--as", "1", "adjust", "list", "--monitor", "2"])
        .assert()
        .success()
        .stdout(contains("left early"));

    sl().args(["--db", &db, "log", "--print", "--op", "adjust"])
        .assert()
        .success()
        .stdout(contains("[user 1]"));
}

#[test]
fn test_report_exports() {
    let db = setup_test_db("cli_exports");
    init_db_with_users(&db);
    one_worked_block(&db);

    let json = temp_out("cli_fleet_report", "json");
    sl().args([
        "--db", &db, "--as", "1", "report", "fleet", "--period", "2025-09", "--format", "json",
        "--file", &json, "--force",
    ])
    .assert()
    .success()
    .stdout(contains("JSON export completed"));

    let content = fs::read_to_string(&json).expect("json written");
    let doc: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(doc["totals"]["total_hours"], 4.0);
    assert_eq!(doc["rows"][0]["monitor_name"], "Mario Monitor");

    let csv = temp_out("cli_weekly_report", "csv");
    sl().args([
        "--db", &db, "--as", "1", "report", "weekly", "--period", "2025-09-01:2025-09-14",
        "--file", &csv, "--force",
    ])
    .assert()
    .success();

    let content = fs::read_to_string(&csv).expect("csv written");
    let mut lines = content.lines();
    assert!(lines.next().unwrap_or("").starts_with("week_start,week_end"));
    assert_eq!(lines.count(), 2);
}

#[test]
fn test_backup_copies_the_database() {
    let db = setup_test_db("cli_backup");
    init_db_with_users(&db);

    let out = temp_out("cli_backup", "sqlite");
    sl().args(["--db", &db, "backup", "--file", &out, "--force"])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    assert!(fs::metadata(&out).is_ok());
}
