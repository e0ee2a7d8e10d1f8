#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use shiftledger::core::schedule::ScheduleLogic;
use shiftledger::core::users::UserLogic;
use shiftledger::db::initialize::open_in_memory;
use shiftledger::db::pool::DbPool;
use shiftledger::models::actor::Actor;
use shiftledger::models::slot::{ScheduleSlot, SlotInput};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn sl() -> Command {
    cargo_bin_cmd!("shiftledger")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_shiftledger.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

pub fn pool() -> DbPool {
    open_in_memory().expect("in-memory db")
}

pub fn director(pool: &mut DbPool, username: &str) -> Actor {
    let u = UserLogic::provision_director(pool, username, "Director", "secret123")
        .expect("director");
    Actor::new(u.id, u.role)
}

pub fn monitor(pool: &mut DbPool, username: &str, name: &str) -> Actor {
    let u = UserLogic::register_monitor(pool, username, name, "secret123").expect("monitor");
    Actor::new(u.id, u.role)
}

/// Give `who` one slot, created by the monitor itself.
pub fn slot(pool: &mut DbPool, who: &Actor, weekday: i64, shift: &str, site: &str) -> ScheduleSlot {
    ScheduleLogic::create_slot(pool, who, who.id, &SlotInput::new(weekday, shift, site))
        .expect("slot")
}

/// Init a file DB through the binary, with one director (id 1) and one
/// monitor (id 2).
pub fn init_db_with_users(db_path: &str) {
    sl().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    sl().args([
        "--db", db_path, "user", "director", "boss", "Ana Director", "--password", "secret123",
    ])
    .assert()
    .success();

    sl().args([
        "--db", db_path, "user", "register", "mon", "Mario Monitor", "--password", "secret123",
    ])
    .assert()
    .success();
}
