//! User-facing status lines. Everything except `error` goes to stdout.

use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};
use std::fmt;

const BOLD: &str = "\x1b[1m";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{CYAN}{BOLD}ℹ️{RESET} {msg}");
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{GREEN}{BOLD}✅{RESET} {msg}");
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{YELLOW}{BOLD}⚠️{RESET} {msg}");
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{RED}{BOLD}❌{RESET} {msg}");
}

/// One rejected entry of a batch request, numbered from 1.
pub fn item_warning<T: fmt::Display>(item: usize, msg: T) {
    warning(format!("item {item}: {msg}"));
}

/// Report section title.
pub fn header<T: fmt::Display>(msg: T) {
    println!("{CYAN}{BOLD}=== {msg} ==={RESET}\n");
}
