use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;
use chrono::{Datelike, Days, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Resolve an optional `YYYY-MM-DD` input.
///
/// Missing input means `today`. Unparsable input falls back to `today` with a
/// warning, unless `strict` is set, in which case it is refused.
pub fn resolve_date(input: Option<&str>, today: NaiveDate, strict: bool) -> AppResult<NaiveDate> {
    let Some(raw) = input.filter(|s| !s.trim().is_empty()) else {
        return Ok(today);
    };

    match parse_date(raw) {
        Some(d) => Ok(d),
        None if strict => Err(AppError::InvalidInput(format!(
            "invalid date '{}', expected YYYY-MM-DD",
            raw
        ))),
        None => {
            warning(format!("Invalid date '{}', using {} instead.", raw, today));
            Ok(today)
        }
    }
}

/// First and last day of a period written as `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
pub fn period_bounds(p: &str) -> Option<(NaiveDate, NaiveDate)> {
    let p = p.trim();

    // YYYY-MM-DD
    if let Some(d) = parse_date(p) {
        return Some((d, d));
    }

    // YYYY-MM
    if let Ok(first) = NaiveDate::parse_from_str(&format!("{}-01", p), "%Y-%m-%d") {
        return Some((first, last_day_of_month(first.year(), first.month())?));
    }

    // YYYY
    if p.len() == 4
        && let Ok(year) = p.parse::<i32>()
    {
        return Some((
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        ));
    }

    None
}

/// Bounds of a `FROM:TO` range where each side is a period; a single period
/// is accepted as well.
pub fn range_bounds(range: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let bad = || AppError::InvalidInput(format!("invalid period '{}'", range));

    let (from, to) = match range.split_once(':') {
        Some((a, b)) => {
            let (from, _) = period_bounds(a).ok_or_else(bad)?;
            let (_, to) = period_bounds(b).ok_or_else(bad)?;
            (from, to)
        }
        None => period_bounds(range).ok_or_else(bad)?,
    };

    check_range(from, to)?;
    Ok((from, to))
}

pub fn check_range(from: NaiveDate, to: NaiveDate) -> AppResult<()> {
    if from > to {
        return Err(AppError::InvalidInput(format!(
            "range start {} is after its end {}",
            from, to
        )));
    }
    Ok(())
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (y, m) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)?.pred_opt()
}

/// Current month of `today`, first to last day.
pub fn month_of(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let last = last_day_of_month(today.year(), today.month()).unwrap_or(today);
    (first, last)
}

/// Monday and Sunday of the ISO week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = date.weekday().num_days_from_monday() as u64;
    let monday = date - Days::new(offset);
    (monday, monday + Days::new(6))
}

/// Split `[from, to]` into ISO-week chunks, clamped to the range.
pub fn split_into_weeks(from: NaiveDate, to: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let mut out = Vec::new();
    let mut start = from;

    while start <= to {
        let (_, sunday) = week_bounds(start);
        let end = sunday.min(to);
        out.push((start, end));

        match end.succ_opt() {
            Some(next) => start = next,
            None => break,
        }
    }

    out
}

/// Number of days in `[from, to]`, never less than 1.
pub fn span_days(from: NaiveDate, to: NaiveDate) -> i64 {
    ((to - from).num_days() + 1).max(1)
}
