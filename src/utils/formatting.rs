//! Formatting utilities used for CLI outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// `4.00h`, or `+2.50h` / `-1.00h` when `want_sign` is set.
pub fn fmt_hours(hours: f64, want_sign: bool) -> String {
    if want_sign && hours != 0.0 {
        format!("{:+.2}h", hours)
    } else {
        format!("{:.2}h", hours)
    }
}

/// Money with two decimals and `,` thousands separators: `1,234,567.50`.
pub fn fmt_money(amount: f64) -> String {
    let raw = format!("{:.2}", amount.abs());
    let (int_part, dec_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && raw != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{dec_part}")
}

/// `12.5%` with an explicit sign, or `n/a` when there is no base to compare.
pub fn fmt_percent(p: Option<f64>) -> String {
    match p {
        Some(v) => format!("{:+.1}%", v),
        None => "n/a".to_string(),
    }
}
