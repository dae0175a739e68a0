// Display formatting for table cells (USD, en-US grouping)

use itertools::Itertools;

const MISSING: &str = "n/a";

/// Price with a leading dollar sign and no grouping: `$67234.12`.
pub fn price(value: f64) -> String {
    format!("${}", plain(value))
}

/// Plain number, shortest form that round-trips: `28765432109`, `0.05`.
pub fn plain(value: f64) -> String {
    format!("{value}")
}

/// Dollar amount with thousands separators and at most three decimals:
/// `$1,324,567,890,123`.
pub fn grouped_usd(value: f64) -> String {
    format!("${}", group_thousands(value))
}

pub fn percentage(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => MISSING.to_string(),
    }
}

pub fn group_thousands(value: f64) -> String {
    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let head = digits.len() % 3;
    let mut groups: Vec<String> = Vec::new();
    if head > 0 {
        groups.push(digits[..head].iter().collect());
    }
    for chunk in &digits[head..].iter().chunks(3) {
        groups.push(chunk.collect());
    }

    let sign = if value < 0.0 && rounded.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    let mut out = format!("{sign}{}", groups.iter().join(","));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
