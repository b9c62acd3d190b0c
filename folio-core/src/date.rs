//! `D.M.Y` dates used by the timeline data and axis labels.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::TimelineError;

/// Parse a `D.M.Y` date (dot separated, leading zeros optional).
///
/// The split is strict: exactly three numeric components and a real
/// calendar day. Anything else is reported instead of being rolled over
/// into a neighbouring date.
pub fn parse_date(input: &str) -> Result<NaiveDate, TimelineError> {
    let invalid = || TimelineError::InvalidDate(input.to_string());

    let mut parts = input.split('.');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let day: u32 = parse_component(day).ok_or_else(invalid)?;
    let month: u32 = parse_component(month).ok_or_else(invalid)?;
    let year: i32 = parse_component(year).ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn parse_component<T: FromStr>(raw: &str) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Axis label format: day without padding, zero-padded month, full year.
pub fn format_axis_date(date: NaiveDate) -> String {
    format!("{}.{:02}.{}", date.day(), date.month(), date.year())
}

/// Whole days from `origin` to `date`, negative when `date` is earlier.
pub fn days_between(origin: NaiveDate, date: NaiveDate) -> f64 {
    date.signed_duration_since(origin).num_days() as f64
}
