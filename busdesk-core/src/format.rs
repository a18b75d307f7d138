//! Display formatting for raw booking fields.
//!
//! Every formatter is total: input that does not parse renders as an empty
//! string.

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use serde::Deserialize;

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// `2024-11-15` -> `Nov 15, 2024`
pub fn format_date(value: &str) -> String {
    parse_date(value).map(format_naive_date).unwrap_or_default()
}

pub fn format_naive_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `21:05` -> `9:05 PM`
pub fn format_time(value: &str) -> String {
    parse_time(value)
        .map(|time| time.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

/// Groups thousands and keeps at most two fraction digits: `12500` ->
/// `12,500`, `1234.5` -> `1,234.5`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 4);
    if value < 0.0 && cents > 0 {
        grouped.push('-');
    }
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac {
        0 => grouped,
        f if f % 10 == 0 => format!("{}.{}", grouped, f / 10),
        f => format!("{}.{:02}", grouped, f),
    }
}

#[derive(Deserialize)]
struct RawNotes {
    notes: Option<String>,
}

/// Extracts `notes` from the serialized side-channel of a record.
pub fn parse_notes(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    serde_json::from_str::<RawNotes>(raw).ok().and_then(|r| r.notes)
}

/// Epoch milliseconds of a local wall-clock instant. `None` when the instant
/// does not exist in the local zone.
pub fn local_millis(date: NaiveDate, time: NaiveTime) -> Option<i64> {
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

/// Epoch milliseconds of `23:59:59.999` local time on `date`.
pub fn end_of_day_millis(date: NaiveDate) -> Option<i64> {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?;
    Local
        .from_local_datetime(&date.and_time(last))
        .latest()
        .map(|dt| dt.timestamp_millis())
}

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}
