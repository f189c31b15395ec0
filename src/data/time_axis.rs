//! Date column interpretation for the chart X axis.
//!
//! Timestamps are converted to seconds since the UNIX epoch (naive times are taken as
//! UTC). Cells that cannot be read as a time become gaps instead of errors.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::data::table::parse_number;

/// How ambiguous `01/02/2024`-style dates are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateOrder {
    #[default]
    DayFirst,
    MonthFirst,
}

const ISO_DATETIME: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];
const DAY_FIRST_DATETIME: &[&str] = &[
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
];
const MONTH_FIRST_DATETIME: &[&str] = &[
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m-%d-%Y %H:%M:%S%.f",
    "%m-%d-%Y %H:%M",
];
const DAY_FIRST_DATE: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const MONTH_FIRST_DATE: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y"];

/// Parse one cell into epoch seconds.
pub fn parse_timestamp(cell: &str, order: DateOrder) -> Option<f64> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(to_seconds(dt.naive_utc()));
    }
    let (ambiguous_dt, ambiguous_d) = match order {
        DateOrder::DayFirst => (DAY_FIRST_DATETIME, DAY_FIRST_DATE),
        DateOrder::MonthFirst => (MONTH_FIRST_DATETIME, MONTH_FIRST_DATE),
    };
    for fmt in ISO_DATETIME.iter().chain(ambiguous_dt) {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(to_seconds(dt));
        }
    }
    for fmt in ambiguous_d {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(to_seconds);
        }
    }
    parse_number(s)
}

fn to_seconds(dt: NaiveDateTime) -> f64 {
    let utc = dt.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9
}

/// Parse every cell of a date column.
pub fn parse_column<'a, I>(cells: I, order: DateOrder) -> Vec<Option<f64>>
where
    I: IntoIterator<Item = &'a str>,
{
    cells
        .into_iter()
        .map(|c| parse_timestamp(c, order))
        .collect()
}

/// Shift times so that the earliest valid one is zero.
pub fn relative_seconds(times: &[Option<f64>]) -> Vec<Option<f64>> {
    let start = times.iter().flatten().copied().fold(f64::INFINITY, f64::min);
    if !start.is_finite() {
        return times.to_vec();
    }
    times.iter().map(|t| t.map(|v| v - start)).collect()
}

/// Whether the values look like epoch timestamps rather than small counters or offsets.
pub fn looks_like_epoch(times: &[Option<f64>]) -> bool {
    times.iter().flatten().any(|v| v.abs() > 1.0e8)
}

/// Tick / cursor label for an X value. `span` is the visible range in seconds.
pub fn format_epoch(seconds: f64, span: f64) -> String {
    let secs = seconds.floor() as i64;
    let nanos = ((seconds - secs as f64) * 1e9) as u32;
    let Some(dt) = DateTime::from_timestamp(secs, nanos) else {
        return format!("{seconds:.3}");
    };
    if span > 3.0 * 86_400.0 {
        dt.format("%Y-%m-%d").to_string()
    } else if span > 3_600.0 {
        dt.format("%d/%m %H:%M").to_string()
    } else if span > 10.0 {
        dt.format("%H:%M:%S").to_string()
    } else {
        dt.format("%H:%M:%S%.3f").to_string()
    }
}
