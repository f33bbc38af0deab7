//! Records returned by `get_record` and the ranges used to request them.

use std::fmt;

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{prelude::*, Error, StreamLocator};

/// One observation of a stream, as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unix seconds, set for timestamp-keyed streams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<i64>,
    /// Calendar date, set for date-keyed streams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_value: Option<NaiveDate>,
    /// Decimal value kept verbatim
    pub value: String,
}

impl Record {
    /// Parse the decimal value. Unparsable or non-finite values are rejected.
    pub fn value_f64(&self) -> Result<f64> {
        match self.value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(Error::NonFiniteValue(self.value.clone())),
        }
    }

    /// Date when present, otherwise the timestamp.
    pub fn label(&self) -> String {
        match (self.date_value, self.event_time) {
            (Some(date), _) => date.format("%Y-%m-%d").to_string(),
            (None, Some(ts)) => ts.to_string(),
            (None, None) => "-".to_string(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.date_value, self.event_time) {
            (Some(date), _) => write!(f, "Date (DateValue): {date}, Value: {}", self.value),
            (None, Some(ts)) => write!(f, "Date (Timestamp): {ts}, Value: {}", self.value),
            (None, None) => write!(f, "Value: {}", self.value),
        }
    }
}

/// Bounded interval of a stream to fetch. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRange {
    Timestamps { from: i64, to: i64 },
    Dates { from: NaiveDate, to: NaiveDate },
}

impl RecordRange {
    pub fn timestamps(from: i64, to: i64) -> Result<Self> {
        if from > to {
            return Err(Error::InvalidRange(format!("{from} is after {to}")));
        }
        Ok(RecordRange::Timestamps { from, to })
    }

    pub fn dates(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(Error::InvalidRange(format!("{from} is after {to}")));
        }
        Ok(RecordRange::Dates { from, to })
    }

    /// First to last day of a calendar month.
    pub fn month_of(year: i32, month: u32) -> Result<Self> {
        let (from, to) = month_bounds(year, month)?;
        Self::dates(from, to)
    }

    /// First to last second of a calendar month, UTC.
    pub fn month_timestamps(year: i32, month: u32) -> Result<Self> {
        let (from, to) = month_bounds(year, month)?;
        let start = Utc
            .from_utc_datetime(&from.and_hms_opt(0, 0, 0).ok_or_else(|| bad_month(year, month))?)
            .timestamp();
        let end = Utc
            .from_utc_datetime(&to.and_hms_opt(23, 59, 59).ok_or_else(|| bad_month(year, month))?)
            .timestamp();
        Self::timestamps(start, end)
    }

    /// Render the bounds as action inputs.
    pub(crate) fn bounds_json(&self) -> (serde_json::Value, serde_json::Value) {
        match *self {
            RecordRange::Timestamps { from, to } => (from.into(), to.into()),
            RecordRange::Dates { from, to } => (
                from.format("%Y-%m-%d").to_string().into(),
                to.format("%Y-%m-%d").to_string().into(),
            ),
        }
    }
}

impl Default for RecordRange {
    /// January 2023, the window the bundled programs report on.
    fn default() -> Self {
        RecordRange::Dates {
            from: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            to: NaiveDate::from_ymd_opt(2023, 1, 31).unwrap_or_default(),
        }
    }
}

impl fmt::Display for RecordRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRange::Timestamps { from, to } => write!(f, "[{from}, {to}]"),
            RecordRange::Dates { from, to } => write!(f, "[{from}, {to}]"),
        }
    }
}

fn bad_month(year: i32, month: u32) -> Error {
    Error::InvalidRange(format!("no such month {year}-{month:02}"))
}

fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| bad_month(year, month))?;
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| bad_month(year, month))?;
    let last = next.pred_opt().ok_or_else(|| bad_month(year, month))?;
    Ok((first, last))
}

/// Arguments of a `get_record` call.
#[derive(Debug, Clone)]
pub struct GetRecordInput {
    pub locator: StreamLocator,
    pub range: RecordRange,
    /// Only consider data inserted at or before this block height
    pub frozen_at: Option<i64>,
}

impl GetRecordInput {
    pub fn new(locator: StreamLocator, range: RecordRange) -> Self {
        Self {
            locator,
            range,
            frozen_at: None,
        }
    }
}
