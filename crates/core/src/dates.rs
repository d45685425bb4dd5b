//! Date and time parsing plus the reporting windows used by the dashboard
//! and the activity-report exports.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::CoreError;

/// Wire format for calendar dates (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days covered by a weekly activity report (inclusive of both ends).
pub const WEEKLY_REPORT_DAYS: u64 = 7;

/// Parse an ISO calendar date, naming `field` in the error.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        CoreError::Validation(format!(
            "{field} must be a date in YYYY-MM-DD format (got '{value}')"
        ))
    })
}

/// Parse a wall-clock time. Accepts `HH:MM`, `HH:MM:SS` and fractional seconds.
pub fn parse_time(field: &str, value: &str) -> Result<NaiveTime, CoreError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| {
            CoreError::Validation(format!(
                "{field} must be a time in HH:MM[:SS] format (got '{value}')"
            ))
        })
}

/// Parse an optional query-string date; empty strings count as absent.
pub fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, CoreError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date(field, v).map(Some),
    }
}

/// The `days` calendar days ending at `today`, oldest first.
pub fn trailing_window(today: NaiveDate, days: usize) -> Vec<NaiveDate> {
    (0..days as u64)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .collect()
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::Validation(format!(
                "start ({start}) must not be after end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// File name for an activity-report export covering this range.
    pub fn report_filename(&self) -> String {
        format!("activity_reports_{}_{}.csv", self.start, self.end)
    }
}

/// Resolve the weekly report window.
///
/// `end` defaults to `today`; `start` defaults to six days before `end`.
pub fn weekly_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateRange, CoreError> {
    let end = end.unwrap_or(today);
    let start = match start {
        Some(s) => s,
        None => end
            .checked_sub_days(Days::new(WEEKLY_REPORT_DAYS - 1))
            .ok_or_else(|| CoreError::Validation("end date is out of range".into()))?,
    };
    DateRange::new(start, end)
}

/// Parse `YYYY-MM` into the first and last day of that month.
pub fn month_range(month: &str) -> Result<DateRange, CoreError> {
    let invalid = || CoreError::Validation(format!("month must be in YYYY-MM format (got '{month}')"));

    let (year, mon) = month.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let mon: u32 = mon.parse().map_err(|_| invalid())?;

    let first = NaiveDate::from_ymd_opt(year, mon, 1).ok_or_else(invalid)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;
    DateRange::new(first, last)
}

/// Resolve the monthly report window.
///
/// An explicit `start` + `end` pair wins, then a named `month`, otherwise the
/// first of the current month through `today`.
pub fn monthly_range(
    month: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateRange, CoreError> {
    if let (Some(start), Some(end)) = (start, end) {
        return DateRange::new(start, end);
    }
    match month.map(str::trim) {
        Some(m) if !m.is_empty() => month_range(m),
        _ => {
            let first = today.with_day(1).unwrap_or(today);
            DateRange::new(first, today)
        }
    }
}
