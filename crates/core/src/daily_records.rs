//! Unified row shape for the daily-records CSV export.
//!
//! Server-room entries, field activities and fault reports are flattened
//! into one schema with a `type` discriminator. Entity-specific fields are
//! mapped onto the shared columns (e.g. a field activity's `work_done`
//! becomes `description`).

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::csv::{opt, CsvRecord};
use crate::types::DbId;

/// Discriminator for a flattened daily record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    ServerRoom,
    FieldActivity,
    Fault,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::ServerRoom => "server_room",
            RecordKind::FieldActivity => "field_activity",
            RecordKind::Fault => "fault",
        }
    }
}

/// One row of the daily-records export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecordRow {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub id: DbId,
    pub staff: String,
    pub substation_or_location: String,
    pub date: NaiveDate,
    pub time_in: Option<NaiveTime>,
    pub time_out: Option<NaiveTime>,
    pub title: String,
    pub description: String,
    pub severity: String,
    pub status: String,
    pub resolution_remarks: String,
}

impl DailyRecordRow {
    /// A row with only the common identity columns filled in.
    fn blank(kind: RecordKind, id: DbId, date: NaiveDate) -> Self {
        Self {
            kind,
            id,
            staff: String::new(),
            substation_or_location: String::new(),
            date,
            time_in: None,
            time_out: None,
            title: String::new(),
            description: String::new(),
            severity: String::new(),
            status: String::new(),
            resolution_remarks: String::new(),
        }
    }

    pub fn server_room(
        id: DbId,
        staff: &str,
        date: NaiveDate,
        time_in: NaiveTime,
        time_out: Option<NaiveTime>,
        reason: &str,
    ) -> Self {
        Self {
            staff: staff.to_string(),
            time_in: Some(time_in),
            time_out,
            description: reason.to_string(),
            ..Self::blank(RecordKind::ServerRoom, id, date)
        }
    }

    /// Departure/return times map onto the in/out columns.
    pub fn field_activity(
        id: DbId,
        staff: &str,
        substation: &str,
        date: NaiveDate,
        time_out: NaiveTime,
        time_returned: Option<NaiveTime>,
        work_done: &str,
    ) -> Self {
        Self {
            staff: staff.to_string(),
            substation_or_location: substation.to_string(),
            time_in: Some(time_out),
            time_out: time_returned,
            description: work_done.to_string(),
            ..Self::blank(RecordKind::FieldActivity, id, date)
        }
    }

    pub fn fault(id: DbId, date_reported: NaiveDate, fault: FaultColumns<'_>) -> Self {
        Self {
            staff: fault.reported_by.unwrap_or_default().to_string(),
            substation_or_location: fault.location.to_string(),
            title: fault.title.to_string(),
            description: fault.description.to_string(),
            severity: fault.severity.to_string(),
            status: fault.status.to_string(),
            resolution_remarks: fault.resolution_remarks.to_string(),
            ..Self::blank(RecordKind::Fault, id, date_reported)
        }
    }
}

/// Borrowed fault fields used to build a [`DailyRecordRow`].
#[derive(Debug, Clone, Copy)]
pub struct FaultColumns<'a> {
    pub reported_by: Option<&'a str>,
    pub location: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub severity: &'a str,
    pub status: &'a str,
    pub resolution_remarks: &'a str,
}

impl CsvRecord for DailyRecordRow {
    const COLUMNS: &'static [&'static str] = &[
        "type",
        "id",
        "staff",
        "substation_or_location",
        "date",
        "time_in",
        "time_out",
        "title",
        "description",
        "severity",
        "status",
        "resolution_remarks",
    ];

    fn values(&self) -> Vec<String> {
        vec![
            self.kind.as_str().to_string(),
            self.id.to_string(),
            self.staff.clone(),
            self.substation_or_location.clone(),
            self.date.to_string(),
            opt(self.time_in),
            opt(self.time_out),
            self.title.clone(),
            self.description.clone(),
            self.severity.clone(),
            self.status.clone(),
            self.resolution_remarks.clone(),
        ]
    }
}

/// Export file name for one day.
pub fn daily_records_filename(date: NaiveDate) -> String {
    format!("daily_records_{date}.csv")
}
