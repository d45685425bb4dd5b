//! Fault report and feedback models and DTOs.

use chrono::NaiveDate;
use gridops_core::csv::CsvRecord;
use gridops_core::daily_records::{DailyRecordRow, FaultColumns};
use gridops_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A fault report joined with reporter and assignee names.
///
/// `attachment` is the storage path relative to the media root; the API
/// turns it into an `attachment_url`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct FaultReport {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub date_reported: NaiveDate,
    pub reported_by: Option<String>,
    pub assigned_to: Option<String>,
    pub assigned_to_id: Option<DbId>,
    pub location: String,
    pub severity: String,
    pub status: String,
    pub resolution_remarks: String,
    #[serde(skip_serializing)]
    pub attachment: Option<String>,
}

impl FaultReport {
    pub fn to_daily_row(&self) -> DailyRecordRow {
        DailyRecordRow::fault(
            self.id,
            self.date_reported,
            FaultColumns {
                reported_by: self.reported_by.as_deref(),
                location: &self.location,
                title: &self.title,
                description: &self.description,
                severity: &self.severity,
                status: &self.status,
                resolution_remarks: &self.resolution_remarks,
            },
        )
    }
}

impl CsvRecord for FaultReport {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "date_reported",
        "reported_by",
        "assigned_to",
        "location",
        "severity",
        "status",
        "resolution_remarks",
    ];

    fn values(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.description.clone(),
            self.date_reported.to_string(),
            self.reported_by.clone().unwrap_or_default(),
            self.assigned_to.clone().unwrap_or_default(),
            self.location.clone(),
            self.severity.clone(),
            self.status.clone(),
            self.resolution_remarks.clone(),
        ]
    }
}

/// DTO for inserting a fault report.
#[derive(Debug, Clone)]
pub struct CreateFaultReport {
    pub title: String,
    pub description: String,
    pub date_reported: NaiveDate,
    pub reported_by_id: Option<DbId>,
    pub location: String,
    pub severity: String,
    pub status: String,
    pub resolution_remarks: String,
    pub attachment: Option<String>,
}

/// Fields a PATCH may change. `None` leaves the column untouched;
/// `assigned_to_id: Some(None)` clears the assignment.
#[derive(Debug, Clone, Default)]
pub struct UpdateFaultReport {
    pub status: Option<String>,
    pub resolution_remarks: Option<String>,
    pub assigned_to_id: Option<Option<DbId>>,
}

impl UpdateFaultReport {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.resolution_remarks.is_none() && self.assigned_to_id.is_none()
    }
}

/// A row from `fault_feedbacks`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FaultFeedback {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub fault_id: DbId,
    pub staff_name: String,
    pub staff_email: String,
    pub feedback_text: String,
    pub date_submitted: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateFaultFeedback {
    pub fault_id: DbId,
    pub staff_name: String,
    pub staff_email: String,
    pub feedback_text: String,
}
