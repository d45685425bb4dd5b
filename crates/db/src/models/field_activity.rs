//! Field activity model.

use chrono::{NaiveDate, NaiveTime};
use gridops_core::csv::{opt, CsvRecord};
use gridops_core::daily_records::DailyRecordRow;
use gridops_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A field trip joined with the staff member's name.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct FieldActivity {
    pub id: DbId,
    pub staff: String,
    pub substation: String,
    pub date: NaiveDate,
    pub time_out: NaiveTime,
    pub time_returned: Option<NaiveTime>,
    pub purpose: String,
    pub work_done: String,
    pub materials_used: String,
    pub supervisor_approval: String,
}

impl FieldActivity {
    pub fn to_daily_row(&self) -> DailyRecordRow {
        DailyRecordRow::field_activity(
            self.id,
            &self.staff,
            &self.substation,
            self.date,
            self.time_out,
            self.time_returned,
            &self.work_done,
        )
    }
}

impl CsvRecord for FieldActivity {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "staff",
        "substation",
        "date",
        "time_out",
        "time_returned",
        "purpose",
        "work_done",
        "materials_used",
        "supervisor_approval",
    ];

    fn values(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.staff.clone(),
            self.substation.clone(),
            self.date.to_string(),
            self.time_out.to_string(),
            opt(self.time_returned),
            self.purpose.clone(),
            self.work_done.clone(),
            self.materials_used.clone(),
            self.supervisor_approval.clone(),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct CreateFieldActivity {
    pub staff_id: DbId,
    pub substation: String,
    pub date: NaiveDate,
    pub time_out: NaiveTime,
    pub time_returned: Option<NaiveTime>,
    pub purpose: String,
    pub work_done: String,
    pub materials_used: String,
    pub supervisor_approval: String,
}
