//! Server-room entry and visitor models.

use chrono::{NaiveDate, NaiveTime};
use gridops_core::daily_records::DailyRecordRow;
use gridops_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A server-room visit joined with the staff member's name.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ServerRoomEntry {
    pub id: DbId,
    pub staff: String,
    pub date: NaiveDate,
    pub time_in: NaiveTime,
    pub time_out: Option<NaiveTime>,
    pub reason: String,
    pub equipment_touched: String,
    pub supervisor: String,
}

impl ServerRoomEntry {
    pub fn to_daily_row(&self) -> DailyRecordRow {
        DailyRecordRow::server_room(
            self.id,
            &self.staff,
            self.date,
            self.time_in,
            self.time_out,
            &self.reason,
        )
    }
}

/// DTO for logging a visit. `staff_id` is the resolved staff row.
#[derive(Debug, Clone)]
pub struct CreateServerRoomEntry {
    pub staff_id: DbId,
    pub date: NaiveDate,
    pub time_in: NaiveTime,
    pub time_out: Option<NaiveTime>,
    pub reason: String,
    pub equipment_touched: String,
    pub supervisor: String,
}

/// A row from `server_room_visitors`. `staff_id` is free text.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ServerRoomVisitor {
    pub id: DbId,
    pub staff_id: String,
    pub name: String,
    pub purpose: String,
    pub date: NaiveDate,
    pub time_in: NaiveTime,
    pub time_out: Option<NaiveTime>,
}

#[derive(Debug, Clone)]
pub struct CreateServerRoomVisitor {
    pub staff_id: String,
    pub name: String,
    pub purpose: String,
    pub date: NaiveDate,
    pub time_in: NaiveTime,
    pub time_out: Option<NaiveTime>,
}
