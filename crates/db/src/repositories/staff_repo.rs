//! Repository for the `staff` table.

use gridops_core::types::DbId;
use sqlx::PgPool;

use crate::models::staff::{CreateStaff, Staff};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, is_active, created_at";

/// Provides lookups and writes for staff members.
pub struct StaffRepo;

impl StaffRepo {
    /// Return the staff member with exactly this name, creating it if absent.
    pub async fn get_or_create(pool: &PgPool, name: &str) -> Result<Staff, sqlx::Error> {
        let query = format!(
            "INSERT INTO staff (name) VALUES ($1)
             ON CONFLICT ON CONSTRAINT uq_staff_name DO UPDATE SET name = EXCLUDED.name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Insert a new staff member. A duplicate name violates `uq_staff_name`.
    pub async fn create(pool: &PgPool, input: &CreateStaff) -> Result<Staff, sqlx::Error> {
        let query = format!(
            "INSERT INTO staff (name, email) VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff WHERE id = $1");
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive name lookup. The oldest match wins.
    pub async fn find_by_name_ci(pool: &PgPool, name: &str) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM staff WHERE LOWER(name) = LOWER($1) ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Staff>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff ORDER BY name, id");
        sqlx::query_as::<_, Staff>(&query).fetch_all(pool).await
    }

    /// Set `is_active = false`. Returns the row, or `None` if no such id.
    pub async fn suspend(pool: &PgPool, id: DbId) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!("UPDATE staff SET is_active = false WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
