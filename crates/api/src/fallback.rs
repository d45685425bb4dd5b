//! In-process record lists used when the database rejects a write.
//!
//! Each list lives for the lifetime of the process. Ids are assigned as
//! `len + 1` and may overlap with database ids.

use gridops_core::types::DbId;
use gridops_db::models::fault::FaultReport;
use gridops_db::models::field_activity::FieldActivity;
use gridops_db::models::server_room::{ServerRoomEntry, ServerRoomVisitor};
use tokio::sync::RwLock;

/// One append-only list of fallback records.
#[derive(Debug)]
pub struct FallbackList<T> {
    items: RwLock<Vec<T>>,
}

impl<T> Default for FallbackList<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Clone> FallbackList<T> {
    /// Append a record built from the next id and return a copy of it.
    ///
    /// The id is computed under the write lock so concurrent pushes never
    /// share one.
    pub async fn push(&self, build: impl FnOnce(DbId) -> T) -> T {
        let mut items = self.items.write().await;
        let record = build(items.len() as DbId + 1);
        items.push(record.clone());
        record
    }

    pub async fn snapshot(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    /// Records matching `keep`, in insertion order.
    pub async fn filtered(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.items
            .read()
            .await
            .iter()
            .filter(|item| keep(item))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

/// Fallback lists for every record kind that can be created while the
/// database is unavailable.
#[derive(Debug, Default)]
pub struct FallbackStore {
    pub server_room_entries: FallbackList<ServerRoomEntry>,
    pub visitors: FallbackList<ServerRoomVisitor>,
    pub field_activities: FallbackList<FieldActivity>,
    pub faults: FallbackList<FaultReport>,
}

/// `primary` followed by `fallback`, or only `fallback` (with a warning)
/// when the primary read failed.
pub fn merge_with_fallback<T>(
    source: &str,
    primary: Result<Vec<T>, sqlx::Error>,
    fallback: Vec<T>,
) -> Vec<T> {
    match primary {
        Ok(mut rows) => {
            rows.extend(fallback);
            rows
        }
        Err(e) => {
            tracing::warn!(source, error = %e, "Database read failed, serving fallback records");
            fallback
        }
    }
}
