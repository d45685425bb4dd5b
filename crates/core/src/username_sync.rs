//! Planning for the `sync-usernames` admin command.
//!
//! Copies a source field (staff id or email) into each user's username.
//! Planning is pure; applying the plan is the repository's job.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::DbId;

/// User column the new username is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncField {
    StaffId,
    Email,
}

impl SyncField {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncField::StaffId => "staff_id",
            SyncField::Email => "email",
        }
    }
}

impl fmt::Display for SyncField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staff_id" => Ok(SyncField::StaffId),
            "email" => Ok(SyncField::Email),
            other => Err(CoreError::Validation(format!(
                "unknown source field '{other}' (expected staff_id or email)"
            ))),
        }
    }
}

/// A user with a non-empty source value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncCandidate {
    pub user_id: DbId,
    pub username: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRename {
    pub user_id: DbId,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Number of candidates before `limit` was applied.
    pub total_candidates: usize,
    /// Number of candidates actually examined.
    pub processed: usize,
    pub updates: Vec<PlannedRename>,
    /// Renames skipped because the desired username is taken.
    pub collisions: Vec<PlannedRename>,
}

/// Build the rename plan.
///
/// `existing` holds every username currently in use. `limit` of zero means
/// all candidates. A desired username claimed earlier in the same plan also
/// counts as a collision, so applying the plan never produces duplicates.
pub fn plan_username_sync(
    candidates: &[SyncCandidate],
    existing: &HashSet<String>,
    limit: usize,
) -> SyncPlan {
    let usable: Vec<&SyncCandidate> = candidates
        .iter()
        .filter(|c| !c.source.trim().is_empty())
        .collect();
    let total_candidates = usable.len();
    let take = if limit == 0 { usable.len() } else { limit.min(usable.len()) };

    let mut plan = SyncPlan {
        total_candidates,
        processed: take,
        ..SyncPlan::default()
    };
    let mut claimed: HashSet<&str> = HashSet::new();

    for candidate in &usable[..take] {
        let desired = candidate.source.trim();
        if candidate.username == desired {
            continue;
        }
        let rename = PlannedRename {
            user_id: candidate.user_id,
            from: candidate.username.clone(),
            to: desired.to_string(),
        };
        if existing.contains(desired) || !claimed.insert(desired) {
            plan.collisions.push(rename);
        } else {
            plan.updates.push(rename);
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(id: DbId, username: &str, source: &str) -> SyncCandidate {
        SyncCandidate {
            user_id: id,
            username: username.into(),
            source: source.into(),
        }
    }

    fn names(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_source_field() {
        assert_eq!("staff_id".parse::<SyncField>().unwrap(), SyncField::StaffId);
        assert_eq!("email".parse::<SyncField>().unwrap(), SyncField::Email);
        assert!("phone".parse::<SyncField>().is_err());
    }

    #[test]
    fn already_synced_users_are_skipped() {
        let plan = plan_username_sync(&[cand(1, "S100", "S100")], &names(&["S100"]), 0);
        assert!(plan.updates.is_empty());
        assert!(plan.collisions.is_empty());
        assert_eq!(plan.processed, 1);
    }

    #[test]
    fn taken_username_is_a_collision() {
        let candidates = [cand(1, "ama", "S100"), cand(2, "kofi", "S200")];
        let plan = plan_username_sync(&candidates, &names(&["ama", "kofi", "S100"]), 0);
        assert_eq!(plan.collisions.len(), 1);
        assert_eq!(plan.collisions[0].user_id, 1);
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].to, "S200");
    }

    #[test]
    fn duplicate_desired_values_collide_within_plan() {
        let candidates = [cand(1, "ama", "S100"), cand(2, "kofi", "S100")];
        let plan = plan_username_sync(&candidates, &names(&["ama", "kofi"]), 0);
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].user_id, 1);
        assert_eq!(plan.collisions.len(), 1);
        assert_eq!(plan.collisions[0].user_id, 2);
    }

    #[test]
    fn limit_caps_processing_and_blank_sources_are_ignored() {
        let candidates = [
            cand(1, "a", "X1"),
            cand(2, "b", "  "),
            cand(3, "c", "X3"),
            cand(4, "d", "X4"),
        ];
        let plan = plan_username_sync(&candidates, &names(&["a", "b", "c", "d"]), 2);
        assert_eq!(plan.total_candidates, 3);
        assert_eq!(plan.processed, 2);
        let ids: Vec<DbId> = plan.updates.iter().map(|u| u.user_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn source_values_are_trimmed() {
        let plan = plan_username_sync(&[cand(1, "a", " S9 ")], &names(&["a"]), 0);
        assert_eq!(plan.updates[0].to, "S9");
    }
}
