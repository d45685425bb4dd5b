//! Fault report rules: status semantics, attachment validation and
//! assignee references.

use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Status given to reports created without one.
pub const STATUS_OPEN: &str = "open";
pub const STATUS_RESOLVED: &str = "resolved";
pub const STATUS_CLOSED: &str = "closed";

/// Statuses that take a fault out of the "active" count. Status is free
/// text; comparison is exact.
pub const INACTIVE_STATUSES: &[&str] = &[STATUS_RESOLVED, STATUS_CLOSED];

pub fn is_active(status: &str) -> bool {
    !INACTIVE_STATUSES.contains(&status)
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

/// Largest accepted attachment (10 MiB).
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// Lower-case file extensions accepted for attachments.
pub const ALLOWED_ATTACHMENT_EXTENSIONS: &[&str] = &[
    "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx", "xls", "xlsx", "txt", "csv",
];

/// Sub-directory (under the media root) attachments are written to.
pub const ATTACHMENT_DIR: &str = "attachments";

/// Strip any directory components and replace characters outside
/// `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "attachment".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Check size and extension. Returns the lower-cased extension.
pub fn validate_attachment(filename: &str, size: usize) -> Result<String, CoreError> {
    if size > MAX_ATTACHMENT_BYTES {
        return Err(CoreError::Validation(format!(
            "attachment exceeds maximum size of {} MB",
            MAX_ATTACHMENT_BYTES / (1024 * 1024)
        )));
    }

    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !ALLOWED_ATTACHMENT_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "attachment type '.{ext}' is not allowed. Allowed: {}",
            ALLOWED_ATTACHMENT_EXTENSIONS.join(", ")
        )));
    }
    Ok(ext)
}

// ---------------------------------------------------------------------------
// Assignee references
// ---------------------------------------------------------------------------

/// How a PATCH `assigned_to` value should be resolved to a staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeRef {
    /// `null`, `""` or `false`: remove the assignment.
    Clear,
    /// A JSON number: look up by id only.
    Id(DbId),
    /// An all-digit string: try id first, then case-insensitive name.
    IdOrName(DbId, String),
    /// Any other string: case-insensitive name.
    Name(String),
}

impl AssigneeRef {
    pub fn from_json(value: &Value) -> Result<Self, CoreError> {
        match value {
            Value::Null | Value::Bool(false) => Ok(Self::Clear),
            Value::String(s) if s.is_empty() => Ok(Self::Clear),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(Self::Clear),
                Some(id) => Ok(Self::Id(id)),
                None => Err(CoreError::Validation(
                    "assigned_to must be a staff id or name".into(),
                )),
            },
            Value::String(s) if s.chars().all(|c| c.is_ascii_digit()) => match s.parse() {
                Ok(id) => Ok(Self::IdOrName(id, s.clone())),
                Err(_) => Ok(Self::Name(s.clone())),
            },
            Value::String(s) => Ok(Self::Name(s.clone())),
            _ => Err(CoreError::Validation(
                "assigned_to must be a staff id or name".into(),
            )),
        }
    }

    /// The id to try first, if any.
    pub fn id(&self) -> Option<DbId> {
        match self {
            Self::Id(id) | Self::IdOrName(id, _) => Some(*id),
            _ => None,
        }
    }

    /// The name to fall back to, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::IdOrName(_, name) | Self::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Error for a reference that matched nobody.
    pub fn not_found(&self) -> CoreError {
        let key = match self {
            Self::Id(id) => id.to_string(),
            Self::IdOrName(_, name) | Self::Name(name) => name.clone(),
            Self::Clear => String::new(),
        };
        CoreError::NotFoundByKey { entity: "Staff", key }
    }
}
