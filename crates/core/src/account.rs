//! Account rules shared by the auth endpoints and the admin CLI.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Role claim for staff (admin) accounts.
pub const ROLE_ADMIN: &str = "admin";
/// Role claim for everyone else.
pub const ROLE_USER: &str = "user";

pub fn role_for(is_staff: bool) -> &'static str {
    if is_staff {
        ROLE_ADMIN
    } else {
        ROLE_USER
    }
}

/// A login identifier containing `@` is resolved as an email first.
pub fn looks_like_email(identifier: &str) -> bool {
    identifier.contains('@')
}

/// Compare two addresses ignoring surrounding whitespace and case.
pub fn emails_match(stored: &str, supplied: &str) -> bool {
    stored.trim().to_lowercase() == supplied.trim().to_lowercase()
}

/// Reject anything that is not a syntactically valid address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("'{email}' is not a valid email")))
    }
}

/// Outcome of checking a password-recovery request against the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryCheck {
    /// The stored email matched the supplied one.
    Verified,
    /// The account had no email; the supplied one should be stored.
    AdoptEmail(String),
}

/// Decide whether a user may set their own password.
///
/// When the account has a stored email it must match `supplied_email`;
/// after that, only accounts without a usable password qualify.
pub fn check_recovery(
    stored_email: Option<&str>,
    has_usable_password: bool,
    supplied_email: &str,
) -> Result<RecoveryCheck, CoreError> {
    let check = match stored_email.map(str::trim).filter(|e| !e.is_empty()) {
        Some(stored) if emails_match(stored, supplied_email) => RecoveryCheck::Verified,
        Some(_) => return Err(CoreError::Forbidden("email does not match".into())),
        None => RecoveryCheck::AdoptEmail(supplied_email.trim().to_string()),
    };
    if has_usable_password {
        return Err(CoreError::Validation("password already set".into()));
    }
    Ok(check)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn role_follows_staff_flag() {
        assert_eq!(role_for(true), "admin");
        assert_eq!(role_for(false), "user");
    }

    #[test]
    fn email_comparison_ignores_case_and_padding() {
        assert!(emails_match("Ama.Mensah@Grid.example", "  ama.mensah@grid.example "));
        assert!(!emails_match("ama@grid.example", "kofi@grid.example"));
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("tech@grid.example").is_ok());
        assert_matches!(validate_email("not-an-email"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn recovery_requires_unusable_password() {
        let err = check_recovery(Some("a@b.example"), true, "a@b.example").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: password already set");
    }

    #[test]
    fn recovery_with_matching_email_is_verified() {
        assert_eq!(
            check_recovery(Some("A@B.example"), false, "a@b.example ").unwrap(),
            RecoveryCheck::Verified
        );
    }

    #[test]
    fn email_mismatch_is_reported_before_existing_password() {
        assert_matches!(
            check_recovery(Some("a@b.example"), true, "c@d.example"),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn recovery_with_other_email_is_forbidden() {
        assert_matches!(
            check_recovery(Some("a@b.example"), false, "c@d.example"),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn recovery_without_stored_email_adopts_supplied() {
        assert_eq!(
            check_recovery(None, false, " new@b.example ").unwrap(),
            RecoveryCheck::AdoptEmail("new@b.example".into())
        );
        assert_eq!(
            check_recovery(Some("  "), false, "new@b.example").unwrap(),
            RecoveryCheck::AdoptEmail("new@b.example".into())
        );
    }
}
