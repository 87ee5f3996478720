//! Input validation helpers shared across crates.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Accepts addresses like `user.name@example.co` with a 2-3 letter TLD.
    static ref EMAIL_RE: Regex =
        Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("valid email regex");
}

/// Normalize an email address for storage and comparison.
///
/// Emails are stored lowercase and trimmed so that uniqueness checks are
/// case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check whether a (already normalized) email address is well-formed.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Custom validator for use with `#[validate(custom(...))]` on request DTOs.
pub fn validate_email_format(email: &str) -> Result<(), validator::ValidationError> {
    if is_valid_email(&normalize_email(email)) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("email_format");
        err.message = Some("Please fill a valid email address".into());
        Err(err)
    }
}
