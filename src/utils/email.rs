use crate::error::{AppError, AppResult};
use regex::Regex;

/// Check that an address has the `local@domain.tld` shape
pub fn validate_email(email: &str) -> AppResult<()> {
    let email_regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map_err(|e| AppError::InternalError(format!("Invalid email pattern: {e}")))?;

    if !email_regex.is_match(email) {
        return Err(AppError::ValidationError(format!(
            "Invalid email address: {email}"
        )));
    }

    Ok(())
}

/// Trim and lower-case an address so uniqueness is not defeated by casing
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
