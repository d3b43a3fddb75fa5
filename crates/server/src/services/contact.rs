//! Contact form validation.
//!
//! The form collects a name, an email address and an optional message.
//! Nothing else is accepted or forwarded.

use honor_culture_core::Email;
use serde::Deserialize;

use crate::error::AppError;

/// Minimum length of the trimmed full name.
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum length of the free-text message.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Raw contact form body.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactSubmission {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// A validated contact form.
#[derive(Debug, Clone)]
pub struct ContactForm {
    pub full_name: String,
    pub email: Email,
    pub message: Option<String>,
}

impl ContactSubmission {
    /// Validate the submission.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Rejected` naming the first problem found.
    pub fn validate(self) -> Result<ContactForm, AppError> {
        let full_name = self
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let email = self.email.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let (Some(full_name), Some(email)) = (full_name, email) else {
            return Err(AppError::Rejected("Missing required information".to_string()));
        };

        if full_name.chars().count() < MIN_NAME_LENGTH {
            return Err(AppError::Rejected(format!(
                "Minimum {MIN_NAME_LENGTH} characters required"
            )));
        }

        let email =
            Email::parse(email).map_err(|_| AppError::Rejected("Valid email required".to_string()))?;

        let message = self
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        if message
            .as_ref()
            .is_some_and(|m| m.chars().count() > MAX_MESSAGE_LENGTH)
        {
            return Err(AppError::Rejected(format!(
                "Message must be at most {MAX_MESSAGE_LENGTH} characters"
            )));
        }

        Ok(ContactForm {
            full_name: full_name.to_string(),
            email,
            message,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn submission(name: &str, email: &str) -> ContactSubmission {
        ContactSubmission {
            full_name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: None,
        }
    }

    fn rejection(result: Result<ContactForm, AppError>) -> String {
        match result {
            Err(AppError::Rejected(message)) => message,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_fields() {
        let result = ContactSubmission::default().validate();
        assert_eq!(rejection(result), "Missing required information");

        let result = submission("Jane", "   ").validate();
        assert_eq!(rejection(result), "Missing required information");
    }

    #[test]
    fn test_short_name() {
        let result = submission(" J ", "jane@example.com").validate();
        assert_eq!(rejection(result), "Minimum 2 characters required");
    }

    #[test]
    fn test_invalid_email() {
        let result = submission("Jane", "jane@localhost").validate();
        assert_eq!(rejection(result), "Valid email required");
    }

    #[test]
    fn test_long_message() {
        let mut form = submission("Jane", "jane@example.com");
        form.message = Some("x".repeat(MAX_MESSAGE_LENGTH + 1));
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_valid_submission_is_trimmed() {
        let mut form = submission("  Jane Doe ", " jane@example.com ");
        form.message = Some("   ".to_string());
        let form = form.validate().unwrap();
        assert_eq!(form.full_name, "Jane Doe");
        assert_eq!(form.email.as_str(), "jane@example.com");
        assert!(form.message.is_none());
    }
}
