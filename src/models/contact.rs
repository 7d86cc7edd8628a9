//! Contact form submitted from a property detail page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::AppResult;

/// Raw contact form body (`application/x-www-form-urlencoded`).
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct ContactForm {
    #[validate(length(min = 2, max = 100, message = "The first name must be between 2 and 100 characters."))]
    pub firstname: String,
    #[validate(length(min = 2, max = 100, message = "The last name must be between 2 and 100 characters."))]
    pub lastname: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(
        email(message = "The email must be a valid email address."),
        length(max = 255, message = "The email may not be longer than 255 characters.")
    )]
    pub email: String,
    #[validate(length(min = 4, max = 2000, message = "The message must be between 4 and 2000 characters."))]
    pub message: String,
}

/// Phone numbers: 8 to 15 digits, optionally separated by spaces or `+ . - ( )`.
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '.' | '-' | '(' | ')'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();

    if allowed && (8..=15).contains(&digits) {
        Ok(())
    } else {
        Err(ValidationError::new("phone")
            .with_message("The phone must be a valid phone number.".into()))
    }
}

/// A contact request that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ContactSubmission {
    pub firstname: String,
    pub lastname: String,
    pub phone: Option<String>,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Trim every field; a blank phone counts as absent.
    pub fn trimmed(&self) -> Self {
        ContactForm {
            firstname: self.firstname.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            phone: self
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    /// Input to re-display next to field errors.
    pub fn old_input(&self) -> BTreeMap<String, String> {
        let mut old = BTreeMap::new();
        old.insert("firstname".to_string(), self.firstname.clone());
        old.insert("lastname".to_string(), self.lastname.clone());
        old.insert("phone".to_string(), self.phone.clone().unwrap_or_default());
        old.insert("email".to_string(), self.email.clone());
        old.insert("message".to_string(), self.message.clone());
        old
    }

    /// Validate the trimmed form into a submission.
    pub fn into_submission(self) -> AppResult<ContactSubmission> {
        let form = self.trimmed();
        form.validate()?;

        Ok(ContactSubmission {
            firstname: form.firstname,
            lastname: form.lastname,
            phone: form.phone,
            email: form.email,
            message: form.message,
        })
    }
}

impl ContactSubmission {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}
