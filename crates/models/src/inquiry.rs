//! Public form payloads: contact enquiries and password-reset requests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Validation messages keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: String,
}

fn push(errors: &mut FieldErrors, field: &str, msg: &str) {
    errors.entry(field.to_string()).or_default().push(msg.to_string());
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() { push(&mut errors, "name", "Name is required"); }
        if !is_valid_email(&self.email) { push(&mut errors, "email", "Invalid email address"); }
        if self.message.trim().is_empty() { push(&mut errors, "message", "Message is required"); }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl ForgotPasswordForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !is_valid_email(&self.email) { push(&mut errors, "email", "Invalid email address"); }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Pragmatic address check: `local@domain.tld`, no whitespace, non-empty labels.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else { return false };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}
