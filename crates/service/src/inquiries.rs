//! Contact enquiries and password-reset requests.
//!
//! Neither has a side effect beyond a log line, so both are safe to retry.

use models::inquiry::{ContactForm, FieldErrors, ForgotPasswordForm};
use tracing::info;

pub const CONTACT_RECEIVED: &str = "Message received successfully!";
pub const RESET_REQUESTED: &str =
    "If your email address is registered with us, you will receive a password reset link shortly.";

/// Accept a contact enquiry or return the per-field problems.
pub fn submit_contact(form: &ContactForm) -> Result<&'static str, FieldErrors> {
    form.validate()?;
    info!(
        event = "contact_received",
        name = %form.name.trim(),
        email = %form.email.trim(),
        message_len = form.message.trim().len(),
        "contact form submission received"
    );
    Ok(CONTACT_RECEIVED)
}

/// Acknowledge a reset request. The answer does not reveal whether the
/// address is known.
pub fn request_password_reset(form: &ForgotPasswordForm) -> Result<&'static str, FieldErrors> {
    form.validate()?;
    info!(event = "password_reset_requested", email = %form.email.trim(), "password reset requested");
    Ok(RESET_REQUESTED)
}
