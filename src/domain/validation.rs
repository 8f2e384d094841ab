use validator::ValidateEmail;

use crate::domain::credentials::{Credentials, Field, FieldErrors};

pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address.";

// Swappable email-format predicate used by the validation pass.
pub trait EmailRule: Send + Sync {
    fn is_valid(&self, email: &str) -> bool;
}

// HTML5-style address check from the `validator` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyntaxEmailRule;

impl EmailRule for SyntaxEmailRule {
    fn is_valid(&self, email: &str) -> bool {
        email.validate_email()
    }
}

// Accepts any address; for hosts that validate the format themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnyEmail;

impl EmailRule for AnyEmail {
    fn is_valid(&self, _email: &str) -> bool {
        true
    }
}

// Submit is allowed only when both fields carry something.
pub fn can_submit(credentials: &Credentials) -> bool {
    !credentials.email.is_empty() && !credentials.password.is_empty()
}

#[derive(Clone, Debug, Default)]
pub struct Validator<R = SyntaxEmailRule> {
    rule: R,
}

impl<R> Validator<R>
where
    R: EmailRule,
{
    pub fn new(rule: R) -> Self {
        Self { rule }
    }

    pub fn can_submit(&self, credentials: &Credentials) -> bool {
        can_submit(credentials)
    }

    // Field-level pass run after the required-field gate.
    pub fn validate(&self, credentials: &Credentials) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !credentials.email.is_empty() && !self.rule.is_valid(&credentials.email) {
            errors.insert(Field::Email, INVALID_EMAIL_MESSAGE);
        }
        errors
    }
}
