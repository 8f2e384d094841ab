use std::fmt;

use crate::domain::credentials::FieldErrors;

// Error type returned by the auth port. Boxed so adapters keep their own error enums.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// Domain-level errors for the login workflows. All of them leave the form usable.
#[derive(Debug)]
pub enum AuthError {
    // Submit attempted with a missing or malformed field; nothing was sent.
    ValidationBlocked(FieldErrors),
    // A previous submit from the same form has not resolved yet.
    AlreadyInFlight,
    InvalidCredentials,
    // The service answered with a rejection code outside the known set.
    UnrecognizedRejection(String),
    TransportFailure(String),
    StorageFailure(String),
    // The form went away before the reply arrived; the reply was dropped.
    FormDismounted,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::ValidationBlocked(errors) => {
                if errors.is_empty() {
                    write!(f, "email and password are required")
                } else {
                    let fields: Vec<&str> = errors.iter().map(|(field, _)| field.as_str()).collect();
                    write!(f, "invalid fields: {}", fields.join(", "))
                }
            }
            AuthError::AlreadyInFlight => write!(f, "a login request is already in flight"),
            AuthError::InvalidCredentials => write!(f, "credentials were rejected"),
            AuthError::UnrecognizedRejection(code) => {
                write!(f, "login rejected with unrecognized code {code:?}")
            }
            AuthError::TransportFailure(cause) => write!(f, "login request failed: {cause}"),
            AuthError::StorageFailure(cause) => write!(f, "session storage failed: {cause}"),
            AuthError::FormDismounted => write!(f, "login form was unmounted"),
        }
    }
}

impl std::error::Error for AuthError {}
