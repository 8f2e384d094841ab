use std::time::Duration;

pub const INVALID_CREDENTIALS_MESSAGE: &str =
    "Your username, email, password, or one-time password was incorrect.";
pub const GENERIC_FAILURE_MESSAGE: &str =
    "We could not sign you in right now. Please try again.";
pub const SIGNED_IN_MESSAGE: &str =
    "You have successfully logged in as a user to Pharao´s world. Now you can start to play. Enjoy!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

// Transient, non-blocking user-facing message. Hosts dismiss it after `duration`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub duration: Duration,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: message.into(),
            duration,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            message: message.into(),
            duration,
        }
    }

    pub fn signed_in(email: &str, message: &str, duration: Duration) -> Self {
        Self::success(format!("Welcome, {email}"), message, duration)
    }

    pub fn invalid_credentials(duration: Duration) -> Self {
        Self::error("Error", INVALID_CREDENTIALS_MESSAGE, duration)
    }

    pub fn generic_failure(duration: Duration) -> Self {
        Self::error("Error", GENERIC_FAILURE_MESSAGE, duration)
    }
}
