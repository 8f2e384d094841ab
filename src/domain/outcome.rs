use crate::domain::errors::BoxError;
use crate::domain::session::Session;

// Closed set of in-band rejection codes sent by the login service.
// Anything else lands in `Other` so a new code can never be read as success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectCode {
    Incorrect,
    Password,
    Other(String),
}

impl RejectCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "incorrect" => RejectCode::Incorrect,
            "password" => RejectCode::Password,
            other => RejectCode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RejectCode::Incorrect => "incorrect",
            RejectCode::Password => "password",
            RejectCode::Other(code) => code,
        }
    }
}

// Decoded answer from a login request that reached the service.
#[derive(Clone, Debug, PartialEq)]
pub enum LoginReply {
    Authenticated(Session),
    Rejected(RejectCode),
}

// Result of one submit attempt; produced once per attempt that passed the gate.
#[derive(Debug)]
pub enum LoginResult {
    Success(Session),
    InvalidCredentials(RejectCode),
    TransportError(BoxError),
}

impl From<Result<LoginReply, BoxError>> for LoginResult {
    fn from(value: Result<LoginReply, BoxError>) -> Self {
        match value {
            Ok(LoginReply::Authenticated(session)) => LoginResult::Success(session),
            Ok(LoginReply::Rejected(code)) => LoginResult::InvalidCredentials(code),
            Err(err) => LoginResult::TransportError(err),
        }
    }
}
