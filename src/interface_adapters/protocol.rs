use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{LoginReply, RejectCode, Session};

// Request payload for the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

// 2xx body from the login endpoint: either an `error` code or the session payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

// Error envelope some deployments attach to non-2xx replies.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl LoginResponseBody {
    // An `error` field wins over any payload next to it. Without one, both the
    // user and the access token must be present.
    pub fn into_reply(self) -> Result<LoginReply, String> {
        if let Some(code) = self.error {
            return Ok(LoginReply::Rejected(RejectCode::parse(&code)));
        }

        let user = self.user.ok_or_else(|| "missing user".to_string())?;
        let access_token = self
            .access_token
            .ok_or_else(|| "missing accessToken".to_string())?;

        Ok(LoginReply::Authenticated(Session {
            user,
            access_token,
            refresh_token: self.refresh_token,
        }))
    }
}
