use crate::domain::errors::BoxError;
use crate::domain::{AuthProvider, Credentials, LoginReply};
use crate::interface_adapters::protocol::{ErrorResponse, LoginRequest, LoginResponseBody};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;
use url::Url;

// Thin wrapper around reqwest for the remote login endpoint.
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    pub login_url: Url,
}

#[derive(Debug)]
pub enum AuthClientError {
    Transport(reqwest::Error),
    Upstream {
        status: StatusCode,
        message: Option<String>,
    },
    Decode(reqwest::Error),
    Malformed(String),
}

impl fmt::Display for AuthClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthClientError::Transport(err) => write!(f, "auth transport error: {err}"),
            AuthClientError::Upstream { status, message } => {
                if let Some(message) = message {
                    write!(f, "auth upstream error {status}: {message}")
                } else {
                    write!(f, "auth upstream error {status}")
                }
            }
            AuthClientError::Decode(err) => write!(f, "auth response decode error: {err}"),
            AuthClientError::Malformed(reason) => write!(f, "auth response malformed: {reason}"),
        }
    }
}

impl std::error::Error for AuthClientError {}

impl AuthClient {
    // No timeout unless one is configured; a silent endpoint leaves the submit pending.
    pub fn new(login_url: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            login_url,
        })
    }

    async fn post_login(&self, credentials: &Credentials) -> Result<LoginReply, AuthClientError> {
        let res = self
            .http
            .post(self.login_url.clone())
            .json(&LoginRequest {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(AuthClientError::Transport)?;
        let status = res.status();

        // Keep upstream status/message for the diagnostic log.
        if !status.is_success() {
            let message = res
                .json::<ErrorResponse>()
                .await
                .ok()
                .map(|payload| payload.message);
            return Err(AuthClientError::Upstream { status, message });
        }

        res.json::<LoginResponseBody>()
            .await
            .map_err(AuthClientError::Decode)?
            .into_reply()
            .map_err(AuthClientError::Malformed)
    }
}

#[async_trait]
impl AuthProvider for AuthClient {
    #[tracing::instrument(name = "auth_login", skip_all, fields(url = %self.login_url))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginReply, BoxError> {
        let reply = self.post_login(credentials).await?;
        tracing::debug!("login endpoint answered.");
        Ok(reply)
    }
}
