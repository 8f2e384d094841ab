use crate::domain::errors::AuthError;
use crate::domain::ports::{Navigator, SessionStore};

// Response returned by the logout use case.
pub struct LogoutResponse {
    pub revoked: bool,
}

// Logout use case with injected dependencies.
pub struct LogoutUseCase<S, R> {
    pub sessions: S,
    pub navigator: R,
    pub login_route: String,
}

impl<S, R> LogoutUseCase<S, R>
where
    S: SessionStore,
    R: Navigator,
{
    pub async fn execute(&self) -> Result<LogoutResponse, AuthError> {
        let revoked = self
            .sessions
            .clear()
            .await
            .map_err(AuthError::StorageFailure)?;

        self.navigator.navigate_to(&self.login_route);
        tracing::info!(revoked, "logged out.");

        Ok(LogoutResponse { revoked })
    }
}
