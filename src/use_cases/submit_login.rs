use std::time::Duration;

use crate::domain::errors::AuthError;
use crate::domain::notification::SIGNED_IN_MESSAGE;
use crate::domain::validation::{SyntaxEmailRule, Validator};
use crate::domain::{
    AuthProvider, EmailRule, LoginResult, Navigator, Notification, Notifier, RejectCode,
    SessionStore,
};
use crate::use_cases::login_form::{LoginForm, Submission};

// What to do with a request that never produced an answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportFailurePolicy {
    // Log and show a generic error notification.
    #[default]
    Notify,
    // Log only.
    Silent,
}

// Host-facing knobs for the outcome dispatcher.
#[derive(Clone, Debug)]
pub struct DispatchPolicy {
    pub home_route: String,
    pub toast_duration: Duration,
    pub transport_failure: TransportFailurePolicy,
    // Body of the success toast; the title always names the user.
    pub signed_in_message: String,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            home_route: "/".to_string(),
            toast_duration: Duration::from_millis(2000),
            transport_failure: TransportFailurePolicy::Notify,
            signed_in_message: SIGNED_IN_MESSAGE.to_string(),
        }
    }
}

// Response returned by the submit use case after a session was committed.
#[derive(Debug, PartialEq, Eq)]
pub struct SignedIn {
    pub email: String,
}

// Submit use case with injected dependencies: gate, request, then dispatch.
pub struct SubmitLoginUseCase<A, S, N, R, E = SyntaxEmailRule> {
    pub auth: A,
    pub sessions: S,
    pub notifier: N,
    pub navigator: R,
    pub validator: Validator<E>,
    pub policy: DispatchPolicy,
}

impl<A, S, N, R, E> SubmitLoginUseCase<A, S, N, R, E>
where
    A: AuthProvider,
    S: SessionStore,
    N: Notifier,
    R: Navigator,
    E: EmailRule,
{
    #[tracing::instrument(name = "submit_login", skip_all, fields(email = tracing::field::Empty))]
    pub async fn execute(&self, form: &LoginForm) -> Result<SignedIn, AuthError> {
        // Holding the submission keeps the form in flight until dispatch returns.
        let submission = form.begin_submit(&self.validator).inspect_err(|err| {
            tracing::debug!(error = %err, "submit refused");
        })?;
        let email = submission.credentials.email.as_str();
        tracing::Span::current().record("email", email);

        let result = LoginResult::from(self.auth.login(&submission.credentials).await);

        // The host may have dismantled the form while the request was outstanding.
        if !submission.form_mounted() {
            tracing::info!("form unmounted before the login reply arrived; dropping it");
            return Err(AuthError::FormDismounted);
        }

        self.dispatch(&submission, result).await
    }

    async fn dispatch(
        &self,
        submission: &Submission<'_>,
        result: LoginResult,
    ) -> Result<SignedIn, AuthError> {
        let duration = self.policy.toast_duration;
        let email = submission.credentials.email.as_str();

        match result {
            LoginResult::Success(session) => {
                let committed = self.sessions.commit(session).await;

                // The commit stands either way, but a form that went away while it
                // was pending gets no toast and no navigation.
                if !submission.form_mounted() {
                    tracing::info!(
                        committed = committed.is_ok(),
                        "form unmounted while the session was being stored; skipping feedback"
                    );
                    return Err(AuthError::FormDismounted);
                }

                if let Err(err) = committed {
                    tracing::error!(error = %err, "failed to commit session.");
                    self.notifier.notify(Notification::generic_failure(duration));
                    return Err(AuthError::StorageFailure(err));
                }

                let signed_in = SignedIn {
                    email: email.to_string(),
                };
                submission.discard_credentials();
                self.notifier.notify(Notification::signed_in(
                    &signed_in.email,
                    &self.policy.signed_in_message,
                    duration,
                ));
                self.navigator.navigate_to(&self.policy.home_route);
                tracing::info!(route = %self.policy.home_route, "login succeeded.");

                Ok(signed_in)
            }
            LoginResult::InvalidCredentials(RejectCode::Other(code)) => {
                tracing::warn!(code = %code, "login rejected with an unrecognized code.");
                self.notifier.notify(Notification::generic_failure(duration));
                Err(AuthError::UnrecognizedRejection(code))
            }
            LoginResult::InvalidCredentials(code) => {
                // Same message for every code so the reply does not reveal which field was wrong.
                tracing::info!(code = code.as_str(), "login rejected.");
                self.notifier
                    .notify(Notification::invalid_credentials(duration));
                Err(AuthError::InvalidCredentials)
            }
            LoginResult::TransportError(err) => {
                tracing::error!(error = %err, "login request failed.");
                if self.policy.transport_failure == TransportFailurePolicy::Notify {
                    self.notifier.notify(Notification::generic_failure(duration));
                }
                Err(AuthError::TransportFailure(err.to_string()))
            }
        }
    }
}
