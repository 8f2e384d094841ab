use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::domain::errors::AuthError;
use crate::domain::{AuthProvider, EmailRule, Navigator, Notifier, SessionStore};
use crate::use_cases::{LoginForm, SignedIn, SubmitLoginUseCase};

// Input events coming from the host UI.
#[derive(Debug, Clone)]
pub enum FormEvent {
    EmailChanged(String),
    PasswordChanged(String),
    Submit,
    // The "create an account" link.
    CreateAccount,
    Unmount,
}

// Drives one login form from a single event stream.
pub struct FormDriver<A, S, N, R, E> {
    pub form: LoginForm,
    pub use_case: Arc<SubmitLoginUseCase<A, S, N, R, E>>,
    pub register_route: String,
}

impl<A, S, N, R, E> FormDriver<A, S, N, R, E>
where
    A: AuthProvider + 'static,
    S: SessionStore + 'static,
    N: Notifier + 'static,
    R: Navigator + 'static,
    E: EmailRule + 'static,
{
    // Runs until the form unmounts or the sender side closes, then waits for
    // outstanding submits and returns their results in completion order.
    pub async fn run(
        self,
        mut events: mpsc::Receiver<FormEvent>,
    ) -> Vec<Result<SignedIn, AuthError>> {
        // Submits run as their own tasks so input keeps flowing while a request is out.
        let mut submits = JoinSet::new();

        while let Some(event) = events.recv().await {
            match event {
                FormEvent::EmailChanged(value) => self.form.set_email(value),
                FormEvent::PasswordChanged(value) => self.form.set_password(value),
                FormEvent::Submit => {
                    let form = self.form.clone();
                    let use_case = Arc::clone(&self.use_case);
                    submits.spawn(async move { use_case.execute(&form).await });
                }
                FormEvent::CreateAccount => {
                    self.use_case.navigator.navigate_to(&self.register_route);
                }
                FormEvent::Unmount => {
                    self.form.unmount();
                    break;
                }
            }
        }

        let mut results = Vec::new();
        while let Some(joined) = submits.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(err) => tracing::error!(error = %err, "submit task failed."),
            }
        }
        results
    }
}
