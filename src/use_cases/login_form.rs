use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::errors::AuthError;
use crate::domain::validation::{EmailRule, Validator};
use crate::domain::{Credentials, CredentialsState, FormSnapshot};

struct FormInner {
    state: CredentialsState,
    mounted: bool,
    in_flight: bool,
}

// Shared handle to one mounted login form. Clones point at the same form, so the
// event loop and an outstanding submit task see the same state.
#[derive(Clone)]
pub struct LoginForm {
    inner: Arc<Mutex<FormInner>>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FormInner {
                state: CredentialsState::new(),
                mounted: true,
                in_flight: false,
            })),
        }
    }

    // The lock is never held across an await, so a poisoned guard still holds
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, FormInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_email(&self, value: impl Into<String>) {
        self.lock().state.set_email(value);
    }

    pub fn set_password(&self, value: impl Into<String>) {
        self.lock().state.set_password(value);
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.lock().state.snapshot()
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().mounted
    }

    // Mirrors the disabled state of the submit control.
    pub fn is_submitting(&self) -> bool {
        self.lock().in_flight
    }

    // Called by the host when the form leaves the screen. Typed values are discarded
    // and any outstanding reply will be dropped.
    pub fn unmount(&self) {
        let mut inner = self.lock();
        inner.mounted = false;
        inner.state.clear();
    }

    // Gate a submit attempt. On success the form is marked in flight until the
    // returned submission is dropped.
    pub(crate) fn begin_submit<R>(&self, validator: &Validator<R>) -> Result<Submission<'_>, AuthError>
    where
        R: EmailRule,
    {
        let mut inner = self.lock();
        if !inner.mounted {
            return Err(AuthError::FormDismounted);
        }
        if inner.in_flight {
            return Err(AuthError::AlreadyInFlight);
        }

        let credentials = inner.state.credentials();
        if !validator.can_submit(&credentials) {
            return Err(AuthError::ValidationBlocked(Default::default()));
        }

        let errors = validator.validate(&credentials);
        if !errors.is_empty() {
            inner.state.record_errors(errors.clone());
            return Err(AuthError::ValidationBlocked(errors));
        }

        inner.in_flight = true;
        Ok(Submission {
            form: self,
            credentials,
        })
    }

    fn discard_credentials(&self) {
        self.lock().state.clear();
    }
}

// One accepted submit. The form stays in flight until this is dropped, so the
// whole dispatch (session commit included) runs under the single-flight flag.
pub(crate) struct Submission<'a> {
    form: &'a LoginForm,
    pub credentials: Credentials,
}

impl fmt::Debug for Submission<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission")
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl Submission<'_> {
    pub(crate) fn form_mounted(&self) -> bool {
        self.form.is_mounted()
    }

    pub(crate) fn discard_credentials(&self) {
        self.form.discard_credentials();
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        self.form.lock().in_flight = false;
    }
}
