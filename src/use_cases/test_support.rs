use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use crate::domain::errors::BoxError;
use crate::domain::validation::{SyntaxEmailRule, Validator};
use crate::domain::{
    AuthProvider, Credentials, LoginReply, Navigator, Notification, Notifier, RejectCode, Session,
    SessionStore,
};
use crate::use_cases::submit_login::{DispatchPolicy, SubmitLoginUseCase, TransportFailurePolicy};

pub(crate) type Reply = Result<LoginReply, String>;

pub(crate) fn session_for(user_id: u64, token: &str) -> Session {
    Session::new(json!({ "id": user_id, "role": "player" }), token)
}

pub(crate) fn authenticated(user_id: u64, token: &str) -> Reply {
    Ok(LoginReply::Authenticated(session_for(user_id, token)))
}

pub(crate) fn rejected(code: &str) -> Reply {
    Ok(LoginReply::Rejected(RejectCode::parse(code)))
}

pub(crate) fn unreachable_service() -> Reply {
    Err("connection refused".to_string())
}

// Auth fake that answers from a script and records every call it receives.
#[derive(Clone)]
pub(crate) struct ScriptedAuth {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    calls: Arc<Mutex<Vec<Credentials>>>,
    // When set, each call parks until the test releases it.
    gate: Option<Arc<Notify>>,
}

impl ScriptedAuth {
    pub(crate) fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    pub(crate) fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub(crate) fn calls(&self) -> Vec<Credentials> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl AuthProvider for ScriptedAuth {
    async fn login(&self, credentials: &Credentials) -> Result<LoginReply, BoxError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(credentials.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let reply = self
            .replies
            .lock()
            .expect("replies mutex poisoned")
            .pop_front()
            .expect("script ran out of replies");
        reply.map_err(BoxError::from)
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub commit: bool,
    pub clear: bool,
}

// Session store fake that keeps every commit so tests can count them.
#[derive(Clone, Default)]
pub(crate) struct RecordingStore {
    commits: Arc<Mutex<Vec<Session>>>,
    current: Arc<Mutex<Option<Session>>>,
    failures: FailureFlags,
    commit_attempts: Arc<AtomicUsize>,
    // When set, each commit parks until the test releases it.
    commit_gate: Option<Arc<Notify>>,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn with_session(self, session: Session) -> Self {
        *self.current.lock().expect("session mutex poisoned") = Some(session);
        self
    }

    pub(crate) fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.commit_gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    // Commits that have started, including ones still parked on the gate.
    pub(crate) fn commit_attempts(&self) -> usize {
        self.commit_attempts.load(Ordering::SeqCst)
    }

    pub(crate) fn commits(&self) -> Vec<Session> {
        self.commits.lock().expect("commits mutex poisoned").clone()
    }

    pub(crate) fn current_session(&self) -> Option<Session> {
        self.current.lock().expect("session mutex poisoned").clone()
    }
}

#[async_trait]
impl SessionStore for RecordingStore {
    async fn commit(&self, session: Session) -> Result<(), String> {
        self.commit_attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.commit_gate {
            gate.notified().await;
        }

        if self.failures.commit {
            return Err("commit failed".to_string());
        }

        self.commits
            .lock()
            .expect("commits mutex poisoned")
            .push(session.clone());
        *self.current.lock().expect("session mutex poisoned") = Some(session);
        Ok(())
    }

    async fn current(&self) -> Result<Option<Session>, String> {
        Ok(self.current_session())
    }

    async fn clear(&self) -> Result<bool, String> {
        if self.failures.clear {
            return Err("clear failed".to_string());
        }

        Ok(self
            .current
            .lock()
            .expect("session mutex poisoned")
            .take()
            .is_some())
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingNotifier {
    shown: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub(crate) fn shown(&self) -> Vec<Notification> {
        self.shown.lock().expect("notifications mutex poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.shown
            .lock()
            .expect("notifications mutex poisoned")
            .push(notification);
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingNavigator {
    routes: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub(crate) fn routes(&self) -> Vec<String> {
        self.routes.lock().expect("routes mutex poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, path: &str) {
        self.routes
            .lock()
            .expect("routes mutex poisoned")
            .push(path.to_string());
    }
}

pub(crate) const TOAST: Duration = Duration::from_millis(2000);

pub(crate) fn policy(transport_failure: TransportFailurePolicy) -> DispatchPolicy {
    DispatchPolicy {
        home_route: "/".to_string(),
        toast_duration: TOAST,
        transport_failure,
        ..DispatchPolicy::default()
    }
}

pub(crate) type TestUseCase =
    SubmitLoginUseCase<ScriptedAuth, RecordingStore, RecordingNotifier, RecordingNavigator>;

// Fakes wired into one use case; the clones stay with the test for assertions.
pub(crate) struct Harness {
    pub use_case: TestUseCase,
    pub auth: ScriptedAuth,
    pub store: RecordingStore,
    pub notifier: RecordingNotifier,
    pub navigator: RecordingNavigator,
}

impl Harness {
    pub(crate) fn new(auth: ScriptedAuth) -> Self {
        Self::with_policy(auth, TransportFailurePolicy::Notify)
    }

    pub(crate) fn with_policy(auth: ScriptedAuth, transport_failure: TransportFailurePolicy) -> Self {
        Self::build(auth, RecordingStore::new(), transport_failure)
    }

    pub(crate) fn build(
        auth: ScriptedAuth,
        store: RecordingStore,
        transport_failure: TransportFailurePolicy,
    ) -> Self {
        let notifier = RecordingNotifier::default();
        let navigator = RecordingNavigator::default();
        let use_case = SubmitLoginUseCase {
            auth: auth.clone(),
            sessions: store.clone(),
            notifier: notifier.clone(),
            navigator: navigator.clone(),
            validator: Validator::new(SyntaxEmailRule),
            policy: policy(transport_failure),
        };

        Self {
            use_case,
            auth,
            store,
            notifier,
            navigator,
        }
    }
}
