use async_trait::async_trait;

use crate::domain::credentials::Credentials;
use crate::domain::errors::BoxError;
use crate::domain::notification::Notification;
use crate::domain::outcome::LoginReply;
use crate::domain::session::Session;

// The use cases depend on these traits, not on the concrete adapters.
// Dependencies point inwards to the domain layer.

// Port for the remote login endpoint. `Err` means the request never produced a
// usable answer (unreachable, non-2xx, malformed body); rejections come back in `Ok`.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginReply, BoxError>;
}

// Port for the process-wide session holder.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn commit(&self, session: Session) -> Result<(), String>;
    async fn current(&self) -> Result<Option<Session>, String>;
    async fn clear(&self) -> Result<bool, String>;
}

// Port for transient user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

// Port for route changes in the host.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}
