// Domain layer: form state, validation rules, login outcomes and ports.

pub mod credentials;
pub mod errors;
pub mod notification;
pub mod outcome;
pub mod ports;
pub mod session;
pub mod validation;

pub use credentials::{Credentials, CredentialsState, Field, FieldErrors, FormSnapshot};
pub use errors::{AuthError, BoxError};
pub use notification::{Notification, NotificationKind};
pub use outcome::{LoginReply, LoginResult, RejectCode};
pub use ports::{AuthProvider, Navigator, Notifier, SessionStore};
pub use session::Session;
pub use validation::{AnyEmail, EmailRule, SyntaxEmailRule, Validator};
