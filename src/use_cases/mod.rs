// Use cases layer: the submit-and-respond workflow and its session side effects.

pub mod login_form;
pub mod logout;
pub mod submit_login;

#[cfg(test)]
pub(crate) mod test_support;

pub use login_form::LoginForm;
pub use logout::{LogoutResponse, LogoutUseCase};
pub use submit_login::{DispatchPolicy, SignedIn, SubmitLoginUseCase, TransportFailurePolicy};
