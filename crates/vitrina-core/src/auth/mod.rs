// ── Authentication flows ──

mod errors;
mod reset;
mod service;
mod wizard;

pub use errors::AuthErrorKind;
pub use reset::{MIN_PASSWORD_LEN, ResetFailure, ResetState, validate_new_password};
pub use service::{AuthService, SignedIn};
pub use wizard::{LoginAction, LoginStep, LoginWizard};
