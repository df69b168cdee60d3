// ── Password reset completion ──
//
// idle → loading (verifying the emailed code) → ready (collect the new
// password) → success | error. Expired and invalid codes are reported
// apart from generic failures.

use crate::error::CoreError;

use super::AuthErrorKind;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetFailure {
    Expired,
    Invalid,
    Failed(String),
}

impl ResetFailure {
    pub fn from_error(err: &CoreError) -> Self {
        match err {
            CoreError::Auth(AuthErrorKind::ExpiredActionCode) => Self::Expired,
            CoreError::Auth(AuthErrorKind::InvalidActionCode) => Self::Invalid,
            other => Self::Failed(other.notice().message),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Expired => AuthErrorKind::ExpiredActionCode.message().to_owned(),
            Self::Invalid => AuthErrorKind::InvalidActionCode.message().to_owned(),
            Self::Failed(message) => message.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResetState {
    #[default]
    Idle,
    Loading { code: String },
    Ready { code: String, email: String },
    Success { email: String },
    Error(ResetFailure),
}

impl ResetState {
    /// Enter the flow from a deep link. A missing code is invalid outright.
    #[must_use]
    pub fn begin(oob_code: Option<String>) -> Self {
        match oob_code {
            Some(code) if !code.is_empty() => Self::Loading { code },
            _ => Self::Error(ResetFailure::Invalid),
        }
    }

    /// Outcome of verifying the code. Ignored outside `Loading`.
    #[must_use]
    pub fn verified(self, result: Result<String, CoreError>) -> Self {
        match (self, result) {
            (Self::Loading { code }, Ok(email)) => Self::Ready { code, email },
            (Self::Loading { .. }, Err(e)) => Self::Error(ResetFailure::from_error(&e)),
            (other, _) => other,
        }
    }

    /// Outcome of submitting the new password. Local validation failures
    /// keep the form open; anything else ends the flow.
    #[must_use]
    pub fn completed(self, result: Result<String, CoreError>) -> Self {
        match (self, result) {
            (Self::Ready { .. }, Ok(email)) => Self::Success { email },
            (state @ Self::Ready { .. }, Err(CoreError::ValidationFailed { .. })) => state,
            (Self::Ready { .. }, Err(e)) => Self::Error(ResetFailure::from_error(&e)),
            (other, _) => other,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Loading { code } | Self::Ready { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Minimum length and confirmation match.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::ValidationFailed {
            message: format!("La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres."),
        });
    }
    if password != confirmation {
        return Err(CoreError::ValidationFailed {
            message: "Las contraseñas no coinciden.".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn happy_path() {
        let s = ResetState::begin(Some("abc".into()));
        assert_eq!(s.code(), Some("abc"));
        let s = s.verified(Ok("a@b.c".into()));
        assert!(matches!(s, ResetState::Ready { .. }));
        let s = s.completed(Ok("a@b.c".into()));
        assert_eq!(s, ResetState::Success { email: "a@b.c".into() });
    }

    #[test]
    fn missing_code_is_invalid() {
        assert_eq!(ResetState::begin(None), ResetState::Error(ResetFailure::Invalid));
        assert_eq!(
            ResetState::begin(Some(String::new())),
            ResetState::Error(ResetFailure::Invalid)
        );
    }

    #[test]
    fn expired_code_reported_distinctly() {
        let s = ResetState::begin(Some("abc".into()))
            .verified(Err(CoreError::Auth(AuthErrorKind::ExpiredActionCode)));
        assert_eq!(s, ResetState::Error(ResetFailure::Expired));

        let s = ResetState::begin(Some("abc".into()))
            .verified(Err(CoreError::Internal("boom".into())));
        assert!(matches!(s, ResetState::Error(ResetFailure::Failed(_))));
    }

    #[test]
    fn validation_keeps_form_open() {
        let ready = ResetState::Ready {
            code: "abc".into(),
            email: "a@b.c".into(),
        };
        let err = validate_new_password("123", "123").unwrap_err();
        assert_eq!(ready.clone().completed(Err(err)), ready);
    }

    #[test]
    fn password_rules() {
        assert!(validate_new_password("secreto", "secreto").is_ok());
        assert!(validate_new_password("12345", "12345").is_err());
        assert!(validate_new_password("secreto", "secreta").is_err());
    }
}
