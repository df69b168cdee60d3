// ── Identity provider error mapping ──
//
// The provider reports failures as codes, either REST style
// (`INVALID_PASSWORD`, `WEAK_PASSWORD : Password should be ...`) or
// SDK style (`auth/wrong-password`). Both collapse onto one kind with a
// localized message; anything unrecognized gets the generic message.

use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum AuthErrorKind {
    WrongPassword,
    UserNotFound,
    InvalidCredentials,
    InvalidEmail,
    TooManyRequests,
    WeakPassword,
    EmailAlreadyInUse,
    ExpiredActionCode,
    InvalidActionCode,
    UserDisabled,
    PopupClosed,
    Unknown,
}

impl AuthErrorKind {
    pub fn from_code(code: &str) -> Self {
        let head = code.split(" : ").next().unwrap_or(code).trim();
        match head {
            "INVALID_PASSWORD" | "auth/wrong-password" => Self::WrongPassword,
            "EMAIL_NOT_FOUND" | "auth/user-not-found" => Self::UserNotFound,
            "INVALID_LOGIN_CREDENTIALS" | "auth/invalid-credential" => Self::InvalidCredentials,
            "INVALID_EMAIL" | "MISSING_EMAIL" | "auth/invalid-email" => Self::InvalidEmail,
            "TOO_MANY_ATTEMPTS_TRY_LATER" | "auth/too-many-requests" => Self::TooManyRequests,
            "WEAK_PASSWORD" | "MISSING_PASSWORD" | "auth/weak-password" => Self::WeakPassword,
            "EMAIL_EXISTS" | "auth/email-already-in-use" => Self::EmailAlreadyInUse,
            "EXPIRED_OOB_CODE" | "auth/expired-action-code" => Self::ExpiredActionCode,
            "INVALID_OOB_CODE" | "auth/invalid-action-code" => Self::InvalidActionCode,
            "USER_DISABLED" | "auth/user-disabled" => Self::UserDisabled,
            "auth/popup-closed-by-user" | "auth/cancelled-popup-request" => Self::PopupClosed,
            _ => Self::Unknown,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::WrongPassword => "La contraseña es incorrecta.",
            Self::UserNotFound => "No existe una cuenta con ese correo.",
            Self::InvalidCredentials => "Correo o contraseña incorrectos.",
            Self::InvalidEmail => "El correo electrónico no es válido.",
            Self::TooManyRequests => {
                "Demasiados intentos. Esperá unos minutos y volvé a probar."
            }
            Self::WeakPassword => "La contraseña debe tener al menos 6 caracteres.",
            Self::EmailAlreadyInUse => "Ese correo ya está registrado.",
            Self::ExpiredActionCode => "El enlace expiró. Pedí uno nuevo.",
            Self::InvalidActionCode => "El enlace no es válido o ya fue usado.",
            Self::UserDisabled => "La cuenta está deshabilitada.",
            Self::PopupClosed => "Se cerró la ventana de inicio de sesión.",
            Self::Unknown => "No pudimos completar la operación. Intentá de nuevo.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_and_sdk_codes_agree() {
        assert_eq!(
            AuthErrorKind::from_code("INVALID_PASSWORD"),
            AuthErrorKind::from_code("auth/wrong-password")
        );
        assert_eq!(
            AuthErrorKind::from_code("EXPIRED_OOB_CODE"),
            AuthErrorKind::ExpiredActionCode
        );
    }

    #[test]
    fn detail_suffix_is_ignored() {
        assert_eq!(
            AuthErrorKind::from_code("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthErrorKind::WeakPassword
        );
    }

    #[test]
    fn unknown_falls_back_to_generic() {
        let kind = AuthErrorKind::from_code("SOMETHING_NEW");
        assert_eq!(kind, AuthErrorKind::Unknown);
        assert!(kind.message().contains("Intentá de nuevo"));
    }
}
