// ── Authentication service ──
//
// Sign-in, registration and password reset against the identity
// provider, with the marketplace API consulted for the account's role.
// A successful sign-in leaves the provider token attached to the shared
// `ApiClient`; every refused sign-in leaves it cleared.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use vitrina_api::{ApiClient, IdentityClient, IdentitySession};

use crate::convert::parse_role;
use crate::error::CoreError;
use crate::model::{Role, UserContext};
use crate::notice::Notice;
use crate::session::AuthProfile;

use super::reset::validate_new_password;

/// A completed sign-in.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub profile: AuthProfile,
    pub context: UserContext,
}

pub struct AuthService {
    identity: IdentityClient,
    api: Arc<ApiClient>,
    /// Origin reported to the provider for federated sign-in.
    request_uri: String,
}

impl AuthService {
    pub fn new(identity: IdentityClient, api: Arc<ApiClient>, request_uri: impl Into<String>) -> Self {
        Self {
            identity,
            api,
            request_uri: request_uri.into(),
        }
    }

    pub fn sign_out(&self) {
        self.api.clear_token();
    }

    // ── Sign-in ──────────────────────────────────────────────────────

    /// Shop accounts: email and password only. Client accounts are
    /// refused at this door.
    pub async fn login_shop(&self, email: &str, password: &SecretString) -> Result<SignedIn, CoreError> {
        let session = self.identity.sign_in_with_password(email, password).await?;
        let signed_in = self.establish(&session, true).await?;
        if signed_in.profile.role == Role::Client {
            self.sign_out();
            return Err(CoreError::NotPermitted {
                message: "Esta cuenta no pertenece a una tienda. Ingresá como cliente.".into(),
            });
        }
        info!(uid = %signed_in.profile.uid, role = %signed_in.profile.role, "shop sign-in");
        Ok(signed_in)
    }

    /// Client email sign-in. Unverified accounts are signed out again.
    pub async fn login_client(&self, email: &str, password: &SecretString) -> Result<SignedIn, CoreError> {
        let session = self.identity.sign_in_with_password(email, password).await?;
        let verified = match session.email_verified {
            Some(v) => v,
            None => self.identity.lookup(&session.id_token).await?.email_verified,
        };
        if !verified {
            self.sign_out();
            return Err(CoreError::EmailNotVerified {
                message: "Tenés que verificar tu correo antes de ingresar. Revisá tu bandeja de entrada."
                    .into(),
            });
        }
        let signed_in = self.establish(&session, true).await?;
        info!(uid = %signed_in.profile.uid, "client sign-in");
        Ok(signed_in)
    }

    /// Federated sign-in with a Google ID token. Provider-verified.
    pub async fn login_google(&self, google_id_token: &SecretString) -> Result<SignedIn, CoreError> {
        let session = self
            .identity
            .sign_in_with_google(google_id_token, &self.request_uri)
            .await?;
        let signed_in = self.establish(&session, true).await?;
        info!(uid = %signed_in.profile.uid, "google sign-in");
        Ok(signed_in)
    }

    /// Resume a session from a stored provider token.
    pub async fn resume(&self, id_token: SecretString) -> Result<SignedIn, CoreError> {
        let account = self.identity.lookup(&id_token).await?;
        let session = IdentitySession {
            uid: account.local_id,
            email: account.email.unwrap_or_default(),
            id_token,
            refresh_token: None,
            email_verified: Some(account.email_verified),
        };
        self.establish(&session, account.email_verified).await
    }

    /// Attach the token and read the account's role and context.
    async fn establish(&self, session: &IdentitySession, verified: bool) -> Result<SignedIn, CoreError> {
        self.api.set_token(SecretString::from(session.id_token.expose_secret().to_owned()));
        let me = match self.api.me().await {
            Ok(me) => me,
            Err(e) => {
                self.sign_out();
                return Err(e.into());
            }
        };

        let profile = AuthProfile {
            uid: me.uid.clone().unwrap_or_else(|| session.uid.clone()),
            email: me
                .email
                .clone()
                .or_else(|| Some(session.email.clone()).filter(|e| !e.is_empty())),
            role: parse_role(me.role.as_deref()),
            shop_id: me.shop_id.clone(),
            email_verified: verified,
        };
        debug!(uid = %profile.uid, "session established");
        Ok(SignedIn {
            profile,
            context: UserContext::from(me),
        })
    }

    // ── Registration ─────────────────────────────────────────────────

    /// Create a client account and send the verification email. The new
    /// account is left signed out until verified.
    pub async fn register_client(
        &self,
        email: &str,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<Notice, CoreError> {
        validate_new_password(password.expose_secret(), confirmation.expose_secret())?;

        if self.api.shop_owner_exists(email).await? {
            return Err(CoreError::ValidationFailed {
                message: "Ese correo pertenece a una tienda. Ingresá desde el acceso de tiendas."
                    .into(),
            });
        }

        let session = self.identity.sign_up(email, password).await?;
        self.identity.send_email_verification(&session.id_token).await?;
        self.sign_out();
        info!(uid = %session.uid, "client registered, verification pending");

        Ok(Notice::success(format!(
            "Te enviamos un correo a {email} para verificar tu cuenta."
        )))
    }

    // ── Password reset ───────────────────────────────────────────────

    pub async fn request_password_reset(&self, email: &str) -> Result<Notice, CoreError> {
        self.identity.send_password_reset(email).await?;
        Ok(Notice::info(
            "Si el correo está registrado, vas a recibir un enlace para restablecer la contraseña.",
        ))
    }

    /// Returns the email the code belongs to.
    pub async fn verify_reset_code(&self, oob_code: &str) -> Result<String, CoreError> {
        Ok(self.identity.verify_password_reset_code(oob_code).await?)
    }

    pub async fn confirm_password_reset(
        &self,
        oob_code: &str,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<String, CoreError> {
        validate_new_password(password.expose_secret(), confirmation.expose_secret())?;
        Ok(self
            .identity
            .confirm_password_reset(oob_code, password)
            .await?)
    }
}
