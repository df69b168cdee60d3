// Async client for the identity provider's REST surface.
//
// Endpoints follow the `accounts:<action>?key=<api key>` convention. All
// calls are POST with a JSON body; failures come back as
// `{ "error": { "code": 400, "message": "EMAIL_NOT_FOUND" } }`.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;

// ── Wire shapes ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetResponse {
    #[serde(default)]
    email: Option<String>,
}

// ── Public types ─────────────────────────────────────────────────────

/// A signed-in identity: the token to attach to marketplace API calls.
#[derive(Debug, Clone)]
pub struct IdentitySession {
    pub uid: String,
    pub email: String,
    pub id_token: SecretString,
    pub refresh_token: Option<SecretString>,
    /// Only reported by some sign-in methods; use
    /// [`IdentityClient::lookup`] for the authoritative value.
    pub email_verified: Option<bool>,
}

impl From<TokenResponse> for IdentitySession {
    fn from(r: TokenResponse) -> Self {
        Self {
            uid: r.local_id,
            email: r.email.unwrap_or_default(),
            id_token: SecretString::from(r.id_token),
            refresh_token: r.refresh_token.map(SecretString::from),
            email_verified: r.email_verified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

// ── Client ───────────────────────────────────────────────────────────

pub struct IdentityClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl IdentityClient {
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, api_key, http)
    }

    pub fn from_reqwest(
        base_url: &str,
        api_key: SecretString,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        let path = base_url.path().trim_end_matches('/').to_owned();
        base_url.set_path(&format!("{path}/"));
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    /// `{base}accounts:{action}`. Built by path concatenation because a
    /// relative reference containing `:` would parse as a scheme.
    fn action_url(&self, action: &str) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}accounts:{action}", self.base_url.path());
        url.set_path(&path);
        url
    }

    async fn call<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.action_url(action);
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })
        } else {
            Err(Error::Identity {
                code: parse_error_code(&body).unwrap_or_else(|| status.to_string()),
                status: status.as_u16(),
            })
        }
    }

    // ── Sign-in / sign-up ────────────────────────────────────────────

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<IdentitySession, Error> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
            "returnSecureToken": true,
        });
        let resp: TokenResponse = self.call("signInWithPassword", &body).await?;
        Ok(resp.into())
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<IdentitySession, Error> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
            "returnSecureToken": true,
        });
        let resp: TokenResponse = self.call("signUp", &body).await?;
        Ok(resp.into())
    }

    /// Exchange a Google ID token for a provider session.
    pub async fn sign_in_with_google(
        &self,
        google_id_token: &SecretString,
        request_uri: &str,
    ) -> Result<IdentitySession, Error> {
        let body = serde_json::json!({
            "postBody": format!(
                "id_token={}&providerId=google.com",
                google_id_token.expose_secret()
            ),
            "requestUri": request_uri,
            "returnSecureToken": true,
            "returnIdpCredential": true,
        });
        let resp: TokenResponse = self.call("signInWithIdp", &body).await?;
        Ok(resp.into())
    }

    /// Fetch the account record for a signed-in token.
    pub async fn lookup(&self, id_token: &SecretString) -> Result<AccountInfo, Error> {
        let body = serde_json::json!({ "idToken": id_token.expose_secret() });
        let resp: LookupResponse = self.call("lookup", &body).await?;
        resp.users.into_iter().next().ok_or(Error::Identity {
            code: "USER_NOT_FOUND".into(),
            status: 400,
        })
    }

    // ── Out-of-band codes ────────────────────────────────────────────

    pub async fn send_email_verification(&self, id_token: &SecretString) -> Result<(), Error> {
        let body = serde_json::json!({
            "requestType": "VERIFY_EMAIL",
            "idToken": id_token.expose_secret(),
        });
        let _: serde_json::Value = self.call("sendOobCode", &body).await?;
        Ok(())
    }

    pub async fn send_password_reset(&self, email: &str) -> Result<(), Error> {
        let body = serde_json::json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
        });
        let _: serde_json::Value = self.call("sendOobCode", &body).await?;
        Ok(())
    }

    /// Validate a reset code, returning the account email it belongs to.
    pub async fn verify_password_reset_code(&self, oob_code: &str) -> Result<String, Error> {
        let body = serde_json::json!({ "oobCode": oob_code });
        let resp: ResetResponse = self.call("resetPassword", &body).await?;
        Ok(resp.email.unwrap_or_default())
    }

    pub async fn confirm_password_reset(
        &self,
        oob_code: &str,
        new_password: &SecretString,
    ) -> Result<String, Error> {
        let body = serde_json::json!({
            "oobCode": oob_code,
            "newPassword": new_password.expose_secret(),
        });
        let resp: ResetResponse = self.call("resetPassword", &body).await?;
        Ok(resp.email.unwrap_or_default())
    }
}

/// Extract the bare error code from a provider error body.
///
/// Messages may carry a human suffix: `"WEAK_PASSWORD : Password should be
/// at least 6 characters"` yields `WEAK_PASSWORD`.
fn parse_error_code(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    let code = envelope
        .error
        .message
        .split(" : ")
        .next()
        .unwrap_or_default()
        .trim()
        .to_owned();
    if code.is_empty() { None } else { Some(code) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn error_code_strips_human_suffix() {
        let body = r#"{"error":{"code":400,"message":"WEAK_PASSWORD : Password should be at least 6 characters"}}"#;
        assert_eq!(parse_error_code(body).as_deref(), Some("WEAK_PASSWORD"));
    }

    #[test]
    fn error_code_plain() {
        let body = r#"{"error":{"code":400,"message":"EMAIL_NOT_FOUND"}}"#;
        assert_eq!(parse_error_code(body).as_deref(), Some("EMAIL_NOT_FOUND"));
    }

    #[test]
    fn error_code_missing_on_garbage() {
        assert!(parse_error_code("<html>").is_none());
    }

    #[test]
    fn action_url_keeps_colon_in_path() {
        let client = IdentityClient::from_reqwest(
            "https://id.example.com/v1",
            SecretString::from("k".to_owned()),
            reqwest::Client::new(),
        )
        .unwrap();
        assert_eq!(
            client.action_url("signUp").as_str(),
            "https://id.example.com/v1/accounts:signUp"
        );
    }
}
