// Async HTTP client for the marketplace REST API.
//
// Auth: `Authorization: Bearer <identity token>` on every request once a
// token has been set. Anonymous requests are allowed for public reads.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types;

// ── Error response shape from the marketplace API ────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the marketplace REST API.
///
/// The identity token is swappable at runtime: login installs one via
/// [`set_token`](Self::set_token), logout clears it.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: ArcSwapOption<SecretString>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            token: ArcSwapOption::empty(),
        })
    }

    /// Ensure the base URL ends with `/` so relative joins append.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ─────────────────────────────────────────────

    pub fn set_token(&self, token: SecretString) {
        self.token.store(Some(Arc::new(token)));
    }

    pub fn clear_token(&self) {
        self.token.store(None);
    }

    pub fn has_token(&self) -> bool {
        self.token.load().is_some()
    }

    // ── Request building ─────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match self.token.load_full() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    fn require_token(&self) -> Result<(), Error> {
        if self.has_token() {
            Ok(())
        } else {
            Err(Error::MissingToken)
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.request(reqwest::Method::GET, url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .request(reqwest::Method::GET, url)
            .query(params)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    async fn get_text(&self, path: &str) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.request(reqwest::Method::GET, url).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.text().await?)
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .request(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.request(reqwest::Method::POST, url).send().await?;
        Self::handle_response(resp).await
    }

    async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .request(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await?;
        Self::handle_empty(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self
            .request(reqwest::Method::PUT, url)
            .json(body)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let resp = self
            .request(reqwest::Method::PATCH, url)
            .json(body)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ErrorResponse>(&raw).ok();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: parsed
                    .and_then(|e| e.message.or(e.error))
                    .unwrap_or_else(|| status.to_string()),
            };
        }

        match parsed {
            Some(err) => Error::Api {
                status: status.as_u16(),
                message: err
                    .message
                    .or(err.error)
                    .unwrap_or_else(|| status.to_string()),
                code: err.code,
            },
            None => Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Shops ────────────────────────────────────────────────────────

    pub async fn list_shops(&self) -> Result<Vec<types::ShopResponse>, Error> {
        self.get("shops").await
    }

    pub async fn get_shop(&self, shop_id: &str) -> Result<types::ShopResponse, Error> {
        self.get(&format!("shops/{shop_id}")).await
    }

    pub async fn update_shop(
        &self,
        shop_id: &str,
        update: &types::ShopUpdate,
    ) -> Result<types::ShopResponse, Error> {
        self.require_token()?;
        self.put(&format!("shops/{shop_id}"), update).await
    }

    /// Whether `email` belongs to a provisioned shop account.
    pub async fn shop_owner_exists(&self, email: &str) -> Result<bool, Error> {
        let resp: types::OwnerExistsResponse = self
            .get_with_params("shops/owner-exists", &[("email", email.to_owned())])
            .await?;
        Ok(resp.exists)
    }

    pub async fn buy_quota(
        &self,
        shop_id: &str,
        amount: u32,
    ) -> Result<types::ShopResponse, Error> {
        #[derive(Serialize)]
        struct Body {
            amount: u32,
        }

        self.require_token()?;
        self.post(&format!("shops/{shop_id}/purchases"), &Body { amount })
            .await
    }

    // ── Streams ──────────────────────────────────────────────────────

    pub async fn list_streams(&self) -> Result<Vec<types::StreamResponse>, Error> {
        self.get("streams").await
    }

    pub async fn get_stream(&self, stream_id: &str) -> Result<types::StreamResponse, Error> {
        self.get(&format!("streams/{stream_id}")).await
    }

    pub async fn create_stream(
        &self,
        body: &types::StreamUpsert,
    ) -> Result<types::StreamResponse, Error> {
        self.require_token()?;
        self.post("streams", body).await
    }

    pub async fn update_stream(
        &self,
        stream_id: &str,
        body: &types::StreamUpsert,
    ) -> Result<types::StreamResponse, Error> {
        self.require_token()?;
        self.put(&format!("streams/{stream_id}"), body).await
    }

    pub async fn cancel_stream(&self, stream_id: &str) -> Result<types::StreamResponse, Error> {
        self.require_token()?;
        self.post_empty(&format!("streams/{stream_id}/cancel"))
            .await
    }

    pub async fn extend_stream(&self, stream_id: &str) -> Result<types::StreamResponse, Error> {
        self.require_token()?;
        self.post_empty(&format!("streams/{stream_id}/extend"))
            .await
    }

    pub async fn toggle_like(&self, stream_id: &str) -> Result<types::LikeResponse, Error> {
        self.require_token()?;
        self.post_empty(&format!("streams/{stream_id}/like")).await
    }

    pub async fn report_stream(
        &self,
        stream_id: &str,
        reason: &str,
    ) -> Result<types::ReportedStreamsResponse, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            reason: &'a str,
        }

        self.require_token()?;
        self.post(&format!("streams/{stream_id}/report"), &Body { reason })
            .await
    }

    /// Server-rendered calendar invite (`text/calendar`).
    pub async fn stream_calendar_invite(&self, stream_id: &str) -> Result<String, Error> {
        self.get_text(&format!("streams/{stream_id}/ics")).await
    }

    // ── Reels ────────────────────────────────────────────────────────

    pub async fn list_reels(&self) -> Result<Vec<types::ReelResponse>, Error> {
        self.get("reels").await
    }

    pub async fn create_reel(&self, body: &types::ReelCreate) -> Result<types::ReelResponse, Error> {
        self.require_token()?;
        self.post("reels", body).await
    }

    pub async fn mark_reel_viewed(
        &self,
        reel_id: &str,
    ) -> Result<types::ViewedReelsResponse, Error> {
        self.require_token()?;
        self.post_empty(&format!("reels/{reel_id}/view")).await
    }

    // ── User context ─────────────────────────────────────────────────

    pub async fn me(&self) -> Result<types::UserContextResponse, Error> {
        self.require_token()?;
        self.get("me").await
    }

    pub async fn toggle_favorite(&self, shop_id: &str) -> Result<types::FavoritesResponse, Error> {
        self.require_token()?;
        self.post_empty(&format!("me/favorites/{shop_id}")).await
    }

    pub async fn toggle_reminder(
        &self,
        stream_id: &str,
    ) -> Result<types::RemindersResponse, Error> {
        self.require_token()?;
        self.post_empty(&format!("me/reminders/{stream_id}")).await
    }

    // ── Notifications ────────────────────────────────────────────────

    pub async fn list_notifications(&self) -> Result<Vec<types::NotificationResponse>, Error> {
        self.require_token()?;
        self.get("notifications").await
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<(), Error> {
        self.require_token()?;
        self.post_no_response(&format!("notifications/{id}/read"), &serde_json::json!({}))
            .await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), Error> {
        self.require_token()?;
        self.post_no_response("notifications/read-all", &serde_json::json!({}))
            .await
    }

    // ── Administration ───────────────────────────────────────────────

    pub async fn set_shop_status(
        &self,
        shop_id: &str,
        status: &str,
    ) -> Result<types::ShopResponse, Error> {
        self.require_token()?;
        self.patch(
            &format!("admin/shops/{shop_id}/status"),
            &types::StatusUpdate { status },
        )
        .await
    }

    pub async fn ban_stream(&self, stream_id: &str) -> Result<types::StreamResponse, Error> {
        self.require_token()?;
        self.post_empty(&format!("admin/streams/{stream_id}/ban"))
            .await
    }

    pub async fn list_reports(&self) -> Result<Vec<types::ReportResponse>, Error> {
        self.require_token()?;
        self.get("admin/reports").await
    }

    pub async fn resolve_report(&self, report_id: &str) -> Result<types::ReportResponse, Error> {
        self.require_token()?;
        self.post_empty(&format!("admin/reports/{report_id}/resolve"))
            .await
    }

    pub async fn reset_shop_password(
        &self,
        shop_id: &str,
        new_password: &SecretString,
    ) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            password: &'a str,
        }

        self.require_token()?;
        self.post_no_response(
            &format!("admin/shops/{shop_id}/password"),
            &Body {
                password: new_password.expose_secret(),
            },
        )
        .await
    }

    pub async fn assign_shop_owner(
        &self,
        shop_id: &str,
        email: &str,
    ) -> Result<types::ShopResponse, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
        }

        self.require_token()?;
        self.post(&format!("admin/shops/{shop_id}/owner"), &Body { email })
            .await
    }
}
