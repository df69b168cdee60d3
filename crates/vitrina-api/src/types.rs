// Wire types for the marketplace REST API.
//
// Every field the backend may omit is optional here; normalization into
// domain types (with fallback defaults) happens in `vitrina-core::convert`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Shops ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopResponse {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub legal_name: Option<String>,
    /// Plan tier label, e.g. `"Maxima Visibilidad"`.
    #[serde(default)]
    pub plan: Option<String>,
    /// `ACTIVE`, `PENDING`, `SUSPENDED`, `HIDDEN` or `BANNED`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub rating_average: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<u32>,
    #[serde(default)]
    pub stream_quota: Option<QuotaResponse>,
    #[serde(default)]
    pub reel_quota: Option<QuotaResponse>,
    #[serde(default)]
    pub penalties: Option<Vec<PenaltyResponse>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaResponse {
    #[serde(default)]
    pub base: Option<u32>,
    #[serde(default)]
    pub extra: Option<u32>,
    #[serde(default)]
    pub used: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyResponse {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Partial shop update. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerExistsResponse {
    pub exists: bool,
}

// ── Streams ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamResponse {
    pub id: String,
    #[serde(default)]
    pub shop_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// `LIVE`, `UPCOMING`, `FINISHED`, `MISSED`, `CANCELLED` or `BANNED`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_visible: Option<bool>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default)]
    pub report_count: Option<u32>,
    #[serde(default)]
    pub extension_count: Option<u32>,
}

/// Body for creating or rescheduling a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamUpsert {
    pub shop_id: String,
    pub title: String,
    pub platform: String,
    pub url: String,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    #[serde(default)]
    pub liked_streams: Vec<String>,
    pub likes: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedStreamsResponse {
    #[serde(default)]
    pub reported_streams: Vec<String>,
}

// ── Reels ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelResponse {
    pub id: String,
    #[serde(default)]
    pub shop_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub views: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelCreate {
    pub shop_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedReelsResponse {
    #[serde(default)]
    pub viewed_reels: Vec<String>,
}

// ── User context ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContextResponse {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// `CLIENT`, `SHOP` or `ADMIN`.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub shop_id: Option<String>,
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub reminders: Vec<String>,
    #[serde(default)]
    pub viewed_reels: Vec<String>,
    #[serde(default)]
    pub liked_streams: Vec<String>,
    #[serde(default)]
    pub reported_streams: Vec<String>,
    #[serde(default)]
    pub history: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FavoritesResponse {
    #[serde(default)]
    pub favorites: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemindersResponse {
    #[serde(default)]
    pub reminders: Vec<String>,
}

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub read: Option<bool>,
    /// Stream the notification refers to, if any.
    #[serde(default)]
    pub ref_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ── Moderation ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    #[serde(default)]
    pub stream_id: Option<String>,
    #[serde(default)]
    pub shop_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    /// `OPEN` or `RESOLVED`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate<'a> {
    pub status: &'a str,
}
