// ── Reel domain types ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shop::Shop;

/// Reels live for a fixed window after creation.
pub const REEL_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reel {
    pub id: String,
    pub shop: Arc<Shop>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub views: u64,
}

impl Reel {
    pub fn ttl() -> chrono::Duration {
        chrono::Duration::hours(REEL_TTL_HOURS)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_mock(&self) -> bool {
        crate::mock::is_mock_id(&self.id)
    }
}
