// ── Stream domain types ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::shop::Shop;

/// Backend-enforced cap on how many times a stream can be extended.
pub const MAX_STREAM_EXTENSIONS: u32 = 3;

/// Lifecycle state. Transitions are driven by the backend; the client only
/// requests create / update / cancel and re-reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum StreamStatus {
    Live,
    Upcoming,
    Finished,
    Missed,
    Cancelled,
    Banned,
}

impl StreamStatus {
    /// Sort priority outside the "En Vivo" view: LIVE 1, UPCOMING 2, rest 3.
    pub fn priority(self) -> u8 {
        match self {
            Self::Live => 1,
            Self::Upcoming => 2,
            _ => 3,
        }
    }

    /// Cancelled and banned streams never reach a listing.
    pub fn is_listable(self) -> bool {
        !matches!(self, Self::Cancelled | Self::Banned)
    }

    pub fn is_over(self) -> bool {
        matches!(self, Self::Finished | Self::Missed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub id: String,
    pub shop: Arc<Shop>,
    pub title: String,
    pub platform: Option<String>,
    pub url: Option<String>,
    pub status: StreamStatus,
    pub scheduled_at: DateTime<Utc>,
    pub is_visible: bool,
    pub views: u64,
    pub likes: u64,
    pub report_count: u32,
    pub extension_count: u32,
}

impl Stream {
    pub fn can_extend(&self) -> bool {
        self.status == StreamStatus::Live && self.extension_count < MAX_STREAM_EXTENSIONS
    }

    pub fn is_mock(&self) -> bool {
        crate::mock::is_mock_id(&self.id)
    }
}
