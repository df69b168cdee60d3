// ── Session-scoped client profile ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Account role as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Role {
    Client,
    Shop,
    Admin,
}

/// Favorites, reminders and interaction history of the signed-in user.
///
/// Every list is replaced wholesale by the server's answer to the
/// corresponding mutation, never edited locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub favorites: Vec<String>,
    pub reminders: Vec<String>,
    pub viewed_reels: Vec<String>,
    pub liked_streams: Vec<String>,
    pub reported_streams: Vec<String>,
    pub history: Vec<String>,
}

impl UserContext {
    pub fn is_favorite(&self, shop_id: &str) -> bool {
        self.favorites.iter().any(|id| id == shop_id)
    }

    pub fn has_reminder(&self, stream_id: &str) -> bool {
        self.reminders.iter().any(|id| id == stream_id)
    }

    pub fn has_liked(&self, stream_id: &str) -> bool {
        self.liked_streams.iter().any(|id| id == stream_id)
    }

    pub fn has_reported(&self, stream_id: &str) -> bool {
        self.reported_streams.iter().any(|id| id == stream_id)
    }

    pub fn has_viewed_reel(&self, reel_id: &str) -> bool {
        self.viewed_reels.iter().any(|id| id == reel_id)
    }
}
