use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ReportStatus {
    Open,
    Resolved,
}

/// A user report against a stream, as seen from the moderation panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub stream_id: Option<String>,
    pub shop_id: Option<String>,
    pub reason: String,
    pub status: ReportStatus,
    pub created_at: Option<DateTime<Utc>>,
}
