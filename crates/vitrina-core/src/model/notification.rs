use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub read: bool,
    /// Stream this notification points at, if any.
    pub stream_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
