// ── Command API ──
//
// Every mutation flows through the `Command` enum. The controller runs
// the client-side guards, calls the API, echoes the authoritative answer
// into the store and schedules a background refresh.

pub mod requests;

use std::sync::Arc;

use secrecy::SecretString;

use crate::error::CoreError;
use crate::model::{Reel, Report, Shop, ShopStatus, Stream};

pub use requests::{StreamRequest, UpdateShopRequest};

/// A command envelope sent through the command channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

#[derive(Debug, Clone)]
pub enum Command {
    // ── Client interactions ──────────────────────────────────────────
    ToggleFavorite {
        shop_id: String,
    },
    ToggleReminder {
        stream_id: String,
    },
    ToggleLike {
        stream_id: String,
    },
    ReportStream {
        stream_id: String,
        reason: String,
    },
    MarkReelViewed {
        reel_id: String,
    },
    MarkNotificationRead {
        id: String,
    },
    MarkAllNotificationsRead,

    // ── Merchant ─────────────────────────────────────────────────────
    CreateStream(StreamRequest),
    UpdateStream {
        stream_id: String,
        request: StreamRequest,
    },
    CancelStream {
        stream_id: String,
    },
    ExtendStream {
        stream_id: String,
    },
    UpdateShop {
        shop_id: Option<String>,
        update: UpdateShopRequest,
    },
    BuyQuota {
        shop_id: Option<String>,
        amount: u32,
    },
    CreateReel {
        shop_id: Option<String>,
        url: String,
    },

    // ── Administration ───────────────────────────────────────────────
    SetShopStatus {
        shop_id: String,
        status: ShopStatus,
    },
    BanStream {
        stream_id: String,
    },
    ResolveReport {
        report_id: String,
    },
    ResetShopPassword {
        shop_id: String,
        new_password: SecretString,
    },
    AssignShopOwner {
        shop_id: String,
        email: String,
    },
}

impl Command {
    /// Whether the command changes server state beyond the caller's own
    /// read markers, and so warrants a full refresh afterwards.
    pub(crate) fn refreshes(&self) -> bool {
        !matches!(
            self,
            Self::MarkReelViewed { .. }
                | Self::MarkNotificationRead { .. }
                | Self::MarkAllNotificationsRead
        )
    }
}

/// The authoritative outcome of a command, as answered by the server.
#[derive(Debug, Clone)]
pub enum CommandResult {
    Ok,
    Favorites {
        favorites: Vec<String>,
        added: bool,
    },
    Reminders {
        reminders: Vec<String>,
        added: bool,
        /// Offer a calendar invite: only when a reminder was added for an
        /// UPCOMING stream.
        offer_invite: bool,
    },
    Like {
        liked: bool,
        likes: u64,
    },
    Shop(Arc<Shop>),
    Stream(Arc<Stream>),
    Reel(Arc<Reel>),
    Report(Report),
}
