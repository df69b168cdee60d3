// ── Derived views ──
//
// Pure functions from fetched (+ placeholder) entities to the filtered and
// ranked lists consumers render. No hidden state: same input, same output.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::model::{Notification, Reel, Shop, Stream, StreamStatus};

/// Stream listing filter, identified by its display label.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum StreamFilter {
    #[default]
    #[strum(to_string = "Todos", serialize = "todos")]
    All,
    #[strum(to_string = "En Vivo", serialize = "en-vivo")]
    Live,
    #[strum(to_string = "Próximos", serialize = "proximos")]
    Upcoming,
    #[strum(to_string = "Finalizados", serialize = "finalizados")]
    Finished,
}

impl StreamFilter {
    pub fn matches(self, status: StreamStatus) -> bool {
        match self {
            Self::All => true,
            Self::Live => status == StreamStatus::Live,
            Self::Upcoming => status == StreamStatus::Upcoming,
            Self::Finished => status.is_over(),
        }
    }
}

// ── Streams ────────────────────────────────────────────────────────

/// Eligible for any listing: visible, owned by an ACTIVE shop, and neither
/// cancelled nor banned.
pub fn is_stream_visible(stream: &Stream) -> bool {
    stream.is_visible && stream.shop.is_active() && stream.status.is_listable()
}

/// Plan weight desc, rating desc, views desc.
fn live_order(a: &Stream, b: &Stream) -> Ordering {
    b.shop
        .plan_weight()
        .cmp(&a.shop.plan_weight())
        .then_with(|| b.shop.rating.average.total_cmp(&a.shop.rating.average))
        .then_with(|| b.views.cmp(&a.views))
}

/// Status priority asc; UPCOMING soonest first, everything else most
/// recent first.
fn schedule_order(a: &Stream, b: &Stream) -> Ordering {
    a.status.priority().cmp(&b.status.priority()).then_with(|| {
        if a.status == StreamStatus::Upcoming && b.status == StreamStatus::Upcoming {
            a.scheduled_at.cmp(&b.scheduled_at)
        } else {
            b.scheduled_at.cmp(&a.scheduled_at)
        }
    })
}

/// Filter and rank streams for the given listing.
pub fn rank_streams(streams: &[Arc<Stream>], filter: StreamFilter) -> Vec<Arc<Stream>> {
    let mut out: Vec<Arc<Stream>> = streams
        .iter()
        .filter(|s| is_stream_visible(s) && filter.matches(s.status))
        .cloned()
        .collect();

    if filter == StreamFilter::Live {
        out.sort_by(|a, b| live_order(a, b));
    } else {
        out.sort_by(|a, b| schedule_order(a, b));
    }
    out
}

/// Visible streams owned by one shop, filtered and ranked like the full
/// listing.
pub fn streams_of_shop(
    streams: &[Arc<Stream>],
    shop_id: &str,
    filter: StreamFilter,
) -> Vec<Arc<Stream>> {
    let mine: Vec<Arc<Stream>> = streams
        .iter()
        .filter(|s| s.shop.id == shop_id)
        .cloned()
        .collect();
    rank_streams(&mine, filter)
}

// ── Shops ──────────────────────────────────────────────────────────

/// Shops whose status is unset or ACTIVE.
pub fn public_shops(shops: &[Arc<Shop>]) -> Vec<Arc<Shop>> {
    shops.iter().filter(|s| s.is_public()).cloned().collect()
}

/// Plan weight desc, rating desc, name asc.
pub fn rank_shops(shops: &[Arc<Shop>]) -> Vec<Arc<Shop>> {
    let mut out = shops.to_vec();
    out.sort_by(|a, b| {
        b.plan_weight()
            .cmp(&a.plan_weight())
            .then_with(|| b.rating.average.total_cmp(&a.rating.average))
            .then_with(|| a.name.cmp(&b.name))
    });
    out
}

fn search_haystack(shop: &Shop) -> String {
    [
        Some(shop.name.as_str()),
        shop.legal_name.as_deref(),
        shop.address.as_deref(),
        shop.city.as_deref(),
        shop.province.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Case-insensitive substring match over name, legal name, address, city
/// and province. A blank query returns the input unchanged.
pub fn search_shops(shops: &[Arc<Shop>], query: &str) -> Vec<Arc<Shop>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return shops.to_vec();
    }
    shops
        .iter()
        .filter(|s| search_haystack(s).contains(&needle))
        .cloned()
        .collect()
}

// ── Reels & notifications ──────────────────────────────────────────

/// Unexpired reels of public shops, newest first.
pub fn active_reels(reels: &[Arc<Reel>], now: DateTime<Utc>) -> Vec<Arc<Reel>> {
    let mut out: Vec<Arc<Reel>> = reels
        .iter()
        .filter(|r| !r.is_expired(now) && r.shop.is_public())
        .cloned()
        .collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

pub fn unread_count(notifications: &[Arc<Notification>]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}
