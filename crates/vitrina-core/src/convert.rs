// ── API-to-domain type conversions ──
//
// Bridges raw `vitrina_api::types` responses into canonical
// `vitrina_core::model` types. Missing optional fields get render-safe
// defaults (placeholder logo, zeroed counters, fallback shop) so
// consumers never handle partial data.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use vitrina_api::types::{
    NotificationResponse, PenaltyResponse, QuotaResponse, ReelResponse, ReportResponse,
    ShopResponse, StreamResponse, UserContextResponse,
};

use crate::model::shop::PLACEHOLDER_LOGO;
use crate::model::{
    GeoPoint, Notification, Penalty, PlanTier, Quota, Rating, Reel, Report, ReportStatus, Role,
    Shop, ShopContact, ShopStatus, Stream, StreamStatus, UserContext,
};

/// Shops keyed by id, used to attach owners to streams and reels.
pub type ShopIndex = HashMap<String, Arc<Shop>>;

pub fn shop_index(shops: &[Arc<Shop>]) -> ShopIndex {
    shops
        .iter()
        .map(|s| (s.id.clone(), Arc::clone(s)))
        .collect()
}

// ── Helpers ────────────────────────────────────────────────────────

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

fn resolve_shop(index: &ShopIndex, shop_id: Option<&str>) -> Arc<Shop> {
    shop_id
        .and_then(|id| index.get(id))
        .map_or_else(|| Arc::new(Shop::fallback()), Arc::clone)
}

fn parse_shop_status(raw: Option<&str>) -> Option<ShopStatus> {
    // Unknown labels are treated as hidden rather than public.
    raw.map(|s| s.parse().unwrap_or(ShopStatus::Hidden))
}

pub fn parse_stream_status(raw: Option<&str>) -> StreamStatus {
    raw.and_then(|s| s.parse().ok())
        .unwrap_or(StreamStatus::Upcoming)
}

pub fn parse_role(raw: Option<&str>) -> Role {
    raw.and_then(|s| s.parse().ok()).unwrap_or(Role::Client)
}

impl From<Option<QuotaResponse>> for Quota {
    fn from(q: Option<QuotaResponse>) -> Self {
        let q = q.unwrap_or_default();
        Self {
            base: q.base.unwrap_or(0),
            extra: q.extra.unwrap_or(0),
            used: q.used.unwrap_or(0),
        }
    }
}

impl From<PenaltyResponse> for Penalty {
    fn from(p: PenaltyResponse) -> Self {
        Self {
            reason: p.reason.unwrap_or_default(),
            created_at: p.created_at,
            active: p.active.unwrap_or(true),
        }
    }
}

// ── Shops ──────────────────────────────────────────────────────────

impl From<ShopResponse> for Shop {
    fn from(s: ShopResponse) -> Self {
        let location = match (s.lat, s.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        };

        Self {
            name: non_empty(s.name).unwrap_or_else(|| "Tienda sin nombre".into()),
            legal_name: non_empty(s.legal_name),
            plan: s
                .plan
                .as_deref()
                .map_or(PlanTier::Estandar, PlanTier::from_label),
            status: parse_shop_status(s.status.as_deref()),
            logo_url: non_empty(s.logo_url).unwrap_or_else(|| PLACEHOLDER_LOGO.into()),
            address: non_empty(s.address),
            city: non_empty(s.city),
            province: non_empty(s.province),
            location,
            contact: ShopContact {
                email: non_empty(s.email),
                whatsapp: non_empty(s.whatsapp),
                instagram: non_empty(s.instagram),
                facebook: non_empty(s.facebook),
                website: non_empty(s.website),
            },
            rating: Rating {
                average: s.rating_average.filter(|r| r.is_finite()).unwrap_or(0.0),
                count: s.rating_count.unwrap_or(0),
            },
            stream_quota: Quota::from(s.stream_quota),
            reel_quota: Quota::from(s.reel_quota),
            penalties: s
                .penalties
                .unwrap_or_default()
                .into_iter()
                .map(Penalty::from)
                .collect(),
            id: s.id,
        }
    }
}

// ── Streams & reels ────────────────────────────────────────────────

pub fn stream_from_response(s: StreamResponse, shops: &ShopIndex) -> Stream {
    let shop = resolve_shop(shops, s.shop_id.as_deref());
    let title = non_empty(s.title).unwrap_or_else(|| format!("Vivo de {}", shop.name));

    Stream {
        id: s.id,
        title,
        platform: non_empty(s.platform),
        url: non_empty(s.url),
        status: parse_stream_status(s.status.as_deref()),
        scheduled_at: s.scheduled_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        is_visible: s.is_visible.unwrap_or(true),
        views: s.views.unwrap_or(0),
        likes: s.likes.unwrap_or(0),
        report_count: s.report_count.unwrap_or(0),
        extension_count: s.extension_count.unwrap_or(0),
        shop,
    }
}

pub fn reel_from_response(r: ReelResponse, shops: &ShopIndex) -> Reel {
    // Without a creation time the reel is treated as long expired.
    let created_at = r.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    Reel {
        shop: resolve_shop(shops, r.shop_id.as_deref()),
        url: non_empty(r.url),
        expires_at: r.expires_at.unwrap_or(created_at + Reel::ttl()),
        created_at,
        views: r.views.unwrap_or(0),
        id: r.id,
    }
}

// ── User-scoped data ───────────────────────────────────────────────

impl From<UserContextResponse> for UserContext {
    fn from(u: UserContextResponse) -> Self {
        Self {
            favorites: u.favorites,
            reminders: u.reminders,
            viewed_reels: u.viewed_reels,
            liked_streams: u.liked_streams,
            reported_streams: u.reported_streams,
            history: u.history,
        }
    }
}

impl From<NotificationResponse> for Notification {
    fn from(n: NotificationResponse) -> Self {
        Self {
            id: n.id,
            message: n.message.unwrap_or_default(),
            read: n.read.unwrap_or(false),
            stream_id: non_empty(n.ref_id),
            created_at: n.created_at,
        }
    }
}

impl From<ReportResponse> for Report {
    fn from(r: ReportResponse) -> Self {
        Self {
            id: r.id,
            stream_id: non_empty(r.stream_id),
            shop_id: non_empty(r.shop_id),
            reason: r.reason.unwrap_or_default(),
            status: r
                .status
                .and_then(|s| s.parse().ok())
                .unwrap_or(ReportStatus::Open),
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::shop::{FALLBACK_SHOP_NAME, PLACEHOLDER_LOGO};

    fn shop_response(id: &str) -> ShopResponse {
        ShopResponse {
            id: id.into(),
            name: Some("Moda Urbana".into()),
            plan: Some("Alta Visibilidad".into()),
            status: Some("ACTIVE".into()),
            ..ShopResponse::default()
        }
    }

    #[test]
    fn shop_defaults_for_missing_fields() {
        let shop = Shop::from(ShopResponse {
            id: "s9".into(),
            logo_url: Some("   ".into()),
            ..ShopResponse::default()
        });
        assert_eq!(shop.logo_url, PLACEHOLDER_LOGO);
        assert_eq!(shop.rating, Rating::default());
        assert_eq!(shop.plan, PlanTier::Estandar);
        assert!(shop.status.is_none());
        assert!(shop.is_public());
    }

    #[test]
    fn unknown_shop_status_is_hidden() {
        let shop = Shop::from(ShopResponse {
            id: "s1".into(),
            status: Some("ARCHIVED".into()),
            ..ShopResponse::default()
        });
        assert_eq!(shop.status, Some(ShopStatus::Hidden));
        assert!(!shop.is_public());
    }

    #[test]
    fn stream_attaches_known_shop() {
        let shops = vec![Arc::new(Shop::from(shop_response("s1")))];
        let index = shop_index(&shops);
        let stream = stream_from_response(
            StreamResponse {
                id: "st1".into(),
                shop_id: Some("s1".into()),
                status: Some("live".into()),
                ..StreamResponse::default()
            },
            &index,
        );
        assert_eq!(stream.shop.name, "Moda Urbana");
        assert_eq!(stream.status, StreamStatus::Live);
        assert_eq!(stream.title, "Vivo de Moda Urbana");
        assert!(stream.is_visible);
    }

    #[test]
    fn stream_with_unknown_shop_gets_fallback() {
        let stream = stream_from_response(
            StreamResponse {
                id: "st1".into(),
                shop_id: Some("ghost".into()),
                ..StreamResponse::default()
            },
            &ShopIndex::new(),
        );
        assert_eq!(stream.shop.name, FALLBACK_SHOP_NAME);
        assert_eq!(stream.status, StreamStatus::Upcoming);
        assert!(!stream.shop.is_active());
    }

    #[test]
    fn reel_expiry_defaults_to_ttl() {
        let created: DateTime<Utc> = "2026-10-19T10:00:00Z".parse().unwrap();
        let reel = reel_from_response(
            ReelResponse {
                id: "r1".into(),
                created_at: Some(created),
                ..ReelResponse::default()
            },
            &ShopIndex::new(),
        );
        assert_eq!(reel.expires_at, created + chrono::Duration::hours(24));
    }

    #[test]
    fn role_defaults_to_client() {
        assert_eq!(parse_role(Some("ADMIN")), Role::Admin);
        assert_eq!(parse_role(Some("shop")), Role::Shop);
        assert_eq!(parse_role(None), Role::Client);
        assert_eq!(parse_role(Some("???")), Role::Client);
    }
}
