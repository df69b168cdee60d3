// ── Shop domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub const PLACEHOLDER_LOGO: &str = "/img/logo-placeholder.png";
pub const FALLBACK_SHOP_ID: &str = "__sin-tienda__";
pub const FALLBACK_SHOP_NAME: &str = "Sin Tienda Seleccionada";

/// Subscription tier. Drives the primary sort key of most rankings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum PlanTier {
    #[default]
    #[strum(serialize = "Estandar")]
    Estandar,
    #[strum(serialize = "Alta Visibilidad")]
    AltaVisibilidad,
    #[strum(serialize = "Maxima Visibilidad")]
    MaximaVisibilidad,
}

impl PlanTier {
    /// Ranking weight: Maxima 3, Alta 2, anything else 1.
    pub fn weight(self) -> u8 {
        match self {
            Self::MaximaVisibilidad => 3,
            Self::AltaVisibilidad => 2,
            Self::Estandar => 1,
        }
    }

    /// Lenient label parsing: case and accents are ignored, unknown
    /// labels fall back to `Estandar`.
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase().replace('á', "a");
        if lower.contains("maxima") {
            Self::MaximaVisibilidad
        } else if lower.contains("alta") {
            Self::AltaVisibilidad
        } else {
            Self::Estandar
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ShopStatus {
    Active,
    Pending,
    Suspended,
    Hidden,
    Banned,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub average: f64,
    pub count: u32,
}

/// A purchasable allowance (streams or reels per period).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    pub base: u32,
    pub extra: u32,
    pub used: u32,
}

impl Quota {
    pub fn total(&self) -> u32 {
        self.base.saturating_add(self.extra)
    }

    pub fn remaining(&self) -> u32 {
        self.total().saturating_sub(self.used)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    pub reason: String,
    pub created_at: Option<DateTime<Utc>>,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopContact {
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: String,
    pub name: String,
    pub legal_name: Option<String>,
    pub plan: PlanTier,
    /// `None` when the backend did not report a status.
    pub status: Option<ShopStatus>,
    pub logo_url: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub location: Option<GeoPoint>,
    pub contact: ShopContact,
    pub rating: Rating,
    pub stream_quota: Quota,
    pub reel_quota: Quota,
    pub penalties: Vec<Penalty>,
}

impl Shop {
    /// Stand-in for streams and reels whose owner could not be resolved.
    /// Hidden, so it never reaches a public listing.
    pub fn fallback() -> Self {
        Self {
            id: FALLBACK_SHOP_ID.into(),
            name: FALLBACK_SHOP_NAME.into(),
            legal_name: None,
            plan: PlanTier::Estandar,
            status: Some(ShopStatus::Hidden),
            logo_url: PLACEHOLDER_LOGO.into(),
            address: None,
            city: None,
            province: None,
            location: None,
            contact: ShopContact::default(),
            rating: Rating::default(),
            stream_quota: Quota::default(),
            reel_quota: Quota::default(),
            penalties: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == Some(ShopStatus::Active)
    }

    /// Listed publicly: status unset or `ACTIVE`.
    pub fn is_public(&self) -> bool {
        self.status.is_none_or(|s| s == ShopStatus::Active)
    }

    pub fn plan_weight(&self) -> u8 {
        self.plan.weight()
    }

    pub fn active_penalties(&self) -> impl Iterator<Item = &Penalty> {
        self.penalties.iter().filter(|p| p.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_weights() {
        assert_eq!(PlanTier::MaximaVisibilidad.weight(), 3);
        assert_eq!(PlanTier::AltaVisibilidad.weight(), 2);
        assert_eq!(PlanTier::Estandar.weight(), 1);
    }

    #[test]
    fn plan_labels_are_lenient() {
        assert_eq!(PlanTier::from_label("Máxima Visibilidad"), PlanTier::MaximaVisibilidad);
        assert_eq!(PlanTier::from_label("ALTA VISIBILIDAD"), PlanTier::AltaVisibilidad);
        assert_eq!(PlanTier::from_label("Premium"), PlanTier::Estandar);
        assert_eq!(PlanTier::MaximaVisibilidad.to_string(), "Maxima Visibilidad");
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("suspended".parse::<ShopStatus>().ok(), Some(ShopStatus::Suspended));
        assert_eq!(ShopStatus::Banned.to_string(), "BANNED");
    }

    #[test]
    fn public_vs_active() {
        let mut shop = Shop::fallback();
        shop.status = None;
        assert!(shop.is_public());
        assert!(!shop.is_active());

        shop.status = Some(ShopStatus::Pending);
        assert!(!shop.is_public());

        shop.status = Some(ShopStatus::Active);
        assert!(shop.is_public() && shop.is_active());
    }

    #[test]
    fn quota_remaining_saturates() {
        let q = Quota {
            base: 2,
            extra: 1,
            used: 5,
        };
        assert_eq!(q.total(), 3);
        assert_eq!(q.remaining(), 0);
    }
}
