// ── Typed request payloads for merchant commands ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrina_api::types::{ShopUpdate, StreamUpsert};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRequest {
    /// Target shop. Merchants may omit it; admins must name one unless
    /// previewing a shop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,
    pub title: String,
    pub platform: String,
    pub url: String,
    pub scheduled_at: DateTime<Utc>,
}

impl StreamRequest {
    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        let missing = |field: &str| CoreError::ValidationFailed {
            message: format!("Falta completar: {field}."),
        };
        if self.title.trim().is_empty() {
            return Err(missing("título"));
        }
        if self.platform.trim().is_empty() {
            return Err(missing("plataforma"));
        }
        if url::Url::parse(self.url.trim()).is_err() {
            return Err(CoreError::ValidationFailed {
                message: "El enlace del vivo no es una URL válida.".into(),
            });
        }
        Ok(())
    }

    pub(crate) fn to_wire(&self, shop_id: String) -> StreamUpsert {
        StreamUpsert {
            shop_id,
            title: self.title.trim().to_owned(),
            platform: self.platform.trim().to_owned(),
            url: self.url.trim().to_owned(),
            scheduled_at: self.scheduled_at,
        }
    }
}

/// Partial shop profile edit; unset fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateShopRequest {
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

impl UpdateShopRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<UpdateShopRequest> for ShopUpdate {
    fn from(r: UpdateShopRequest) -> Self {
        Self {
            name: r.name,
            legal_name: r.legal_name,
            logo_url: r.logo_url,
            address: r.address,
            city: r.city,
            province: r.province,
            whatsapp: r.whatsapp,
            instagram: r.instagram,
            facebook: r.facebook,
            website: r.website,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> StreamRequest {
        StreamRequest {
            shop_id: None,
            title: "  Vivo de otoño ".into(),
            platform: "Instagram".into(),
            url: "https://instagram.com/live/abc".into(),
            scheduled_at: Utc::now(),
        }
    }

    #[test]
    fn valid_request_trims_on_the_wire() {
        let r = request();
        assert!(r.validate().is_ok());
        assert_eq!(r.to_wire("s1".into()).title, "Vivo de otoño");
    }

    #[test]
    fn rejects_blank_title_and_bad_url() {
        let mut r = request();
        r.title = "   ".into();
        assert!(r.validate().is_err());

        let mut r = request();
        r.url = "no es un link".into();
        assert!(r.validate().is_err());
    }

    #[test]
    fn empty_shop_update() {
        assert!(UpdateShopRequest::default().is_empty());
        let r = UpdateShopRequest {
            city: Some("Córdoba".into()),
            ..UpdateShopRequest::default()
        };
        assert!(!r.is_empty());
    }
}
