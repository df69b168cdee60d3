// ── Session state and view-mode resolution ──
//
// The signed-in identity plus an optional admin preview, held as an
// immutable value. Every change goes through `SessionState::reduce` over
// a `SessionEvent`; nothing mutates fields in place.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::CoreError;
use crate::model::Role;

/// Which surface of the marketplace is being presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ViewMode {
    Client,
    Merchant,
    Admin,
}

impl From<Role> for ViewMode {
    fn from(role: Role) -> Self {
        match role {
            Role::Client => Self::Client,
            Role::Shop => Self::Merchant,
            Role::Admin => Self::Admin,
        }
    }
}

/// Identity of the signed-in account as resolved at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthProfile {
    pub uid: String,
    pub email: Option<String>,
    pub role: Role,
    /// Owned shop, for merchant accounts.
    pub shop_id: Option<String>,
    pub email_verified: bool,
}

/// What an admin is previewing the app as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "as", rename_all = "snake_case")]
pub enum Preview {
    Client,
    Merchant { shop_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Login(AuthProfile),
    Logout,
    EnterPreview(Preview),
    ExitPreview,
}

/// Who the app is acting as after preview resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveUser {
    pub mode: ViewMode,
    pub shop_id: Option<String>,
    /// Admin previewing a merchant; allowed past the preview blocker.
    pub admin_override: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<AuthProfile>,
    pub preview: Option<Preview>,
}

impl SessionState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Apply one event, returning the next state.
    ///
    /// Login always clears a preview; previews are only honored for
    /// signed-in admins and are otherwise ignored.
    #[must_use]
    pub fn reduce(&self, event: SessionEvent) -> Self {
        match event {
            SessionEvent::Login(profile) => Self {
                user: Some(profile),
                preview: None,
            },
            SessionEvent::Logout => Self::anonymous(),
            SessionEvent::EnterPreview(preview) if self.is_admin() => Self {
                user: self.user.clone(),
                preview: Some(preview),
            },
            SessionEvent::EnterPreview(_) => self.clone(),
            SessionEvent::ExitPreview => Self {
                user: self.user.clone(),
                preview: None,
            },
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_some()
    }

    /// The account's own mode, ignoring previews. Anonymous sessions are
    /// clients.
    pub fn natural_mode(&self) -> ViewMode {
        self.role().map_or(ViewMode::Client, ViewMode::from)
    }

    /// Preview mode if one is active, else the natural mode.
    pub fn view_mode(&self) -> ViewMode {
        match &self.preview {
            Some(Preview::Client) => ViewMode::Client,
            Some(Preview::Merchant { .. }) => ViewMode::Merchant,
            None => self.natural_mode(),
        }
    }

    pub fn effective_user(&self) -> EffectiveUser {
        match &self.preview {
            Some(Preview::Merchant { shop_id }) => EffectiveUser {
                mode: ViewMode::Merchant,
                shop_id: Some(shop_id.clone()),
                admin_override: self.is_admin(),
            },
            Some(Preview::Client) => EffectiveUser {
                mode: ViewMode::Client,
                shop_id: None,
                admin_override: false,
            },
            None => EffectiveUser {
                mode: self.natural_mode(),
                shop_id: self.user.as_ref().and_then(|u| u.shop_id.clone()),
                admin_override: false,
            },
        }
    }

    /// Favorites, reminders, likes and reports are for real client
    /// accounts outside any preview.
    pub fn can_client_interact(&self) -> bool {
        self.role() == Some(Role::Client) && !self.is_previewing()
    }
}

// ── Action guards ────────────────────────────────────────────────────

/// Mutating merchant actions subject to the preview blocker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum GuardedAction {
    #[strum(to_string = "crear vivos")]
    CreateStream,
    #[strum(to_string = "editar vivos")]
    UpdateStream,
    #[strum(to_string = "cancelar vivos")]
    CancelStream,
    #[strum(to_string = "extender vivos")]
    ExtendStream,
    #[strum(to_string = "editar la tienda")]
    UpdateShop,
    #[strum(to_string = "comprar cupos")]
    BuyQuota,
    #[strum(to_string = "publicar reels")]
    CreateReel,
}

/// Reject `action` while a preview is active, unless it is an admin
/// previewing a merchant.
pub fn guard_action(state: &SessionState, action: GuardedAction) -> Result<(), CoreError> {
    if state.is_previewing() && !state.effective_user().admin_override {
        return Err(CoreError::PreviewBlocked {
            message: format!("Estás en vista previa: no podés {action}."),
        });
    }
    Ok(())
}

/// Resolve the shop a merchant action applies to.
///
/// Merchants act on their own shop; admins act on the previewed shop or
/// on an explicitly named one.
pub fn merchant_scope(
    state: &SessionState,
    action: GuardedAction,
    requested: Option<&str>,
) -> Result<String, CoreError> {
    guard_action(state, action)?;
    let user = state.effective_user();
    let denied = || CoreError::NotPermitted {
        message: format!("Solo las tiendas pueden {action}."),
    };

    match (state.natural_mode(), user.mode) {
        (ViewMode::Admin, _) => requested
            .map(str::to_owned)
            .or(user.shop_id)
            .ok_or_else(|| CoreError::ValidationFailed {
                message: "Indicá la tienda sobre la que querés operar.".into(),
            }),
        (ViewMode::Merchant, ViewMode::Merchant) => {
            let own = user.shop_id.ok_or_else(denied)?;
            match requested {
                Some(other) if other != own => Err(denied()),
                _ => Ok(own),
            }
        }
        _ => Err(denied()),
    }
}

/// Client interactions (favorite, reminder, like, report, view) need a
/// signed-in client outside any preview.
pub fn guard_client_interaction(state: &SessionState) -> Result<(), CoreError> {
    if !state.is_authenticated() {
        return Err(CoreError::NotSignedIn);
    }
    if !state.can_client_interact() {
        return Err(CoreError::NotPermitted {
            message: "Esta acción está disponible solo para cuentas de cliente.".into(),
        });
    }
    Ok(())
}

pub fn guard_admin(state: &SessionState) -> Result<(), CoreError> {
    if !state.is_authenticated() {
        return Err(CoreError::NotSignedIn);
    }
    if !state.is_admin() {
        return Err(CoreError::NotPermitted {
            message: "Solo administradores.".into(),
        });
    }
    if state.is_previewing() {
        return Err(CoreError::PreviewBlocked {
            message: "Salí de la vista previa para moderar.".into(),
        });
    }
    Ok(())
}
