// ── Navigation surface and route guards ──

use std::fmt;

use crate::session::{SessionState, ViewMode};

pub const HOME: &str = "/";
pub const MERCHANT_HOME: &str = "/tienda";
pub const ADMIN_HOME: &str = "/admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Shops,
    ShopDetail(String),
    Streams,
    StreamDetail(String),
    Map,
    Account,
    /// `/tienda/*`, with the remainder after the prefix.
    Merchant(String),
    /// `/admin/*`, with the remainder after the prefix.
    Admin(String),
    /// Password reset deep link: `/reset`, or any path carrying
    /// `mode=resetPassword`.
    Reset { oob_code: Option<String> },
    NotFound(String),
}

impl Route {
    /// Parse a path and its raw query string (without the leading `?`).
    pub fn parse(path: &str, query: Option<&str>) -> Self {
        let params: Vec<(String, String)> = query
            .map(|q| {
                url::form_urlencoded::parse(q.trim_start_matches('?').as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        let param = |name: &str| {
            params
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };

        let trimmed = path.trim_end_matches('/');
        if param("mode").as_deref() == Some("resetPassword") || trimmed == "/reset" {
            return Self::Reset {
                oob_code: param("oobCode").filter(|c| !c.is_empty()),
            };
        }

        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Home,
            ["tiendas"] => Self::Shops,
            ["tiendas", id] => Self::ShopDetail((*id).to_owned()),
            ["en-vivo"] => Self::Streams,
            ["en-vivo", id] => Self::StreamDetail((*id).to_owned()),
            ["mapa"] => Self::Map,
            ["cuenta"] => Self::Account,
            ["tienda", rest @ ..] => Self::Merchant(rest.join("/")),
            ["admin", rest @ ..] => Self::Admin(rest.join("/")),
            _ => Self::NotFound(path.to_owned()),
        }
    }

    /// Client routes that need a signed-in user.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::ShopDetail(_) | Self::StreamDetail(_) | Self::Account
        )
    }

    fn is_client_surface(&self) -> bool {
        matches!(
            self,
            Self::Home
                | Self::Shops
                | Self::ShopDetail(_)
                | Self::Streams
                | Self::StreamDetail(_)
                | Self::Map
                | Self::Account
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Shops => f.write_str("/tiendas"),
            Self::ShopDetail(id) => write!(f, "/tiendas/{id}"),
            Self::Streams => f.write_str("/en-vivo"),
            Self::StreamDetail(id) => write!(f, "/en-vivo/{id}"),
            Self::Map => f.write_str("/mapa"),
            Self::Account => f.write_str("/cuenta"),
            Self::Merchant(rest) if rest.is_empty() => f.write_str(MERCHANT_HOME),
            Self::Merchant(rest) => write!(f, "{MERCHANT_HOME}/{rest}"),
            Self::Admin(rest) if rest.is_empty() => f.write_str(ADMIN_HOME),
            Self::Admin(rest) => write!(f, "{ADMIN_HOME}/{rest}"),
            Self::Reset { oob_code: Some(code) } => {
                let code: String = url::form_urlencoded::byte_serialize(code.as_bytes()).collect();
                write!(f, "/reset?mode=resetPassword&oobCode={code}")
            }
            Self::Reset { oob_code: None } => f.write_str("/reset"),
            Self::NotFound(path) => f.write_str(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect {
        to: String,
        /// Open the login prompt on arrival.
        open_login: bool,
        /// Where to go once signed in.
        intended: Option<String>,
    },
}

impl Navigation {
    fn to(path: &str) -> Self {
        Self::Redirect {
            to: path.to_owned(),
            open_login: false,
            intended: None,
        }
    }
}

/// Decide whether `route` may be shown for `session`.
pub fn resolve_navigation(session: &SessionState, route: &Route) -> Navigation {
    let mode = session.view_mode();
    match route {
        Route::Reset { .. } => Navigation::Allow,
        Route::NotFound(_) => Navigation::to(HOME),
        Route::Admin(_) if mode == ViewMode::Admin => Navigation::Allow,
        Route::Merchant(_) if mode == ViewMode::Merchant => Navigation::Allow,
        Route::Admin(_) | Route::Merchant(_) => Navigation::to(HOME),
        r if r.is_client_surface() => match mode {
            ViewMode::Admin => Navigation::to(ADMIN_HOME),
            ViewMode::Merchant => Navigation::to(MERCHANT_HOME),
            ViewMode::Client if r.requires_login() && !session.is_authenticated() => {
                Navigation::Redirect {
                    to: HOME.to_owned(),
                    open_login: true,
                    intended: Some(r.to_string()),
                }
            }
            ViewMode::Client => Navigation::Allow,
        },
        _ => Navigation::Allow,
    }
}

/// Landing page after a successful login.
pub fn post_login_destination(session: &SessionState, intended: Option<&str>) -> String {
    match session.view_mode() {
        ViewMode::Admin => ADMIN_HOME.to_owned(),
        ViewMode::Merchant => MERCHANT_HOME.to_owned(),
        ViewMode::Client => intended.unwrap_or(HOME).to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Role;
    use crate::session::{AuthProfile, Preview, SessionEvent};
    use pretty_assertions::assert_eq;

    fn session(role: Option<Role>) -> SessionState {
        let anon = SessionState::anonymous();
        match role {
            None => anon,
            Some(role) => anon.reduce(SessionEvent::Login(AuthProfile {
                uid: "u".into(),
                email: None,
                role,
                shop_id: (role == Role::Shop).then(|| "s1".to_owned()),
                email_verified: true,
            })),
        }
    }

    #[test]
    fn parses_routing_surface() {
        assert_eq!(Route::parse("/", None), Route::Home);
        assert_eq!(Route::parse("/tiendas/", None), Route::Shops);
        assert_eq!(Route::parse("/tiendas/abc", None), Route::ShopDetail("abc".into()));
        assert_eq!(Route::parse("/en-vivo/x1", None), Route::StreamDetail("x1".into()));
        assert_eq!(Route::parse("/tienda/vivos", None), Route::Merchant("vivos".into()));
        assert_eq!(Route::parse("/admin", None), Route::Admin(String::new()));
        assert_eq!(Route::parse("/nada/por/aca", None), Route::NotFound("/nada/por/aca".into()));
    }

    #[test]
    fn reset_deep_link_from_any_path() {
        assert_eq!(
            Route::parse("/", Some("mode=resetPassword&oobCode=abc%2B1&apiKey=k")),
            Route::Reset {
                oob_code: Some("abc+1".into())
            }
        );
        assert_eq!(Route::parse("/reset", None), Route::Reset { oob_code: None });
    }

    #[test]
    fn reset_link_round_trips_encoded_code() {
        let route = Route::parse("/", Some("mode=resetPassword&oobCode=abc%2B1%26x"));
        let link = route.to_string();
        assert_eq!(link, "/reset?mode=resetPassword&oobCode=abc%2B1%26x");

        let (path, query) = link.split_once('?').unwrap();
        assert_eq!(Route::parse(path, Some(query)), route);
    }

    #[test]
    fn anonymous_shop_detail_opens_login_with_intended_path() {
        let nav = resolve_navigation(&session(None), &Route::ShopDetail("s1".into()));
        assert_eq!(
            nav,
            Navigation::Redirect {
                to: "/".into(),
                open_login: true,
                intended: Some("/tiendas/s1".into()),
            }
        );
        assert_eq!(
            resolve_navigation(&session(None), &Route::Shops),
            Navigation::Allow
        );
    }

    #[test]
    fn role_areas_are_guarded() {
        assert_eq!(
            resolve_navigation(&session(None), &Route::Admin(String::new())),
            Navigation::to("/")
        );
        assert_eq!(
            resolve_navigation(&session(Some(Role::Client)), &Route::Merchant(String::new())),
            Navigation::to("/")
        );
        assert_eq!(
            resolve_navigation(&session(Some(Role::Shop)), &Route::Admin("reportes".into())),
            Navigation::to("/")
        );
        assert_eq!(
            resolve_navigation(&session(Some(Role::Admin)), &Route::Admin(String::new())),
            Navigation::Allow
        );
    }

    #[test]
    fn staff_are_sent_home_from_client_routes() {
        assert_eq!(
            resolve_navigation(&session(Some(Role::Shop)), &Route::Streams),
            Navigation::to("/tienda")
        );
        assert_eq!(
            resolve_navigation(&session(Some(Role::Admin)), &Route::Home),
            Navigation::to("/admin")
        );
        let previewing = session(Some(Role::Admin)).reduce(SessionEvent::EnterPreview(Preview::Client));
        assert_eq!(resolve_navigation(&previewing, &Route::Home), Navigation::Allow);
    }

    #[test]
    fn post_login_landing() {
        assert_eq!(post_login_destination(&session(Some(Role::Client)), Some("/tiendas/s1")), "/tiendas/s1");
        assert_eq!(post_login_destination(&session(Some(Role::Client)), None), "/");
        assert_eq!(post_login_destination(&session(Some(Role::Shop)), Some("/tiendas/s1")), "/tienda");
    }
}
