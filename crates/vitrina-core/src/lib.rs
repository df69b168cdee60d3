//! Domain layer between `vitrina-api` and its consumers (the CLI).
//!
//! - **[`Marketplace`]**: facade over the whole lifecycle.
//!   [`connect()`](Marketplace::connect) signs in with the configured
//!   credentials, loads shops, streams and reels, then spawns the command
//!   processor and background tasks. [`Marketplace::oneshot()`] runs a
//!   single request-response cycle for CLI invocations.
//!
//! - **[`DataStore`]**: lock-free reactive storage built on
//!   `EntityCollection<T>` (`DashMap` + `tokio::sync::watch`). Holds the
//!   normalized catalog plus the signed-in user's context and session.
//!
//! - **[`Command`]**: typed mutations routed through an `mpsc` channel.
//!   Client-side guards (preview, role, placeholder content) run before
//!   any network call.
//!
//! - **Pure rules**: [`selectors`] (visibility, ranking, search),
//!   [`session`] (view modes, admin preview), [`routing`] (navigation
//!   guards), [`mock`] (placeholder content), [`ics`] (calendar invites).

pub mod auth;
pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod ics;
pub mod idle;
pub mod mock;
pub mod model;
pub mod notice;
pub mod routing;
pub mod selectors;
pub mod session;
pub mod store;

mod rng;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{AuthErrorKind, AuthService, LoginStep, LoginWizard, ResetState};
pub use command::{Command, CommandResult, StreamRequest, UpdateShopRequest};
pub use config::{Audience, AuthCredentials, MarketplaceConfig, MockSettings};
pub use controller::{ConnectionState, Marketplace};
pub use error::CoreError;
pub use mock::MockDay;
pub use notice::{Notice, Tone};
pub use selectors::StreamFilter;
pub use session::{Preview, SessionEvent, SessionState, ViewMode};
pub use store::{DataStore, Subscription};

pub use model::{
    Notification, Reel, Report, ReportStatus, Role, Shop, ShopStatus, Stream, StreamStatus,
    UserContext,
};
