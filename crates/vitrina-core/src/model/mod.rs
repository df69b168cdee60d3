// ── Domain model ──
//
// Canonical client-side shapes of marketplace entities. The backend owns
// all of them; these are session-scoped views rebuilt on every refetch.

pub mod notification;
pub mod reel;
pub mod report;
pub mod shop;
pub mod stream;
pub mod user;

pub use notification::Notification;
pub use reel::{REEL_TTL_HOURS, Reel};
pub use report::{Report, ReportStatus};
pub use shop::{GeoPoint, Penalty, PlanTier, Quota, Rating, Shop, ShopContact, ShopStatus};
pub use stream::{MAX_STREAM_EXTENSIONS, Stream, StreamStatus};
pub use user::{Role, UserContext};
