// ── Central reactive data store ──
//
// Session-scoped view of server state: entity collections plus the
// signed-in user's context and session. Nothing here is a source of
// truth; everything is replaced on the next full refresh.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::EntityCollection;
use super::subscription::Subscription;
use crate::model::{Notification, Reel, Report, Shop, Stream, UserContext};
use crate::session::{SessionEvent, SessionState};

pub struct DataStore {
    pub(crate) shops: EntityCollection<Shop>,
    pub(crate) streams: EntityCollection<Stream>,
    pub(crate) reels: EntityCollection<Reel>,
    pub(crate) notifications: EntityCollection<Notification>,
    pub(crate) reports: EntityCollection<Report>,
    pub(crate) user_context: ArcSwap<UserContext>,
    pub(crate) session: ArcSwap<SessionState>,
    pub(crate) last_full_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (last_full_refresh, _) = watch::channel(None);
        Self {
            shops: EntityCollection::new(),
            streams: EntityCollection::new(),
            reels: EntityCollection::new(),
            notifications: EntityCollection::new(),
            reports: EntityCollection::new(),
            user_context: ArcSwap::from_pointee(UserContext::default()),
            session: ArcSwap::from_pointee(SessionState::anonymous()),
            last_full_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn shops_snapshot(&self) -> Arc<Vec<Arc<Shop>>> {
        self.shops.snapshot()
    }

    pub fn streams_snapshot(&self) -> Arc<Vec<Arc<Stream>>> {
        self.streams.snapshot()
    }

    pub fn reels_snapshot(&self) -> Arc<Vec<Arc<Reel>>> {
        self.reels.snapshot()
    }

    /// Newest first.
    pub fn notifications_snapshot(&self) -> Vec<Arc<Notification>> {
        let mut out = self.notifications.snapshot().to_vec();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    pub fn reports_snapshot(&self) -> Arc<Vec<Arc<Report>>> {
        self.reports.snapshot()
    }

    pub fn user_context(&self) -> Arc<UserContext> {
        self.user_context.load_full()
    }

    pub fn session(&self) -> Arc<SessionState> {
        self.session.load_full()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn shop_by_id(&self, id: &str) -> Option<Arc<Shop>> {
        self.shops.get(id)
    }

    pub fn stream_by_id(&self, id: &str) -> Option<Arc<Stream>> {
        self.streams.get(id)
    }

    pub fn reel_by_id(&self, id: &str) -> Option<Arc<Reel>> {
        self.reels.get(id)
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn shop_count(&self) -> usize {
        self.shops.len()
    }

    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    pub fn reel_count(&self) -> usize {
        self.reels.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_shops(&self) -> Subscription<Shop> {
        Subscription::new(self.shops.subscribe())
    }

    pub fn subscribe_streams(&self) -> Subscription<Stream> {
        Subscription::new(self.streams.subscribe())
    }

    pub fn subscribe_reels(&self) -> Subscription<Reel> {
        Subscription::new(self.reels.subscribe())
    }

    pub fn subscribe_notifications(&self) -> Subscription<Notification> {
        Subscription::new(self.notifications.subscribe())
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Run `event` through the session reducer and publish the result.
    pub fn apply_session_event(&self, event: &SessionEvent) -> Arc<SessionState> {
        self.session
            .rcu(|current| current.reduce(event.clone()));
        let next = self.session.load_full();
        if !next.is_authenticated() {
            self.clear_private_state();
        }
        next
    }

    /// Forget everything tied to the signed-in account.
    pub(crate) fn clear_private_state(&self) {
        self.user_context.store(Arc::new(UserContext::default()));
        self.notifications.clear();
        self.reports.clear();
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_full_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_full_refresh.borrow()
    }

    /// How long ago the last full refresh occurred, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_full_refresh().map(|t| Utc::now() - t)
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
