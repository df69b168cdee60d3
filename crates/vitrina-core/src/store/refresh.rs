// ── Snapshot application and local echoes ──
//
// A full refresh replaces every collection at once. Between refreshes,
// mutations may echo the server's authoritative answer into one slice.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::DataStore;
use crate::model::{Notification, Reel, Report, Shop, Stream, UserContext};

/// Everything a full refresh fetched, already normalized.
#[derive(Debug, Default)]
pub(crate) struct Snapshot {
    pub shops: Vec<Arc<Shop>>,
    pub streams: Vec<Stream>,
    pub reels: Vec<Reel>,
    /// `None` when anonymous; private slices are then cleared.
    pub notifications: Option<Vec<Notification>>,
    pub user_context: Option<UserContext>,
    /// Admin sessions only.
    pub reports: Option<Vec<Report>>,
}

fn keyed<T>(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> String) -> Vec<(String, Arc<T>)> {
    items
        .into_iter()
        .map(|item| (key(&item), Arc::new(item)))
        .collect()
}

impl DataStore {
    pub(crate) fn apply_snapshot(&self, snap: Snapshot) {
        self.shops.replace_all(
            snap.shops
                .into_iter()
                .map(|s| (s.id.clone(), s)),
        );
        self.streams.replace_all(keyed(snap.streams, |s| s.id.clone()));
        self.reels.replace_all(keyed(snap.reels, |r| r.id.clone()));

        match snap.notifications {
            Some(list) => self
                .notifications
                .replace_all(keyed(list, |n| n.id.clone())),
            None => self.notifications.clear(),
        }
        match snap.reports {
            Some(list) => self.reports.replace_all(keyed(list, |r| r.id.clone())),
            None => self.reports.clear(),
        }
        self.user_context
            .store(Arc::new(snap.user_context.unwrap_or_default()));

        let _ = self.last_full_refresh.send(Some(Utc::now()));
    }

    /// Remove reels whose `expires_at <= now`. Returns how many went.
    pub fn prune_expired_reels(&self, now: DateTime<Utc>) -> usize {
        let removed = self.reels.retain(|r| !r.is_expired(now));
        if removed > 0 {
            debug!(removed, "pruned expired reels");
        }
        removed
    }

    // ── Echoes ───────────────────────────────────────────────────────

    /// Streams and reels hold their own `Arc<Shop>`; repoint them too so
    /// visibility follows the new shop status.
    pub(crate) fn echo_shop(&self, shop: Shop) {
        let shop = Arc::new(shop);
        self.shops.upsert(shop.id.clone(), Arc::clone(&shop));

        let streams: Vec<Stream> = self
            .streams
            .snapshot()
            .iter()
            .filter(|s| s.shop.id == shop.id)
            .map(|s| Stream {
                shop: Arc::clone(&shop),
                ..(**s).clone()
            })
            .collect();
        for s in streams {
            self.streams.upsert(s.id.clone(), s);
        }

        let reels: Vec<Reel> = self
            .reels
            .snapshot()
            .iter()
            .filter(|r| r.shop.id == shop.id)
            .map(|r| Reel {
                shop: Arc::clone(&shop),
                ..(**r).clone()
            })
            .collect();
        for r in reels {
            self.reels.upsert(r.id.clone(), r);
        }
    }

    pub(crate) fn echo_stream(&self, stream: Stream) {
        self.streams.upsert(stream.id.clone(), stream);
    }

    pub(crate) fn echo_reel(&self, reel: Reel) {
        self.reels.upsert(reel.id.clone(), reel);
    }

    pub(crate) fn echo_report(&self, report: Report) {
        self.reports.upsert(report.id.clone(), report);
    }

    pub(crate) fn echo_stream_likes(&self, stream_id: &str, likes: u64) {
        if let Some(current) = self.streams.get(stream_id) {
            let mut next = (*current).clone();
            next.likes = likes;
            self.streams.upsert(stream_id, next);
        }
    }

    /// Replace one slice of the user context with the server's answer.
    pub(crate) fn echo_user_context(&self, update: impl Fn(&mut UserContext)) {
        self.user_context.rcu(|current| {
            let mut next = (**current).clone();
            update(&mut next);
            next
        });
    }

    pub(crate) fn echo_notifications_read(&self, id: Option<&str>) {
        let updated: Vec<Notification> = self
            .notifications
            .snapshot()
            .iter()
            .filter(|n| !n.read && id.is_none_or(|id| n.id == id))
            .map(|n| Notification {
                read: true,
                ..(**n).clone()
            })
            .collect();
        for n in updated {
            self.notifications.upsert(n.id.clone(), n);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{ShopStatus, StreamStatus};
    use chrono::TimeDelta;

    fn shop(id: &str) -> Arc<Shop> {
        let mut s = Shop::fallback();
        s.id = id.into();
        Arc::new(s)
    }

    fn reel(id: &str, shop: &Arc<Shop>, created_at: DateTime<Utc>) -> Reel {
        Reel {
            id: id.into(),
            shop: Arc::clone(shop),
            url: None,
            created_at,
            expires_at: created_at + Reel::ttl(),
            views: 0,
        }
    }

    fn stream(id: &str, shop: &Arc<Shop>) -> Stream {
        Stream {
            id: id.into(),
            shop: Arc::clone(shop),
            title: id.into(),
            platform: None,
            url: None,
            status: StreamStatus::Live,
            scheduled_at: Utc::now(),
            is_visible: true,
            views: 0,
            likes: 3,
            report_count: 0,
            extension_count: 0,
        }
    }

    #[test]
    fn snapshot_replaces_everything() {
        let store = DataStore::new();
        let s1 = shop("s1");
        store.apply_snapshot(Snapshot {
            shops: vec![Arc::clone(&s1)],
            streams: vec![stream("a", &s1), stream("b", &s1)],
            notifications: Some(vec![Notification {
                id: "n1".into(),
                message: "hola".into(),
                read: false,
                stream_id: None,
                created_at: None,
            }]),
            ..Snapshot::default()
        });
        assert_eq!(store.stream_count(), 2);
        assert_eq!(store.notifications_snapshot().len(), 1);
        assert!(store.last_full_refresh().is_some());

        store.apply_snapshot(Snapshot {
            shops: vec![Arc::clone(&s1)],
            streams: vec![stream("c", &s1)],
            ..Snapshot::default()
        });
        assert!(store.stream_by_id("a").is_none());
        assert!(store.notifications_snapshot().is_empty());
    }

    #[test]
    fn prune_drops_only_expired() {
        let store = DataStore::new();
        let s1 = shop("s1");
        let now = Utc::now();
        store.apply_snapshot(Snapshot {
            reels: vec![
                reel("old", &s1, now - TimeDelta::hours(25)),
                reel("edge", &s1, now - TimeDelta::hours(24)),
                reel("fresh", &s1, now - TimeDelta::hours(1)),
            ],
            ..Snapshot::default()
        });
        assert_eq!(store.prune_expired_reels(now), 2);
        assert!(store.reel_by_id("fresh").is_some());
        assert_eq!(store.prune_expired_reels(now), 0);
    }

    #[test]
    fn echoes_replace_single_slices() {
        let store = DataStore::new();
        let s1 = shop("s1");
        store.apply_snapshot(Snapshot {
            streams: vec![stream("a", &s1)],
            user_context: Some(UserContext {
                favorites: vec!["s9".into()],
                ..UserContext::default()
            }),
            ..Snapshot::default()
        });

        store.echo_stream_likes("a", 42);
        assert_eq!(store.stream_by_id("a").unwrap().likes, 42);

        store.echo_user_context(|ctx| ctx.reminders = vec!["a".into()]);
        let ctx = store.user_context();
        assert_eq!(ctx.favorites, vec!["s9".to_owned()]);
        assert_eq!(ctx.reminders, vec!["a".to_owned()]);
    }

    #[test]
    fn shop_echo_repoints_streams_and_reels() {
        let store = DataStore::new();
        let s1 = shop("s1");
        let s2 = shop("s2");
        store.apply_snapshot(Snapshot {
            shops: vec![Arc::clone(&s1), Arc::clone(&s2)],
            streams: vec![stream("a", &s1), stream("b", &s2)],
            reels: vec![reel("r", &s1, Utc::now())],
            ..Snapshot::default()
        });

        let mut suspended = (*s1).clone();
        suspended.status = Some(ShopStatus::Suspended);
        store.echo_shop(suspended);

        let status = |id: &str| store.stream_by_id(id).unwrap().shop.status;
        assert_eq!(status("a"), Some(ShopStatus::Suspended));
        assert_eq!(status("b"), s2.status);
        assert_eq!(
            store.reel_by_id("r").unwrap().shop.status,
            Some(ShopStatus::Suspended)
        );
        assert_eq!(store.stream_by_id("a").unwrap().likes, 3);
    }
}
