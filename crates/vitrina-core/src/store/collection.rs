// ── Generic reactive entity collection ──
//
// Concurrent storage keyed by entity id, with push-based change
// notification via a `watch` channel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

/// A concurrent, reactive collection for a single entity type.
///
/// Every mutation rebuilds the snapshot that subscribers receive. The
/// snapshot is ordered by key so it is reproducible across rebuilds.
pub(crate) struct EntityCollection<T: Send + Sync + 'static> {
    by_key: DashMap<String, Arc<T>>,
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            by_key: DashMap::new(),
            snapshot,
        }
    }

    /// Insert or update an entity. Returns `true` if the key was new.
    pub(crate) fn upsert(&self, key: impl Into<String>, entity: impl Into<Arc<T>>) -> bool {
        let is_new = self.by_key.insert(key.into(), entity.into()).is_none();
        self.rebuild_snapshot();
        is_new
    }

    /// Replace the whole collection, notifying subscribers once.
    pub(crate) fn replace_all<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, Arc<T>)>,
    {
        self.by_key.clear();
        for (key, entity) in entries {
            self.by_key.insert(key, entity);
        }
        self.rebuild_snapshot();
    }

    pub(crate) fn remove(&self, key: &str) -> Option<Arc<T>> {
        let removed = self.by_key.remove(key).map(|(_, v)| v);
        if removed.is_some() {
            self.rebuild_snapshot();
        }
        removed
    }

    /// Drop every entity failing `keep`. Returns how many were removed.
    pub(crate) fn retain(&self, keep: impl Fn(&T) -> bool) -> usize {
        let before = self.by_key.len();
        self.by_key.retain(|_, v| keep(v));
        let removed = before - self.by_key.len();
        if removed > 0 {
            self.rebuild_snapshot();
        }
        removed
    }

    pub(crate) fn get(&self, key: &str) -> Option<Arc<T>> {
        self.by_key.get(key).map(|r| Arc::clone(r.value()))
    }

    /// Current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn clear(&self) {
        self.by_key.clear();
        self.rebuild_snapshot();
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn rebuild_snapshot(&self) {
        let mut entries: Vec<(String, Arc<T>)> = self
            .by_key
            .iter()
            .map(|r| (r.key().clone(), Arc::clone(r.value())))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let values = entries.into_iter().map(|(_, v)| v).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}
