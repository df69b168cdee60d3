// ── Reactive data store ──

mod collection;
mod data_store;
mod refresh;
mod subscription;

pub use data_store::DataStore;
pub(crate) use refresh::Snapshot;
pub use subscription::Subscription;
