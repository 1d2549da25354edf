pub mod notification_sink;
pub mod snapshot_store;

pub use notification_sink::{NotificationSink, RecordKind};
pub use snapshot_store::SnapshotStore;
