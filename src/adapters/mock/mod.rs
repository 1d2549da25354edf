pub mod notification_sink;
pub mod snapshot_store;

#[allow(unused_imports)]
pub use notification_sink::LoggingNotificationSink;
#[allow(unused_imports)]
pub use snapshot_store::InMemorySnapshotStore;
