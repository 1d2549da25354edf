pub mod snapshot_store;

pub use snapshot_store::SnapshotStore as PostgresSnapshotStore;
pub use snapshot_store::run_migrations;
