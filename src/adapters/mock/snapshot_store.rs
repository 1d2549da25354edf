use crate::ports::snapshot_store::{Result, SnapshotStore as SnapshotStoreTrait};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory implementation of SnapshotStore
///
/// Keeps blobs in a map keyed by name. Reads and writes can be made to fail
/// so that callers can exercise their persistence-failure paths.
#[allow(dead_code)]
pub struct InMemorySnapshotStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

#[allow(dead_code)]
impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Seed a blob for testing purposes
    pub fn insert(&self, key: &str, data: impl Into<Vec<u8>>) {
        self.lock().insert(key.to_string(), data.into());
    }

    /// Raw blob currently stored under `key`
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key).cloned()
    }

    /// Make subsequent reads fail
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStoreTrait for InMemorySnapshotStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err("simulated snapshot read failure".into());
        }
        Ok(self.get(key))
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err("simulated snapshot write failure".into());
        }
        self.insert(key, data);
        Ok(())
    }
}
