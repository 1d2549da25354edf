use crate::ports::snapshot_store::{Result, SnapshotStore as SnapshotStoreTrait};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed implementation of SnapshotStore
///
/// Each key is stored as `<dir>/<key>.json`. Writes go to a sibling temp file
/// first and are renamed into place, so a crash mid-write leaves the previous
/// blob intact.
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(format!("Invalid snapshot key: {key:?}").into());
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl SnapshotStoreTrait for FileSnapshotStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::trace!(path = %path.display(), bytes = data.len(), "Snapshot written");
        Ok(())
    }
}
