use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Book, Sale};

/// スナップショットのエンコード／デコードのエラー
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to encode snapshot")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode snapshot")]
    Decode(#[source] serde_json::Error),
}

/// 書籍と販売の全状態（永続化の単位）
///
/// どちらかのメンバーが欠けているブロブは、その側を空として読み込む。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub books: Vec<Book>,
}

impl Snapshot {
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        serde_json::to_vec(self).map_err(SnapshotError::Encode)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        serde_json::from_slice(bytes).map_err(SnapshotError::Decode)
    }
}

/// 借用したコレクションをそのままエンコードするためのビュー
#[derive(Serialize)]
pub(crate) struct SnapshotRef<'a> {
    pub sales: &'a [Sale],
    pub books: &'a [Book],
}

impl SnapshotRef<'_> {
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        serde_json::to_vec(self).map_err(SnapshotError::Encode)
    }
}
