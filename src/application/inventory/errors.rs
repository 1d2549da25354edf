use thiserror::Error;

use crate::domain::{BookId, SaleId, SnapshotError, ValidationError};

/// 在庫・販売アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum InventoryError {
    /// 書籍が存在しない
    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    /// 販売が存在しない
    #[error("Sale not found: {0}")]
    SaleNotFound(SaleId),

    /// 既に完了済みの販売
    #[error("Sale already completed: {0}")]
    SaleAlreadyCompleted(SaleId),

    /// 在庫不足
    #[error("Insufficient stock for book {book_id}: requested {requested}, on hand {on_hand}")]
    InsufficientStock {
        book_id: BookId,
        requested: i64,
        on_hand: i64,
    },

    /// 入力検証のエラー
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// スナップショットのエンコード／デコードのエラー
    #[error("Snapshot codec error")]
    Snapshot(#[from] SnapshotError),

    /// SnapshotStoreのエラー
    #[error("Snapshot store error")]
    SnapshotStore(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, InventoryError>;
