use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 通知対象レコードの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Sales,
    Books,
}

impl RecordKind {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Sales => "sales",
            RecordKind::Books => "books",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 通知シンクポート
///
/// 個々のレコード書き込みを外部システム（スプレッドシートなど）へミラーする。
/// 配信はベストエフォート。呼び出し側は失敗をログに残して破棄し、再送しない。
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// レコードを1件送信する
    async fn send(&self, kind: RecordKind, record: Value) -> Result<()>;
}
