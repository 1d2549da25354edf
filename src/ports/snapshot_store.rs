use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// スナップショットストアポート
///
/// 名前付きの単一ブロブを読み書きする不透明なキー・バリューストア。
/// 永続化の仕組み（ファイル、データベースなど）を抽象化する。
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// キーに対応するブロブを読み込む
    ///
    /// キーが存在しない場合は `None` を返す。
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// キーに対応するブロブを丸ごと書き換える
    ///
    /// 最後の書き込みが勝つ。楽観的ロックなどは行わない。
    async fn write(&self, key: &str, data: &[u8]) -> Result<()>;
}
