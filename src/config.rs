use std::env;
use std::path::PathBuf;

use crate::application::inventory::DEFAULT_STORAGE_KEY;

/// アプリケーション設定（環境変数から読み込む）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// HTTPサーバーのポート
    pub port: u16,

    /// PostgreSQL接続文字列。指定時はPostgreSQLにスナップショットを保存する
    pub database_url: Option<String>,

    /// ファイル保存時のディレクトリ
    pub data_dir: PathBuf,

    /// スナップショットのキー
    pub storage_key: String,
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let data_dir = PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| "./data".to_string()));

        let storage_key = lookup("STORAGE_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue("STORAGE_KEY".to_string()));
        }

        Ok(Self {
            port,
            database_url,
            data_dir,
            storage_key,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
