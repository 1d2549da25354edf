use thiserror::Error;

/// 入力検証のエラー
///
/// フォームからの入力をストアに渡す前に検出する。ストア自身は再検証しない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 必須項目が空
    #[error("{field} is required")]
    Required { field: &'static str },

    /// 数値項目が正の値でない（数値でない入力は0として扱われる）
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
}
