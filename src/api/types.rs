use serde::{Deserialize, Serialize};

use crate::domain::{Report, format_amount};

/// 書籍一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListBooksQuery {
    /// 書籍名の部分一致検索
    pub q: Option<String>,
}

/// 販売一覧の状態フィルタ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleStatusFilter {
    Pending,
    Completed,
}

impl std::str::FromStr for SaleStatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SaleStatusFilter::Pending),
            "completed" => Ok(SaleStatusFilter::Completed),
            _ => Err(format!("Invalid sale status: {}", s)),
        }
    }
}

/// 販売一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListSalesQuery {
    /// 状態でフィルタリング（pending, completed）
    pub status: Option<String>,
}

/// 直近の販売取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct RecentSalesQuery {
    pub limit: Option<usize>,
}

/// 直近の販売の既定件数
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// 表示用に整形した金額
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedReport {
    pub total_profit: String,
    pub total_revenue: String,
    pub total_cost: String,
}

/// レポートレスポンス（GET /report）
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    #[serde(flatten)]
    pub report: Report,
    pub formatted: FormattedReport,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            formatted: FormattedReport {
                total_profit: format_amount(report.total_profit),
                total_revenue: format_amount(report.total_revenue),
                total_cost: format_amount(report.total_cost),
            },
            report,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// ステータスクエリパラメータのパースとバリデーション
pub fn parse_status_filter(status: &str) -> Result<SaleStatusFilter, String> {
    status.parse::<SaleStatusFilter>()
}
