use serde::Serialize;

use super::{Book, Sale};

/// 利益・売上レポート
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub total_profit: f64,
    /// 未完了を含む全販売の数量合計
    pub total_books_sold: i64,
    pub total_books_remaining: i64,
    pub total_revenue: f64,
    pub total_cost: f64,
}

/// 現在の書籍・販売からレポートを集計する（純粋関数）
///
/// 販売の集計は完了・未完了を区別しない。
/// 未完了の販売分は在庫からまだ引かれていないため二重に数えられるが、既存の挙動として維持する。
pub fn generate_report(books: &[Book], sales: &[Sale]) -> Report {
    Report {
        total_profit: sum_amounts(sales.iter().map(|s| s.profit)),
        total_books_sold: sum_quantities(sales.iter().map(|s| s.quantity)),
        total_books_remaining: sum_quantities(books.iter().map(|b| b.quantity)),
        total_revenue: sum_amounts(sales.iter().map(|s| s.selling_price * s.quantity as f64)),
        total_cost: sum_amounts(sales.iter().map(|s| s.wholesale_price * s.quantity as f64)),
    }
}

/// 数量の合計（`i64` の範囲で飽和する）
fn sum_quantities(quantities: impl Iterator<Item = i64>) -> i64 {
    quantities.fold(0, i64::saturating_add)
}

/// 金額の合計。空なら `0.0`（`-0.0` ではない）
fn sum_amounts(amounts: impl Iterator<Item = f64>) -> f64 {
    amounts.fold(0.0, |acc, x| acc + x)
}

/// 金額を小数点以下2桁・3桁区切りで表示する（例: `1,234.50`）
pub fn format_amount(amount: f64) -> String {
    let rendered = format!("{:.2}", amount.abs());
    let (integer, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && rendered != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
