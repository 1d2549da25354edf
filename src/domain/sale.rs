use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Book, BookId, SaleId};

/// 販売 - 1件の顧客取引（未完了または完了）
///
/// `book_name` と `customer_name` は作成時点のスナップショット。
/// 書籍の名前が後で変わっても追随しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    /// 書籍への弱い参照（書籍が削除されると解決できなくなる）
    pub book_id: BookId,
    pub customer_name: String,
    pub book_name: String,
    pub quantity: i64,
    pub wholesale_price: f64,
    pub selling_price: f64,
    pub total_cost: f64,
    pub profit: f64,
    /// true: 在庫の引き当て済み / false: 未完了
    pub completed: bool,
    pub date: DateTime<Utc>,
}

/// 販売の金額集計（フォームのプレビュー用）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleTotals {
    pub total_cost: f64,
    pub total_revenue: f64,
    pub profit: f64,
}

/// 数量と単価から原価・売上・利益を計算する（純粋関数）
pub fn calculate_totals(quantity: i64, wholesale_price: f64, selling_price: f64) -> SaleTotals {
    let quantity = quantity as f64;
    let total_cost = quantity * wholesale_price;
    let total_revenue = quantity * selling_price;
    SaleTotals {
        total_cost,
        total_revenue,
        profit: total_revenue - total_cost,
    }
}

impl Sale {
    /// 書籍から未完了の販売を作成する
    ///
    /// 仕入れ単価は書籍の `price_per_unit` を採用する。
    /// 在庫確認はここでは行わない（呼び出し側の責務）。
    pub fn new(
        book: &Book,
        customer_name: impl Into<String>,
        quantity: i64,
        selling_price: f64,
        date: DateTime<Utc>,
    ) -> Self {
        let totals = calculate_totals(quantity, book.price_per_unit, selling_price);
        Self {
            id: SaleId::new(),
            book_id: book.id.clone(),
            customer_name: customer_name.into(),
            book_name: book.name.clone(),
            quantity,
            wholesale_price: book.price_per_unit,
            selling_price,
            total_cost: totals.total_cost,
            profit: totals.profit,
            completed: false,
            date,
        }
    }

    /// 数量と単価から `total_cost` と `profit` を再計算したコピーを返す
    pub fn with_totals_recomputed(mut self) -> Self {
        let totals = calculate_totals(self.quantity, self.wholesale_price, self.selling_price);
        self.total_cost = totals.total_cost;
        self.profit = totals.profit;
        self
    }

    pub fn revenue(&self) -> f64 {
        self.selling_price * self.quantity as f64
    }

    pub fn is_pending(&self) -> bool {
        !self.completed
    }
}
