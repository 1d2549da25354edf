use serde::{Deserialize, Serialize};

use super::BookId;

/// 書籍 - 在庫管理単位（SKU）
///
/// `total_cost` は `quantity * price_per_unit` だが、ストアは再計算しない。
/// 呼び出し側がupsert前に [`Book::with_total_cost_recomputed`] で更新する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    /// 表示名。upsert時の重複判定キーを兼ねる
    pub name: String,
    /// 仕入れ単価
    pub price_per_unit: f64,
    /// 在庫数
    pub quantity: i64,
    pub total_cost: f64,
}

impl Book {
    /// 新しいIDで書籍を作成する（合計原価は計算済み）
    pub fn new(name: impl Into<String>, quantity: i64, price_per_unit: f64) -> Self {
        Self {
            id: BookId::new(),
            name: name.into(),
            price_per_unit,
            quantity,
            total_cost: total_cost(quantity, price_per_unit),
        }
    }

    /// 現在の数量と単価から合計原価を再計算したコピーを返す
    pub fn with_total_cost_recomputed(mut self) -> Self {
        self.total_cost = total_cost(self.quantity, self.price_per_unit);
        self
    }

    /// 在庫を減らす
    ///
    /// 不変条件：在庫は0未満にならない。
    /// 要求数が在庫を超えてもエラーにはせず、0で打ち止めにする。
    pub fn decrement_stock(&mut self, amount: i64) {
        self.quantity = self.quantity.saturating_sub(amount).max(0);
    }

    /// 指定数量を現在の在庫で賄えるか
    pub fn can_supply(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }

    pub fn is_in_stock(&self) -> bool {
        self.quantity > 0
    }
}

fn total_cost(quantity: i64, price_per_unit: f64) -> f64 {
    quantity as f64 * price_per_unit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_computes_total_cost() {
        let book = Book::new("A", 10, 5.0);
        assert_eq!(book.quantity, 10);
        assert_eq!(book.total_cost, 50.0);
    }

    #[test]
    fn test_decrement_within_stock() {
        let mut book = Book::new("A", 10, 5.0);
        book.decrement_stock(3);
        assert_eq!(book.quantity, 7);
    }

    #[test]
    fn test_decrement_clamps_at_zero() {
        let mut book = Book::new("A", 7, 5.0);
        book.decrement_stock(100);
        assert_eq!(book.quantity, 0);
    }

    #[test]
    fn test_decrement_by_extreme_amounts_does_not_overflow() {
        let mut book = Book::new("A", 10, 1.0);
        book.decrement_stock(i64::MIN);
        assert_eq!(book.quantity, i64::MAX);

        let mut book = Book::new("A", 10, 1.0);
        book.decrement_stock(i64::MAX);
        assert_eq!(book.quantity, 0);
    }

    #[test]
    fn test_decrement_does_not_touch_total_cost() {
        let mut book = Book::new("A", 10, 5.0);
        book.decrement_stock(4);
        assert_eq!(book.total_cost, 50.0);

        let book = book.with_total_cost_recomputed();
        assert_eq!(book.total_cost, 30.0);
    }

    #[test]
    fn test_can_supply() {
        let book = Book::new("A", 5, 1.0);
        assert!(book.can_supply(5));
        assert!(!book.can_supply(6));
    }

    #[test]
    fn test_serialized_field_names() {
        let book = Book {
            id: BookId::from_string("b1"),
            name: "A".to_string(),
            price_per_unit: 2.5,
            quantity: 4,
            total_cost: 10.0,
        };
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "b1",
                "name": "A",
                "pricePerUnit": 2.5,
                "quantity": 4,
                "totalCost": 10.0
            })
        );
    }
}
