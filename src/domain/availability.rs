use super::{Book, BookId, Sale};

/// 在庫引当の可否
///
/// 判定は常に現在の書籍コレクションに対して行う（販売作成時の在庫数ではない）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAvailability {
    /// 在庫で賄える
    Available,
    /// 在庫不足
    Insufficient { requested: i64, on_hand: i64 },
    /// 参照先の書籍が存在しない（削除済みなど）
    BookMissing,
}

impl StockAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, StockAvailability::Available)
    }
}

/// 指定書籍の在庫で `quantity` を賄えるか判定する
pub fn check_quantity(books: &[Book], book: &BookId, quantity: i64) -> StockAvailability {
    match books.iter().find(|b| &b.id == book) {
        None => StockAvailability::BookMissing,
        Some(b) if b.can_supply(quantity) => StockAvailability::Available,
        Some(b) => StockAvailability::Insufficient {
            requested: quantity,
            on_hand: b.quantity,
        },
    }
}

/// 販売が現時点で充足可能か判定する
///
/// 新規作成・未完了販売の編集・完了処理の前提条件。
/// 完了済みの販売には参考情報でしかない（再チェックはしない）。
/// 確認と引当はアトミックではないため、複数の販売が合計で在庫を超えることはあり得る。
pub fn check_stock_availability(books: &[Book], sale: &Sale) -> StockAvailability {
    check_quantity(books, &sale.book_id, sale.quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_available_when_stock_covers_quantity() {
        let book = Book::new("A", 5, 1.0);
        let sale = Sale::new(&book, "C", 5, 2.0, Utc::now());
        assert_eq!(
            check_stock_availability(&[book], &sale),
            StockAvailability::Available
        );
    }

    #[test]
    fn test_insufficient_reports_live_quantity() {
        let mut book = Book::new("A", 5, 1.0);
        let sale = Sale::new(&book, "C", 4, 2.0, Utc::now());
        book.decrement_stock(3);

        assert_eq!(
            check_stock_availability(&[book], &sale),
            StockAvailability::Insufficient {
                requested: 4,
                on_hand: 2
            }
        );
    }

    #[test]
    fn test_orphaned_sale_has_no_book() {
        let book = Book::new("A", 5, 1.0);
        let sale = Sale::new(&book, "C", 1, 2.0, Utc::now());
        let availability = check_stock_availability(&[], &sale);
        assert_eq!(availability, StockAvailability::BookMissing);
        assert!(!availability.is_available());
    }
}
