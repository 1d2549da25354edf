use chrono::{DateTime, Utc};

use crate::domain::{
    BookId, Sale, SaleId, StockAvailability, check_quantity,
    commands::{EditSale, RecordSale},
};

use super::errors::{InventoryError, Result};
use super::store::InventoryStore;

/// 在庫確認の結果をエラーに変換する
fn ensure_available(availability: StockAvailability, book_id: &BookId) -> Result<()> {
    match availability {
        StockAvailability::Available => Ok(()),
        StockAvailability::BookMissing => Err(InventoryError::BookNotFound(book_id.clone())),
        StockAvailability::Insufficient { requested, on_hand } => {
            Err(InventoryError::InsufficientStock {
                book_id: book_id.clone(),
                requested,
                on_hand,
            })
        }
    }
}

/// 販売を登録する
///
/// ビジネスルール：
/// - 顧客名が空でないこと
/// - 書籍が選択されており、存在すること
/// - 数量が正の値であり、現在の在庫以下であること
///
/// 仕入れ単価は書籍の単価を採用する。登録時点では在庫を減らさない（未完了）。
/// 在庫確認と引当はアトミックではないため、未完了の販売の合計が在庫を超えることはあり得る。
pub async fn record_sale(
    store: &mut InventoryStore,
    cmd: RecordSale,
    at: DateTime<Utc>,
) -> Result<Sale> {
    let input = cmd.validate()?;

    let book = store
        .find_book(&input.book_id)
        .ok_or_else(|| InventoryError::BookNotFound(input.book_id.clone()))?;
    ensure_available(
        check_quantity(store.books(), &input.book_id, input.quantity),
        &input.book_id,
    )?;

    let sale = Sale::new(book, input.customer_name, input.quantity, input.selling_price, at);
    store.add_sale(sale.clone()).await?;
    Ok(sale)
}

/// 未完了の販売を編集する
///
/// 顧客名・数量・販売単価を差し替え、原価と利益を再計算する。
/// 新しい数量で現在の在庫を再確認する。ID・書籍・日付は変えない。
pub async fn edit_sale(store: &mut InventoryStore, id: &SaleId, cmd: EditSale) -> Result<Sale> {
    let (customer_name, quantity, selling_price) = cmd.validate()?;

    let existing = store
        .find_sale(id)
        .ok_or_else(|| InventoryError::SaleNotFound(id.clone()))?;
    if existing.completed {
        return Err(InventoryError::SaleAlreadyCompleted(id.clone()));
    }
    ensure_available(
        check_quantity(store.books(), &existing.book_id, quantity),
        &existing.book_id,
    )?;

    let edited = Sale {
        customer_name,
        quantity,
        selling_price,
        ..existing.clone()
    }
    .with_totals_recomputed();

    let sales = store
        .sales()
        .iter()
        .map(|s| if &s.id == id { edited.clone() } else { s.clone() })
        .collect();
    store.replace_sales(sales).await?;
    Ok(edited)
}

/// 未完了の販売を完了する（在庫を引き当てる）
pub async fn complete_sale(store: &mut InventoryStore, id: &SaleId) -> Result<()> {
    store.complete_sale(id).await
}

/// 販売を削除する
///
/// 完了済みの販売を削除しても在庫は戻さない。
pub async fn delete_sale(store: &mut InventoryStore, id: &SaleId) -> Result<()> {
    if store.find_sale(id).is_none() {
        return Err(InventoryError::SaleNotFound(id.clone()));
    }

    let sales = store.sales().iter().filter(|s| &s.id != id).cloned().collect();
    store.replace_sales(sales).await
}

/// 直近の販売（新しい順に最大 `limit` 件）
pub fn recent_sales<'a, I>(sales: I, limit: usize) -> Vec<&'a Sale>
where
    I: IntoIterator<Item = &'a Sale>,
    I::IntoIter: DoubleEndedIterator,
{
    sales.into_iter().rev().take(limit).collect()
}
