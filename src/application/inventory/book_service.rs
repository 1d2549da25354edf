use crate::domain::{
    Book, BookId,
    commands::{AddBook, UpdateBook},
};

use super::errors::{InventoryError, Result};
use super::store::InventoryStore;

/// 書籍を登録する
///
/// ビジネスルール：
/// - 書籍名が空でないこと
/// - 数量・単価が正の値であること
///
/// 同名の書籍が既にあれば、新しいIDのレコードで置き換えられる（名前による upsert）。
pub async fn add_book(store: &mut InventoryStore, cmd: AddBook) -> Result<Book> {
    let input = cmd.validate()?;
    let book = Book::new(input.name, input.quantity, input.price_per_unit);

    store.upsert_book_by_name(book.clone()).await?;
    Ok(book)
}

/// 既存の書籍を編集する
///
/// IDは維持し、合計原価を再計算してから名前で upsert する。
/// 数値は検証しない（数値でない入力は0として保存される）。
///
/// # 注意
/// 名前を変更すると既存レコードとは一致しないため、同じIDの書籍が末尾に追加される。
pub async fn update_book(store: &mut InventoryStore, id: &BookId, cmd: UpdateBook) -> Result<Book> {
    let existing = store
        .find_book(id)
        .ok_or_else(|| InventoryError::BookNotFound(id.clone()))?;

    let input = cmd.to_input();
    let book = Book {
        id: existing.id.clone(),
        name: input.name,
        price_per_unit: input.price_per_unit,
        quantity: input.quantity,
        total_cost: existing.total_cost,
    }
    .with_total_cost_recomputed();

    store.upsert_book_by_name(book.clone()).await?;
    Ok(book)
}

/// 書籍名の部分一致検索（大文字小文字を区別しない）
///
/// クエリが空なら全件を返す。
pub fn search_books<'a>(books: &'a [Book], query: &str) -> Vec<&'a Book> {
    let query = query.trim().to_lowercase();
    books
        .iter()
        .filter(|b| query.is_empty() || b.name.to_lowercase().contains(&query))
        .collect()
}

/// 在庫のある書籍（販売フォームの選択肢）
pub fn available_books(books: &[Book]) -> Vec<&Book> {
    books.iter().filter(|b| b.is_in_stock()).collect()
}
