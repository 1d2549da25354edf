use crate::application::inventory::{
    self, InventoryError, InventoryStore, available_books, search_books,
};
use crate::domain::{
    Book, BookId, Sale, SaleId,
    commands::{AddBook, DecrementStock, EditSale, RecordSale, UpdateBook},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{
    error::{ApiError, QueryError},
    types::{
        DEFAULT_RECENT_LIMIT, ListBooksQuery, ListSalesQuery,
        RecentSalesQuery, ReportResponse, SaleStatusFilter, parse_status_filter,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
///
/// ストアへの変更はロックで直列化される。
pub struct AppState {
    pub store: Mutex<InventoryStore>,
}

impl AppState {
    pub fn new(store: InventoryStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }
}

// ============================================================================
// Book handlers
// ============================================================================

/// GET /books - 書籍一覧（`q` で名前の部分一致検索）
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListBooksQuery>,
) -> Json<Vec<Book>> {
    let store = state.store.lock().await;
    let books = search_books(store.books(), query.q.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();
    Json(books)
}

/// GET /books/available - 在庫のある書籍
pub async fn list_available_books(State(state): State<Arc<AppState>>) -> Json<Vec<Book>> {
    let store = state.store.lock().await;
    Json(available_books(store.books()).into_iter().cloned().collect())
}

/// POST /books - 書籍を登録（同名があれば置き換え）
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Json(cmd): Json<AddBook>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let mut store = state.store.lock().await;
    let book = inventory::add_book(&mut store, cmd).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /books/:id - 書籍を編集
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(cmd): Json<UpdateBook>,
) -> Result<Json<Book>, ApiError> {
    let mut store = state.store.lock().await;
    let book = inventory::update_book(&mut store, &BookId::from_string(id), cmd).await?;
    Ok(Json(book))
}

/// DELETE /books/:id - 書籍を削除（販売には影響しない）
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.lock().await;
    store.delete_book(&BookId::from_string(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /books/:id/decrement - 在庫を減らす（0で打ち止め）
///
/// 強制されるビジネスルール:
/// - 減算数が正の値であること
pub async fn decrement_stock(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(cmd): Json<DecrementStock>,
) -> Result<Json<Book>, ApiError> {
    let amount = cmd.validate().map_err(InventoryError::from)?;
    let id = BookId::from_string(id);
    let mut store = state.store.lock().await;
    store.decrement_book_stock(&id, amount).await?;

    let book = store
        .find_book(&id)
        .cloned()
        .ok_or(InventoryError::BookNotFound(id))?;
    Ok(Json(book))
}

// ============================================================================
// Sale handlers
// ============================================================================

/// GET /sales - 販売一覧（`status` で pending / completed に絞り込み）
pub async fn list_sales(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListSalesQuery>,
) -> Result<Json<Vec<Sale>>, QueryError> {
    let filter = query
        .status
        .as_deref()
        .map(parse_status_filter)
        .transpose()
        .map_err(QueryError::BadRequest)?;

    let store = state.store.lock().await;
    let sales = match filter {
        None => store.sales().to_vec(),
        Some(SaleStatusFilter::Pending) => store.pending_sales().cloned().collect(),
        Some(SaleStatusFilter::Completed) => store.completed_sales().cloned().collect(),
    };
    Ok(Json(sales))
}

/// GET /sales/recent - 直近の販売（新しい順）
pub async fn list_recent_sales(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentSalesQuery>,
) -> Json<Vec<Sale>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let store = state.store.lock().await;
    Json(
        inventory::recent_sales(store.sales(), limit)
            .into_iter()
            .cloned()
            .collect(),
    )
}

/// POST /sales - 販売を登録（未完了）
///
/// 強制されるビジネスルール:
/// - 顧客名と書籍が指定されていること
/// - 数量が正の値で、現在の在庫以下であること
pub async fn create_sale(
    State(state): State<Arc<AppState>>,
    Json(cmd): Json<RecordSale>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    let mut store = state.store.lock().await;
    let sale = inventory::record_sale(&mut store, cmd, chrono::Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// PUT /sales - 販売コレクションを丸ごと置き換え
///
/// 置き換え後のコレクションは検証しない。
pub async fn replace_sales(
    State(state): State<Arc<AppState>>,
    Json(sales): Json<Vec<Sale>>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    let mut store = state.store.lock().await;
    store.replace_sales(sales).await?;
    Ok(Json(store.sales().to_vec()))
}

/// PUT /sales/:id - 未完了の販売を編集
pub async fn edit_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(cmd): Json<EditSale>,
) -> Result<Json<Sale>, ApiError> {
    let mut store = state.store.lock().await;
    let sale = inventory::edit_sale(&mut store, &SaleId::from_string(id), cmd).await?;
    Ok(Json(sale))
}

/// POST /sales/:id/complete - 販売を完了（在庫を引き当て）
///
/// 強制されるビジネスルール:
/// - 販売が未完了であること
/// - 現在の在庫で数量を賄えること
pub async fn complete_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Sale>, ApiError> {
    let id = SaleId::from_string(id);
    let mut store = state.store.lock().await;
    inventory::complete_sale(&mut store, &id).await?;

    let sale = store
        .find_sale(&id)
        .cloned()
        .ok_or(InventoryError::SaleNotFound(id))?;
    Ok(Json(sale))
}

/// DELETE /sales/:id - 販売を削除
pub async fn delete_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.lock().await;
    inventory::delete_sale(&mut store, &SaleId::from_string(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Report handler
// ============================================================================

/// GET /report - 利益・売上レポート
pub async fn get_report(State(state): State<Arc<AppState>>) -> Json<ReportResponse> {
    let store = state.store.lock().await;
    Json(ReportResponse::from(store.generate_report()))
}
