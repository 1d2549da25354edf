use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, complete_sale, create_book, create_sale, decrement_stock, delete_book, delete_sale,
    edit_sale, get_report, list_available_books, list_books, list_recent_sales, list_sales,
    replace_sales, update_book,
};

/// Creates the API router with all inventory and sales endpoints
///
/// Books:
/// - GET /books - List books (optional `q` name search)
/// - GET /books/available - Books with stock on hand
/// - POST /books - Add a book (replaces a book with the same name)
/// - PUT /books/:id - Edit a book
/// - DELETE /books/:id - Delete a book
/// - POST /books/:id/decrement - Decrement stock (clamped at zero)
///
/// Sales:
/// - GET /sales - List sales (optional `status=pending|completed`)
/// - GET /sales/recent - Most recent sales, newest first
/// - POST /sales - Record a pending sale
/// - PUT /sales - Replace the whole sales collection
/// - PUT /sales/:id - Edit a pending sale
/// - POST /sales/:id/complete - Complete a sale
/// - DELETE /sales/:id - Delete a sale
///
/// Reports:
/// - GET /report - Profit and revenue totals
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/books", get(list_books).post(create_book))
        .route("/books/available", get(list_available_books))
        .route("/books/:id", put(update_book).delete(delete_book))
        .route("/books/:id/decrement", post(decrement_stock))
        .route("/sales", get(list_sales).post(create_sale).put(replace_sales))
        .route("/sales/recent", get(list_recent_sales))
        .route("/sales/:id", put(edit_sale).delete(delete_sale))
        .route("/sales/:id/complete", post(complete_sale))
        .route("/report", get(get_report))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
