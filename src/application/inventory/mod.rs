mod book_service;
mod errors;
mod listeners;
mod sale_service;
mod store;

#[allow(unused_imports)]
pub use book_service::{add_book, available_books, search_books, update_book};
#[allow(unused_imports)]
pub use errors::{InventoryError, Result};
#[allow(unused_imports)]
pub use listeners::{Listener, ListenerRegistry, SubscriptionId};
#[allow(unused_imports)]
pub use sale_service::{complete_sale, delete_sale, edit_sale, record_sale, recent_sales};
#[allow(unused_imports)]
pub use store::{DEFAULT_STORAGE_KEY, InventoryStore, StoreDependencies};
