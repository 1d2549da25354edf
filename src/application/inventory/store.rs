use crate::domain::{
    Book, BookId, Report, Sale, SaleId, Snapshot, StockAvailability, check_stock_availability,
    generate_report, snapshot::SnapshotRef,
};
use crate::ports::{NotificationSink, RecordKind, SnapshotStore};
use serde::Serialize;
use std::sync::Arc;

use super::errors::{InventoryError, Result};
use super::listeners::{ListenerRegistry, SubscriptionId};

/// スナップショットを保存する既定のキー
pub const DEFAULT_STORAGE_KEY: &str = "bookSalesData";

/// ストアの依存関係
#[derive(Clone)]
pub struct StoreDependencies {
    pub snapshot_store: Arc<dyn SnapshotStore>,
    pub notification_sink: Arc<dyn NotificationSink>,
}

/// 在庫・販売ストア
///
/// 書籍と販売のコレクションを保持する唯一の権威。
/// すべての変更操作は次の順で進む：
///
/// 1. メモリ上のコレクションを更新
/// 2. スナップショット全体を永続化（完了を待つ）
/// 3. 対象レコードを通知シンクへ送信（ベストエフォート、失敗は握りつぶす）
/// 4. リスナーへ通知
///
/// 永続化に失敗した場合はエラーを返すが、メモリ上の状態はロールバックしない。
/// 次に永続化が成功するまで、メモリと永続ストアは食い違ったままになる。
///
/// 変更には `&mut self` が必要なため、リスナーが操作の途中でストアを再入することはない。
pub struct InventoryStore {
    books: Vec<Book>,
    sales: Vec<Sale>,
    snapshot_store: Arc<dyn SnapshotStore>,
    notification_sink: Arc<dyn NotificationSink>,
    storage_key: String,
    listeners: ListenerRegistry,
}

impl InventoryStore {
    /// 空のストアを作成する。永続化済みのデータは [`InventoryStore::load`] で読み込む
    pub fn new(deps: StoreDependencies, storage_key: impl Into<String>) -> Self {
        Self {
            books: Vec::new(),
            sales: Vec::new(),
            snapshot_store: deps.snapshot_store,
            notification_sink: deps.notification_sink,
            storage_key: storage_key.into(),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// 永続ストアからスナップショットを読み込む
    ///
    /// キーが存在しなければ両コレクションを空にする。
    /// 読み込みに失敗した場合、メモリ上の状態は変更しない。
    pub async fn load(&mut self) -> Result<()> {
        let data = self
            .snapshot_store
            .read(&self.storage_key)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %self.storage_key, "Failed to read snapshot");
                InventoryError::SnapshotStore(e)
            })?;

        let snapshot = match data {
            Some(bytes) => Snapshot::decode(&bytes)?,
            None => Snapshot::default(),
        };

        self.books = snapshot.books;
        self.sales = snapshot.sales;
        tracing::debug!(
            books = self.books.len(),
            sales = self.sales.len(),
            "Inventory loaded"
        );

        self.listeners.notify();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // 購読
    // ------------------------------------------------------------------------

    /// 変更後に呼ばれるリスナーを登録する
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ------------------------------------------------------------------------
    // 参照
    // ------------------------------------------------------------------------

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn pending_sales(&self) -> impl Iterator<Item = &Sale> {
        self.sales.iter().filter(|s| s.is_pending())
    }

    pub fn completed_sales(&self) -> impl Iterator<Item = &Sale> {
        self.sales.iter().filter(|s| s.completed)
    }

    pub fn find_book(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| &b.id == id)
    }

    pub fn find_sale(&self, id: &SaleId) -> Option<&Sale> {
        self.sales.iter().find(|s| &s.id == id)
    }

    pub fn generate_report(&self) -> Report {
        generate_report(&self.books, &self.sales)
    }

    // ------------------------------------------------------------------------
    // 書籍の変更
    // ------------------------------------------------------------------------

    /// 書籍を名前で upsert する
    ///
    /// 同名の書籍があれば、その位置のレコードを丸ごと置き換える（IDも渡された側になる）。
    /// なければ末尾に追加する。同名の書籍が2件になることはない。
    pub async fn upsert_book_by_name(&mut self, book: Book) -> Result<()> {
        let record = book.clone();
        match self.books.iter().position(|b| b.name == book.name) {
            Some(index) => {
                tracing::debug!(name = %book.name, id = %book.id, "Replacing book by name");
                self.books[index] = book;
            }
            None => {
                tracing::debug!(name = %book.name, id = %book.id, "Adding book");
                self.books.push(book);
            }
        }

        self.persist().await?;
        self.mirror(RecordKind::Books, &record).await;
        self.listeners.notify();
        Ok(())
    }

    /// IDで書籍を削除する（存在しなければ何もしない）
    ///
    /// その書籍を参照する販売には触れない。
    pub async fn delete_book(&mut self, id: &BookId) -> Result<()> {
        self.books.retain(|b| &b.id != id);
        tracing::debug!(%id, "Book deleted");

        self.persist().await?;
        self.listeners.notify();
        Ok(())
    }

    /// 書籍の在庫を減らす
    ///
    /// `quantity = max(0, quantity - amount)`。要求数が在庫を超えてもエラーにしない。
    /// 通知シンクへは送信しない。
    ///
    /// # エラー
    /// - BookNotFound: 書籍が存在しない
    pub async fn decrement_book_stock(&mut self, id: &BookId, amount: i64) -> Result<()> {
        let book = self
            .books
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| InventoryError::BookNotFound(id.clone()))?;

        let before = book.quantity;
        book.decrement_stock(amount);
        tracing::debug!(%id, before, after = book.quantity, amount, "Book stock decremented");

        self.persist().await?;
        self.listeners.notify();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // 販売の変更
    // ------------------------------------------------------------------------

    /// 販売を追加する
    ///
    /// 重複排除も在庫確認も行わない（呼び出し側の責務）。
    pub async fn add_sale(&mut self, sale: Sale) -> Result<()> {
        let record = sale.clone();
        tracing::debug!(id = %sale.id, book_id = %sale.book_id, quantity = sale.quantity, "Adding sale");
        self.sales.push(sale);

        self.persist().await?;
        self.mirror(RecordKind::Sales, &record).await;
        self.listeners.notify();
        Ok(())
    }

    /// 販売コレクションを丸ごと置き換える
    ///
    /// 置き換え後のコレクションは検証しない。
    /// 完了済みの販売を未完了に戻すなどの不整合は呼び出し側が避けること。
    pub async fn replace_sales(&mut self, sales: Vec<Sale>) -> Result<()> {
        tracing::debug!(before = self.sales.len(), after = sales.len(), "Replacing sales");
        self.sales = sales;

        self.persist().await?;
        self.listeners.notify();
        Ok(())
    }

    /// 未完了の販売を完了する（在庫の引当と状態変更を1操作で行う）
    ///
    /// ビジネスルール：
    /// - 販売が存在し、未完了であること
    /// - 参照先の書籍の現在の在庫で数量を賄えること
    ///
    /// 在庫の引当と完了フラグの更新は同じスナップショットで永続化される。
    /// 呼び出し側で `decrement_book_stock` と `replace_sales` を順に呼ぶ場合と違い、
    /// 在庫だけ減って販売が未完了のまま残る状態は発生しない。
    pub async fn complete_sale(&mut self, id: &SaleId) -> Result<()> {
        let index = self
            .sales
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| InventoryError::SaleNotFound(id.clone()))?;

        let sale = &self.sales[index];
        if sale.completed {
            return Err(InventoryError::SaleAlreadyCompleted(id.clone()));
        }

        match check_stock_availability(&self.books, sale) {
            StockAvailability::Available => {}
            StockAvailability::BookMissing => {
                return Err(InventoryError::BookNotFound(sale.book_id.clone()));
            }
            StockAvailability::Insufficient {
                requested,
                on_hand,
            } => {
                return Err(InventoryError::InsufficientStock {
                    book_id: sale.book_id.clone(),
                    requested,
                    on_hand,
                });
            }
        }

        let (book_id, quantity) = (sale.book_id.clone(), sale.quantity);
        if let Some(book) = self.books.iter_mut().find(|b| b.id == book_id) {
            book.decrement_stock(quantity);
        }
        self.sales[index].completed = true;
        tracing::debug!(%id, %book_id, quantity, "Sale completed");

        self.persist().await?;
        self.listeners.notify();
        Ok(())
    }

    /// 現在の状態をそのまま再保存する
    pub async fn save(&self) -> Result<()> {
        self.persist().await
    }

    // ------------------------------------------------------------------------
    // 内部ヘルパー
    // ------------------------------------------------------------------------

    async fn persist(&self) -> Result<()> {
        let data = SnapshotRef {
            sales: &self.sales,
            books: &self.books,
        }
        .encode()?;

        self.snapshot_store
            .write(&self.storage_key, &data)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %self.storage_key, "Failed to persist snapshot");
                InventoryError::SnapshotStore(e)
            })
    }

    /// 通知シンクへ1件送信する。失敗はログに残して破棄する
    async fn mirror<T: Serialize>(&self, kind: RecordKind, record: &T) {
        let value = match serde_json::to_value(record) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, %kind, "Failed to encode record for notification sink");
                return;
            }
        };

        if let Err(e) = self.notification_sink.send(kind, value).await {
            tracing::warn!(error = %e, %kind, "Notification sink failed; ignoring");
        }
    }
}

impl std::fmt::Debug for InventoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryStore")
            .field("books", &self.books.len())
            .field("sales", &self.sales.len())
            .field("storage_key", &self.storage_key)
            .field("listeners", &self.listeners)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::InMemorySnapshotStore;
    use crate::ports::notification_sink;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::Value;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 送信内容を記録する通知シンク
    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(RecordKind, Value)>>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn send(&self, kind: RecordKind, record: Value) -> notification_sink::Result<()> {
            self.sent.lock().unwrap().push((kind, record));
            if self.fail {
                return Err("spreadsheet unreachable".into());
            }
            Ok(())
        }
    }

    fn setup(fail_sink: bool) -> (InventoryStore, Arc<InMemorySnapshotStore>, Arc<RecordingSink>) {
        let snapshot_store = Arc::new(InMemorySnapshotStore::new());
        let sink = Arc::new(RecordingSink {
            fail: fail_sink,
            ..Default::default()
        });
        let store = InventoryStore::new(
            StoreDependencies {
                snapshot_store: snapshot_store.clone(),
                notification_sink: sink.clone(),
            },
            DEFAULT_STORAGE_KEY,
        );
        (store, snapshot_store, sink)
    }

    fn count_notifications(store: &mut InventoryStore) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        store.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    fn persisted(snapshot_store: &InMemorySnapshotStore) -> Snapshot {
        Snapshot::decode(&snapshot_store.get(DEFAULT_STORAGE_KEY).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_load_missing_key_yields_empty_and_notifies() {
        let (mut store, _, _) = setup(false);
        let count = count_notifications(&mut store);

        store.load().await.unwrap();

        assert!(store.books().is_empty());
        assert!(store.sales().is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_read_failure_keeps_state_and_skips_listeners() {
        let (mut store, snapshot_store, _) = setup(false);
        let count = count_notifications(&mut store);
        snapshot_store.set_fail_reads(true);

        let result = store.load().await;

        assert!(matches!(result, Err(InventoryError::SnapshotStore(_))));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_load_corrupt_blob_is_codec_error() {
        let (mut store, snapshot_store, _) = setup(false);
        snapshot_store.insert(DEFAULT_STORAGE_KEY, "{ not json");

        let result = store.load().await;
        assert!(matches!(result, Err(InventoryError::Snapshot(_))));
    }

    #[tokio::test]
    async fn test_upsert_appends_persists_and_mirrors() {
        let (mut store, snapshot_store, sink) = setup(false);
        let count = count_notifications(&mut store);
        let book = Book::new("A", 10, 5.0);

        store.upsert_book_by_name(book.clone()).await.unwrap();

        assert_eq!(store.books(), &[book.clone()]);
        assert_eq!(persisted(&snapshot_store).books, vec![book.clone()]);
        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, RecordKind::Books);
        assert_eq!(sent[0].1["name"], "A");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upsert_same_name_replaces_record_including_id() {
        let (mut store, _, _) = setup(false);
        let original = Book::new("A", 10, 5.0);
        let replacement = Book::new("A", 3, 7.0);

        store.upsert_book_by_name(original).await.unwrap();
        store.upsert_book_by_name(Book::new("B", 1, 1.0)).await.unwrap();
        store.upsert_book_by_name(replacement.clone()).await.unwrap();

        assert_eq!(store.books().len(), 2);
        assert_eq!(store.books()[0], replacement);
        assert_eq!(store.books()[1].name, "B");
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_on_name() {
        let (mut store, _, _) = setup(false);
        let book = Book::new("A", 10, 5.0);

        store.upsert_book_by_name(book.clone()).await.unwrap();
        store.upsert_book_by_name(book.clone()).await.unwrap();

        assert_eq!(store.books(), &[book]);
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_fail_operation() {
        let (mut store, snapshot_store, sink) = setup(true);
        let count = count_notifications(&mut store);

        store.upsert_book_by_name(Book::new("A", 1, 1.0)).await.unwrap();
        let book = store.books()[0].clone();
        store
            .add_sale(Sale::new(&book, "C", 1, 2.0, Utc::now()))
            .await
            .unwrap();

        assert_eq!(sink.sent.lock().unwrap().len(), 2);
        assert_eq!(persisted(&snapshot_store).sales.len(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_persist_failure_surfaces_without_rollback() {
        let (mut store, snapshot_store, sink) = setup(false);
        let count = count_notifications(&mut store);
        snapshot_store.set_fail_writes(true);

        let result = store.upsert_book_by_name(Book::new("A", 1, 1.0)).await;

        assert!(matches!(result, Err(InventoryError::SnapshotStore(_))));
        // メモリ上は更新されたまま、永続ストアには何もない
        assert_eq!(store.books().len(), 1);
        assert!(snapshot_store.get(DEFAULT_STORAGE_KEY).is_none());
        assert!(sink.sent.lock().unwrap().is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 0);

        snapshot_store.set_fail_writes(false);
        store.save().await.unwrap();
        assert_eq!(persisted(&snapshot_store).books.len(), 1);
    }

    #[tokio::test]
    async fn test_decrement_stock_clamps_at_zero() {
        let (mut store, snapshot_store, sink) = setup(false);
        let book = Book::new("A", 10, 5.0);
        let id = book.id.clone();
        store.upsert_book_by_name(book).await.unwrap();

        store.decrement_book_stock(&id, 3).await.unwrap();
        assert_eq!(store.find_book(&id).unwrap().quantity, 7);

        store.decrement_book_stock(&id, 100).await.unwrap();
        assert_eq!(store.find_book(&id).unwrap().quantity, 0);
        assert_eq!(persisted(&snapshot_store).books[0].quantity, 0);

        // 在庫の減算は通知シンクへ送らない
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_decrement_unknown_book() {
        let (mut store, _, _) = setup(false);
        let count = count_notifications(&mut store);

        let result = store.decrement_book_stock(&BookId::new(), 1).await;

        assert!(matches!(result, Err(InventoryError::BookNotFound(_))));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_book_leaves_sales_orphaned() {
        let (mut store, _, _) = setup(false);
        let book = Book::new("A", 5, 5.0);
        let sale = Sale::new(&book, "C", 2, 8.0, Utc::now());
        store.upsert_book_by_name(book.clone()).await.unwrap();
        store.add_sale(sale.clone()).await.unwrap();

        store.delete_book(&book.id).await.unwrap();
        store.delete_book(&book.id).await.unwrap();

        assert!(store.books().is_empty());
        assert_eq!(store.sales(), &[sale.clone()]);
        assert_eq!(
            check_stock_availability(store.books(), &sale),
            StockAvailability::BookMissing
        );
    }

    #[tokio::test]
    async fn test_replace_sales_does_not_mirror() {
        let (mut store, _, sink) = setup(false);
        let book = Book::new("A", 5, 5.0);
        let sale = Sale::new(&book, "C", 2, 8.0, Utc::now());

        store.replace_sales(vec![sale.clone()]).await.unwrap();

        assert_eq!(store.sales(), &[sale]);
        assert!(sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_complete_sale_decrements_and_flags_in_one_write() {
        let (mut store, snapshot_store, _) = setup(false);
        let count = count_notifications(&mut store);
        let book = Book::new("A", 5, 5.0);
        let sale = Sale::new(&book, "C", 2, 8.0, Utc::now());
        store.upsert_book_by_name(book.clone()).await.unwrap();
        store.add_sale(sale.clone()).await.unwrap();

        store.complete_sale(&sale.id).await.unwrap();

        let snapshot = persisted(&snapshot_store);
        assert_eq!(snapshot.books[0].quantity, 3);
        assert!(snapshot.sales[0].completed);
        assert_eq!(store.pending_sales().count(), 0);
        assert_eq!(store.completed_sales().count(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_complete_sale_rejects_insufficient_stock() {
        let (mut store, _, _) = setup(false);
        let book = Book::new("A", 5, 5.0);
        let first = Sale::new(&book, "C1", 4, 8.0, Utc::now());
        let second = Sale::new(&book, "C2", 4, 8.0, Utc::now());
        store.upsert_book_by_name(book.clone()).await.unwrap();
        store.add_sale(first.clone()).await.unwrap();
        store.add_sale(second.clone()).await.unwrap();

        store.complete_sale(&first.id).await.unwrap();
        let result = store.complete_sale(&second.id).await;

        assert!(matches!(
            result,
            Err(InventoryError::InsufficientStock {
                requested: 4,
                on_hand: 1,
                ..
            })
        ));
        assert_eq!(store.find_book(&book.id).unwrap().quantity, 1);
        assert!(store.find_sale(&second.id).unwrap().is_pending());
    }

    #[tokio::test]
    async fn test_complete_sale_twice_is_rejected() {
        let (mut store, _, _) = setup(false);
        let book = Book::new("A", 5, 5.0);
        let sale = Sale::new(&book, "C", 1, 8.0, Utc::now());
        store.upsert_book_by_name(book.clone()).await.unwrap();
        store.add_sale(sale.clone()).await.unwrap();

        store.complete_sale(&sale.id).await.unwrap();
        let result = store.complete_sale(&sale.id).await;

        assert!(matches!(result, Err(InventoryError::SaleAlreadyCompleted(_))));
        assert_eq!(store.find_book(&book.id).unwrap().quantity, 4);
    }

    #[tokio::test]
    async fn test_complete_orphaned_sale_fails() {
        let (mut store, _, _) = setup(false);
        let book = Book::new("A", 5, 5.0);
        let sale = Sale::new(&book, "C", 1, 8.0, Utc::now());
        store.add_sale(sale.clone()).await.unwrap();

        let result = store.complete_sale(&sale.id).await;
        assert!(matches!(result, Err(InventoryError::BookNotFound(_))));
    }

    #[tokio::test]
    async fn test_unsubscribed_listener_is_not_called() {
        let (mut store, _, _) = setup(false);
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let id = store.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        store.upsert_book_by_name(Book::new("A", 1, 1.0)).await.unwrap();
        assert!(store.unsubscribe(id));
        store.upsert_book_by_name(Book::new("B", 1, 1.0)).await.unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
