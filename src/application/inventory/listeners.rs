use std::fmt;

/// 変更通知のリスナー（引数なしのコールバック）
pub type Listener = Box<dyn Fn() + Send + Sync>;

/// 購読ハンドル。購読解除に使う
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// リスナーレジストリ
///
/// 変更後の通知フックであり、派生ビューの情報源ではない。
/// 登録順に同期的に呼び出す。
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// 購読を解除する。未登録のハンドルなら `false`
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    pub fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
