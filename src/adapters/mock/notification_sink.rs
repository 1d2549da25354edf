use crate::ports::notification_sink::{NotificationSink as NotificationSinkTrait, RecordKind, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Logging implementation of NotificationSink
///
/// Stands in for the spreadsheet mirror. Does not deliver anything;
/// logs the record and succeeds.
#[allow(dead_code)]
pub struct LoggingNotificationSink;

#[allow(dead_code)]
impl LoggingNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSinkTrait for LoggingNotificationSink {
    async fn send(&self, kind: RecordKind, record: Value) -> Result<()> {
        tracing::info!(kind = %kind, %record, "Mirroring record to spreadsheet");
        Ok(())
    }
}
