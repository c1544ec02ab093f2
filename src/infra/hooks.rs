use async_trait::async_trait;
use tracing::warn;

use crate::app::ports::{DeadLetterSink, DuplicateChecker, RejectReason};
use crate::types::StreamRecord;

/// Treats every event as new. Stands in until a durable de-duplication store
/// keyed on envelope id exists.
pub struct NoopDuplicateChecker;

#[async_trait]
impl DuplicateChecker for NoopDuplicateChecker {
    async fn is_duplicate(&self, _envelope_id: &str) -> bool {
        false
    }
}

/// Logs rejected records and drops them.
pub struct LoggingDeadLetterSink;

#[async_trait]
impl DeadLetterSink for LoggingDeadLetterSink {
    async fn reject(&self, record: &StreamRecord, reason: &RejectReason) {
        warn!(
            event_id = %record.log_id(),
            partition_key = record.kinesis.partition_key.as_deref().unwrap_or("-"),
            reason = reason.kind(),
            "Dropping record: {}",
            reason.detail()
        );
    }
}
