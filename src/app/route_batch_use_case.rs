use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::app::ports::{DeadLetterSink, DuplicateChecker, RejectReason, SinkPort, SinkStatus};
use crate::classifier::{classify, Classification};
use crate::codec::{decode_data, parse_payload, DecodeMode};
use crate::constants::DEFAULT_TARGET_EVENT;
use crate::error::{Result, RouterError};
use crate::infra::hooks::{LoggingDeadLetterSink, NoopDuplicateChecker};
use crate::transformer::transform_booking;
use crate::types::{StreamBatch, StreamRecord};

/// Tallies for one routed batch. `published` is the output contract: envelope
/// ids of records the sink accepted, in batch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteReport {
    pub published: Vec<String>,
    pub failed: usize,
    pub skipped: usize,
    pub ignored: usize,
    pub duplicates: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The batch had no records
    NothingToDo,
    Routed(RouteReport),
}

impl BatchOutcome {
    /// Invocation response: `None` for an empty batch, else the published ids.
    pub fn into_response(self) -> Option<Vec<String>> {
        match self {
            BatchOutcome::NothingToDo => None,
            BatchOutcome::Routed(report) => Some(report.published),
        }
    }

    pub fn published_count(&self) -> usize {
        match self {
            BatchOutcome::NothingToDo => 0,
            BatchOutcome::Routed(report) => report.published.len(),
        }
    }
}

#[derive(Debug)]
enum RecordOutcome {
    Published(String),
    Failed,
    Skipped,
    Ignored,
    Duplicate,
}

/// Fail-fast policy: any probe result other than `Up` aborts the invocation
/// with the matching fatal error.
pub fn ensure_sink_usable(status: &SinkStatus) -> Result<()> {
    match status {
        SinkStatus::Up => Ok(()),
        SinkStatus::UnknownUrl => Err(RouterError::SinkUrlNotConfigured),
        SinkStatus::Down { status } => Err(RouterError::SinkUnavailable { status: *status }),
        SinkStatus::BadConfig { reason } => Err(RouterError::SinkUnreachable {
            reason: reason.clone(),
        }),
    }
}

/// Use case for routing one stream batch to the sink
pub struct RouteBatchUseCase {
    sink: Arc<dyn SinkPort>,
    duplicates: Arc<dyn DuplicateChecker>,
    dead_letters: Arc<dyn DeadLetterSink>,
    target_event: String,
    decode_mode: DecodeMode,
}

impl RouteBatchUseCase {
    pub fn new(sink: Arc<dyn SinkPort>) -> Self {
        Self {
            sink,
            duplicates: Arc::new(NoopDuplicateChecker),
            dead_letters: Arc::new(LoggingDeadLetterSink),
            target_event: DEFAULT_TARGET_EVENT.to_string(),
            decode_mode: DecodeMode::Strict,
        }
    }

    pub fn with_target_event(mut self, target_event: impl Into<String>) -> Self {
        self.target_event = target_event.into();
        self
    }

    pub fn with_decode_mode(mut self, decode_mode: DecodeMode) -> Self {
        self.decode_mode = decode_mode;
        self
    }

    pub fn with_duplicate_checker(mut self, duplicates: Arc<dyn DuplicateChecker>) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn with_dead_letter_sink(mut self, dead_letters: Arc<dyn DeadLetterSink>) -> Self {
        self.dead_letters = dead_letters;
        self
    }

    pub fn target_event(&self) -> &str {
        &self.target_event
    }

    /// Probe once, then route every record in order.
    pub async fn handle(&self, batch: &StreamBatch) -> Result<BatchOutcome> {
        let status = self.sink.probe().await;
        crate::metrics::sink::probe(status.label());
        if let Err(e) = ensure_sink_usable(&status) {
            warn!(status = %status, "Sink unusable, rejecting batch of {} records", batch.len());
            crate::metrics::batch::rejected(status.label());
            return Err(e);
        }

        if batch.is_empty() {
            info!("Empty batch, nothing to do");
            return Ok(BatchOutcome::NothingToDo);
        }

        crate::metrics::batch::received(batch.len());
        let mut report = RouteReport::default();

        for (index, record) in batch.records.iter().enumerate() {
            let span = info_span!("record", index, event_id = %record.log_id());
            match self.route_record(record).instrument(span).await {
                RecordOutcome::Published(id) => report.published.push(id),
                RecordOutcome::Failed => report.failed += 1,
                RecordOutcome::Skipped => report.skipped += 1,
                RecordOutcome::Ignored => report.ignored += 1,
                RecordOutcome::Duplicate => report.duplicates += 1,
            }
        }

        info!(
            published = report.published.len(),
            failed = report.failed,
            skipped = report.skipped,
            ignored = report.ignored,
            duplicates = report.duplicates,
            "Batch routed"
        );
        Ok(BatchOutcome::Routed(report))
    }

    async fn route_record(&self, record: &StreamRecord) -> RecordOutcome {
        let payload = match decode_data(&record.kinesis.data, self.decode_mode) {
            Ok(payload) => payload,
            Err(e) => {
                return self.skip(record, RejectReason::Decode(e.to_string())).await;
            }
        };

        let mut envelope = match parse_payload(&payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                return self.skip(record, RejectReason::Parse(e.to_string())).await;
            }
        };
        // producers that omit the id still get a stable one from the stream
        if envelope.id.is_none() {
            envelope.id = record.stream_id().map(str::to_string);
        }

        let event = match classify(&envelope, &self.target_event) {
            Classification::Target(event) => event,
            Classification::Ignored { event_type } => {
                debug!(event_type = %event_type, "Ignoring event");
                crate::metrics::records::ignored();
                return RecordOutcome::Ignored;
            }
            Classification::MissingPayload { detail } => {
                return self.skip(record, RejectReason::MissingPayload(detail)).await;
            }
        };

        if self.duplicates.is_duplicate(&event.envelope_id).await {
            info!(envelope_id = %event.envelope_id, "Duplicate event, not publishing");
            crate::metrics::records::duplicate();
            return RecordOutcome::Duplicate;
        }

        let transformed = transform_booking(&event);
        debug!(envelope_id = %event.envelope_id, order_id = %event.booking.order_id, "Publishing booking");

        if self.sink.publish(&transformed).await {
            crate::metrics::sink::published();
            RecordOutcome::Published(event.envelope_id)
        } else {
            crate::metrics::sink::publish_failed();
            let reason = RejectReason::PublishFailed(format!(
                "sink rejected order {}",
                event.booking.order_id
            ));
            self.dead_letters.reject(record, &reason).await;
            RecordOutcome::Failed
        }
    }

    async fn skip(&self, record: &StreamRecord, reason: RejectReason) -> RecordOutcome {
        crate::metrics::records::skipped(reason.kind());
        self.dead_letters.reject(record, &reason).await;
        RecordOutcome::Skipped
    }
}
