use async_trait::async_trait;
use std::fmt;

use crate::envelope::TransformedBookingEvent;
use crate::types::StreamRecord;

/// Result of a sink liveness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkStatus {
    /// Reachable, 2xx
    Up,
    /// Reachable, non-2xx
    Down { status: u16 },
    /// No sink URL configured
    UnknownUrl,
    /// The request could not complete (bad URL, DNS, refused, timeout)
    BadConfig { reason: String },
}

impl SinkStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SinkStatus::Up => "UP",
            SinkStatus::Down { .. } => "DOWN",
            SinkStatus::UnknownUrl => "UNKNOWN_URL",
            SinkStatus::BadConfig { .. } => "BAD_CONFIG",
        }
    }
}

impl fmt::Display for SinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkStatus::Down { status } => write!(f, "DOWN ({})", status),
            SinkStatus::BadConfig { reason } => write!(f, "BAD_CONFIG ({})", reason),
            other => f.write_str(other.label()),
        }
    }
}

// Sink-side ports
#[async_trait]
pub trait SinkPort: Send + Sync {
    /// Never fails; every failure mode is a status.
    async fn probe(&self) -> SinkStatus;

    /// True iff the sink accepted the event.
    async fn publish(&self, event: &TransformedBookingEvent) -> bool;
}

// Extension points for idempotency and dead-lettering
#[async_trait]
pub trait DuplicateChecker: Send + Sync {
    async fn is_duplicate(&self, envelope_id: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    Decode(String),
    Parse(String),
    MissingPayload(String),
    PublishFailed(String),
}

impl RejectReason {
    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::Decode(_) => "decode",
            RejectReason::Parse(_) => "parse",
            RejectReason::MissingPayload(_) => "missing_payload",
            RejectReason::PublishFailed(_) => "publish_failed",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            RejectReason::Decode(d)
            | RejectReason::Parse(d)
            | RejectReason::MissingPayload(d)
            | RejectReason::PublishFailed(d) => d,
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.detail())
    }
}

#[async_trait]
pub trait DeadLetterSink: Send + Sync {
    async fn reject(&self, record: &StreamRecord, reason: &RejectReason);
}
