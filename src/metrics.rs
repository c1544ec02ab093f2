//! Router counters.
//!
//! Recorded through the `metrics` facade; they are no-ops unless the host
//! process installs a recorder.

use ::metrics::counter;

pub mod batch {
    use super::*;

    pub fn received(records: usize) {
        counter!("stream_router_batches_total").increment(1);
        counter!("stream_router_records_received_total").increment(records as u64);
    }

    pub fn rejected(status_label: &'static str) {
        counter!("stream_router_batches_rejected_total", "status" => status_label).increment(1);
    }
}

pub mod sink {
    use super::*;

    pub fn probe(status_label: &'static str) {
        counter!("stream_router_probes_total", "status" => status_label).increment(1);
    }

    pub fn published() {
        counter!("stream_router_records_published_total").increment(1);
    }

    pub fn publish_failed() {
        counter!("stream_router_publish_failures_total").increment(1);
    }
}

pub mod records {
    use super::*;

    pub fn skipped(reason: &'static str) {
        counter!("stream_router_records_skipped_total", "reason" => reason).increment(1);
    }

    pub fn ignored() {
        counter!("stream_router_records_ignored_total").increment(1);
    }

    pub fn duplicate() {
        counter!("stream_router_records_duplicate_total").increment(1);
    }
}
