use crate::envelope::{BookingObject, EventEnvelope};

/// A target-type envelope narrowed to its booking payload.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingEvent {
    pub envelope_id: String,
    pub partition_key: Option<String>,
    pub booking: BookingObject,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Target type with a well-formed payload
    Target(BookingEvent),
    /// Any other type, known or not
    Ignored { event_type: String },
    /// Target type whose payload field is absent or the wrong shape
    MissingPayload { detail: String },
}

pub fn is_target_event(envelope: &EventEnvelope, target_event: &str) -> bool {
    envelope.event_type == target_event
}

/// Decides whether the router acts on this envelope and, if so, narrows it.
///
/// Duplicate detection is not done here; the handler consults its
/// `DuplicateChecker` after a `Target` result.
pub fn classify(envelope: &EventEnvelope, target_event: &str) -> Classification {
    if !is_target_event(envelope, target_event) {
        return Classification::Ignored {
            event_type: envelope.event_type.clone(),
        };
    }

    let id = envelope.id_or("-");
    let Some(raw) = envelope.payload_for(target_event) else {
        return Classification::MissingPayload {
            detail: format!("no '{}' field on event {}", target_event, id),
        };
    };

    match serde_json::from_value::<BookingObject>(raw.clone()) {
        Ok(booking) => Classification::Target(BookingEvent {
            envelope_id: id.to_string(),
            partition_key: envelope.partition_key.clone(),
            booking,
        }),
        Err(e) => Classification::MissingPayload {
            detail: format!("'{}' payload on event {} is malformed: {}", target_event, id, e),
        },
    }
}
