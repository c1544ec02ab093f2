use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::constants::MAX_EPOCH_MILLIS;

/// Generic event as published onto the stream.
///
/// Any JSON object parses. Header fields of the wrong type read as absent
/// instead of failing the record: `id` keeps strings and renders numbers,
/// `partitionKey` and `type` keep strings only, `timestamp` keeps numbers only.
/// A missing `type` is the empty string, which never matches a target.
/// Type-specific payloads stay as raw JSON until the classifier narrows them;
/// the payload for an event lives under the field named after its `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventEnvelope {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        rename = "partitionKey",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub partition_key: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(rename = "type", default, deserialize_with = "lenient_type")]
    pub event_type: String,
    #[serde(flatten)]
    pub payloads: Map<String, Value>,
}

impl EventEnvelope {
    /// Raw payload field for the given event type, if present.
    pub fn payload_for(&self, event_type: &str) -> Option<&Value> {
        self.payloads.get(event_type)
    }

    /// Envelope id, or `fallback` when the producer sent none.
    pub fn id_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.id.as_deref().unwrap_or(fallback)
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_type<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

/// Booking details shared by `booking_completed` and `booking_requested`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingObject {
    #[serde(deserialize_with = "deserialize_epoch_millis", serialize_with = "serialize_epoch_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
    pub product_provider: String,
}

/// Order identifier in canonical string form.
///
/// Producers have sent both numbers and strings. Strings are kept verbatim,
/// integers (and integral floats such as `42.0`) are rendered in decimal.
/// Fractional numbers and any other JSON type are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawOrderId {
            Text(String),
            Number(serde_json::Number),
        }

        match RawOrderId::deserialize(deserializer)? {
            RawOrderId::Text(s) => Ok(OrderId(s)),
            RawOrderId::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(OrderId(i.to_string()));
                }
                if let Some(u) = n.as_u64() {
                    return Ok(OrderId(u.to_string()));
                }
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
                        Ok(OrderId((f as i64).to_string()))
                    }
                    _ => Err(serde::de::Error::custom(format!(
                        "orderId {} is not an integer",
                        n
                    ))),
                }
            }
        }
    }
}

fn deserialize_epoch_millis<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    epoch_millis_to_datetime(raw).ok_or_else(|| {
        serde::de::Error::custom(format!("timestamp {} is not a valid epoch in milliseconds", raw))
    })
}

fn serialize_epoch_millis<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i64(value.timestamp_millis())
}

/// Converts epoch milliseconds the way `new Date(ms)` does: fractions are
/// truncated, values beyond the `Date` range are rejected. chrono stops short
/// of the far ends of that range (around year ±262000), so those are rejected
/// as well.
pub fn epoch_millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    let truncated = millis.trunc();
    if truncated.abs() > MAX_EPOCH_MILLIS as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(truncated as i64)
}

/// Shape the external sink expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransformedBookingEvent {
    pub product_order_id_buyer: String,
    /// ISO-8601, millisecond precision, UTC `Z` suffix
    pub timestamp: String,
    pub product_provider_buyer: String,
}
