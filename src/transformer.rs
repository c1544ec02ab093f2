use chrono::{DateTime, Datelike, Utc};

use crate::classifier::BookingEvent;
use crate::envelope::TransformedBookingEvent;

/// Maps a booking into the sink's shape.
pub fn transform_booking(event: &BookingEvent) -> TransformedBookingEvent {
    let booking = &event.booking;
    TransformedBookingEvent {
        product_order_id_buyer: booking.order_id.as_str().to_string(),
        timestamp: to_iso_string(&booking.timestamp),
        product_provider_buyer: booking.product_provider.clone(),
    }
}

/// Renders a timestamp exactly as JavaScript's `Date.prototype.toISOString`:
/// `2024-05-01T12:30:00.000Z`, with years outside 0..=9999 written as a sign
/// and six digits (`+010000-01-01T00:00:00.000Z`).
pub fn to_iso_string(timestamp: &DateTime<Utc>) -> String {
    let year = timestamp.year();
    let rest = timestamp.format("-%m-%dT%H:%M:%S%.3fZ");
    if (0..=9999).contains(&year) {
        format!("{:04}{}", year, rest)
    } else {
        format!("{:+07}{}", year, rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{epoch_millis_to_datetime, BookingObject, OrderId};
    use chrono::{NaiveDate, TimeZone};

    fn booking_event(millis: f64, order: &str, provider: &str) -> BookingEvent {
        BookingEvent {
            envelope_id: "test".to_string(),
            partition_key: Some("testKey".to_string()),
            booking: BookingObject {
                timestamp: epoch_millis_to_datetime(millis).unwrap(),
                order_id: OrderId::new(order),
                product_provider: provider.to_string(),
            },
        }
    }

    #[test]
    fn test_transform_booking_completed() {
        let event = booking_event(1_714_566_600_123.0, "O-991", "Ferry Provider");
        let transformed = transform_booking(&event);

        assert_eq!(
            transformed,
            TransformedBookingEvent {
                product_order_id_buyer: "O-991".to_string(),
                timestamp: "2024-05-01T12:30:00.123Z".to_string(),
                product_provider_buyer: "Ferry Provider".to_string(),
            }
        );
    }

    #[test]
    fn test_transform_epoch_zero_keeps_millis() {
        let transformed = transform_booking(&booking_event(0.0, "1", "p"));
        assert_eq!(transformed.timestamp, "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_iso_string_expanded_years() {
        let cases = [
            (253_402_300_799_999.0, "9999-12-31T23:59:59.999Z"),
            (253_402_300_800_000.0, "+010000-01-01T00:00:00.000Z"),
            (-62_167_219_200_000.0, "0000-01-01T00:00:00.000Z"),
            (-62_198_755_200_000.0, "-000001-01-01T00:00:00.000Z"),
            (-1.0, "1969-12-31T23:59:59.999Z"),
        ];
        for (millis, expected) in cases {
            let transformed = transform_booking(&booking_event(millis, "1", "p"));
            assert_eq!(transformed.timestamp, expected, "{}", millis);
        }
    }

    #[test]
    fn test_iso_string_six_digit_year() {
        let naive = NaiveDate::from_ymd_opt(200_000, 3, 4)
            .unwrap()
            .and_hms_milli_opt(5, 6, 7, 8)
            .unwrap();
        assert_eq!(
            to_iso_string(&Utc.from_utc_datetime(&naive)),
            "+200000-03-04T05:06:07.008Z"
        );
    }

    #[test]
    fn test_transform_does_not_touch_input() {
        let event = booking_event(86_400_000.0, "42", "Rail");
        let before = event.clone();
        let _ = transform_booking(&event);
        assert_eq!(event, before);
    }

    #[test]
    fn test_transformed_serializes_with_sink_field_names() {
        let transformed = transform_booking(&booking_event(0.0, "42", "Rail"));
        let json = serde_json::to_value(&transformed).unwrap();
        assert_eq!(json["product_order_id_buyer"], "42");
        assert_eq!(json["product_provider_buyer"], "Rail");
        assert_eq!(json["timestamp"], "1970-01-01T00:00:00.000Z");
    }
}
