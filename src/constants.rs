/// Event discriminator the router acts on unless configured otherwise
pub const DEFAULT_TARGET_EVENT: &str = "booking_completed";

pub const BOOKING_COMPLETED: &str = "booking_completed";
pub const BOOKING_REQUESTED: &str = "booking_requested";

// Environment variable names
pub const PUBLISH_URL_ENV: &str = "PUBLISH_URL";
pub const CONFIG_PATH_ENV: &str = "ROUTER_CONFIG";
pub const TARGET_EVENT_ENV: &str = "ROUTER_TARGET_EVENT";
pub const REQUEST_TIMEOUT_ENV: &str = "ROUTER_REQUEST_TIMEOUT_SECS";
pub const DECODE_MODE_ENV: &str = "ROUTER_DECODE_MODE";
pub const LOG_FORMAT_ENV: &str = "ROUTER_LOG_FORMAT";
pub const LAMBDA_FUNCTION_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Bounds of a JavaScript `Date`, in milliseconds either side of the epoch.
/// Producers stamp payloads with `Date.getTime()`, so anything outside is junk.
/// `chrono::DateTime<Utc>` ends near year ±262143, so the accepted range is
/// that narrower window.
pub const MAX_EPOCH_MILLIS: i64 = 8_640_000_000_000_000;
