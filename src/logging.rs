use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::{LAMBDA_FUNCTION_ENV, LOG_FORMAT_ENV};

/// Initializes the logging system.
///
/// Output is JSON when `ROUTER_LOG_FORMAT=json` or when running inside Lambda,
/// so CloudWatch can index the fields; plain text otherwise.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("booking_stream_router=info"));

    let json = match std::env::var(LOG_FORMAT_ENV) {
        Ok(format) => format.eq_ignore_ascii_case("json"),
        Err(_) => std::env::var(LAMBDA_FUNCTION_ENV).is_ok(),
    };

    // try_init so a second call (tests, replay after lambda) is harmless
    let _ = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(true).without_time())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stdout))
            .try_init()
    };
}
