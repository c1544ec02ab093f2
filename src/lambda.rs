use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, info_span, Instrument};

use crate::app::ports::{SinkPort, SinkStatus};
use crate::app::route_batch_use_case::RouteBatchUseCase;
use crate::config::Config;
use crate::error::Result;
use crate::infra::http_sink::ReqwestSink;
use crate::types::StreamBatch;

fn configured_sink(config: &Config) -> Result<ReqwestSink> {
    ReqwestSink::new(
        config.publish_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )
}

/// Wires the configured HTTP sink and default hooks into a batch handler.
pub fn build_use_case(config: &Config) -> Result<RouteBatchUseCase> {
    let sink = configured_sink(config)?;
    Ok(RouteBatchUseCase::new(Arc::new(sink))
        .with_target_event(config.target_event.clone())
        .with_decode_mode(config.decode_mode))
}

/// Reads a Kinesis event file shaped like `{"Records": [...]}`.
pub fn load_batch(path: &Path) -> Result<StreamBatch> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Runs one batch outside Lambda and renders the invocation response as
/// pretty JSON: `null` for an empty batch, else the published ids.
pub async fn replay(use_case: &RouteBatchUseCase, batch: &StreamBatch) -> Result<String> {
    let span = info_span!(
        "invocation",
        request_id = %uuid::Uuid::new_v4(),
        records = batch.len()
    );
    let outcome = use_case.handle(batch).instrument(span).await?;
    info!("Replay published {} records", outcome.published_count());
    Ok(serde_json::to_string_pretty(&outcome.into_response())?)
}

/// Probes the configured sink once.
pub async fn probe(config: &Config) -> Result<SinkStatus> {
    Ok(configured_sink(config)?.probe().await)
}

/// Handles one Kinesis-triggered invocation. An unusable sink fails the
/// invocation so the stream redelivers the batch.
pub async fn function_handler(
    use_case: &RouteBatchUseCase,
    event: LambdaEvent<StreamBatch>,
) -> std::result::Result<Option<Vec<String>>, Error> {
    let LambdaEvent { payload, context } = event;
    let span = info_span!(
        "invocation",
        request_id = %context.request_id,
        records = payload.len()
    );
    let outcome = use_case.handle(&payload).instrument(span).await.map_err(|e| {
        if e.is_sink_failure() {
            error!("Sink unusable, batch will be redelivered: {}", e);
        }
        e
    })?;
    Ok(outcome.into_response())
}

/// Serves the handler under the Lambda runtime until the process is stopped.
pub async fn run(config: Config) -> std::result::Result<(), Error> {
    let use_case = build_use_case(&config)?;
    info!(
        target_event = %use_case.target_event(),
        sink_configured = config.publish_url.is_some(),
        "Starting Lambda runtime"
    );

    let use_case = &use_case;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<StreamBatch>| async move {
        function_handler(use_case, event).await
    }))
    .await
}
