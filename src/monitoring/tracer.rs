/*!
 * Bridge Tracing
 * Structured tracing for mount and sync operations using the tracing crate
 *
 * Features:
 * - Trace ID per bridge operation for log correlation
 * - JSON-formatted logs for structured parsing
 * - Slow-operation warnings with timing fields
 */

use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

use crate::core::limits::ENV_TRACE_JSON;

/// Operations slower than this are logged at warn level
const SLOW_OPERATION_MS: u128 = 500;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - BRIDGE_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .init();
        info!("Structured tracing initialized");
    }
}

/// Generate a unique trace ID for request correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span for one bridge operation (mount, sync batch, unmount)
///
/// Logs completion with its duration when dropped.
pub struct BridgeSpan {
    span: tracing::Span,
    start: Instant,
    operation: &'static str,
    trace_id: String,
}

impl BridgeSpan {
    pub fn new(operation: &'static str, mount: &str) -> Self {
        let trace_id = generate_trace_id();

        let span = span!(
            Level::DEBUG,
            "bridge_op",
            trace_id = %trace_id,
            operation = operation,
            mount = mount,
            items_processed = tracing::field::Empty,
            items_failed = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        let entered = span.enter();
        debug!(operation, mount, "bridge operation started");
        drop(entered);

        Self {
            span,
            start: Instant::now(),
            operation,
            trace_id,
        }
    }

    /// Get the trace ID for this operation
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Record processed and failed item counts
    pub fn record_items(&self, processed: usize, failed: usize) {
        self.span.record("items_processed", processed);
        self.span.record("items_failed", failed);
    }

    /// Record an operation-level error
    pub fn record_error(&self, error: &str) {
        self.span.record("error", error);
    }
}

impl Drop for BridgeSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();

        if duration.as_millis() > SLOW_OPERATION_MS {
            warn!(
                trace_id = %self.trace_id,
                operation = self.operation,
                duration_ms = duration.as_millis(),
                slow = true,
                "slow bridge operation"
            );
        } else {
            debug!(
                trace_id = %self.trace_id,
                operation = self.operation,
                duration_us = duration.as_micros(),
                "bridge operation completed"
            );
        }
    }
}

/// Helper to create a bridge span
#[inline]
pub fn span_bridge_op(operation: &'static str, mount: &str) -> BridgeSpan {
    BridgeSpan::new(operation, mount)
}
