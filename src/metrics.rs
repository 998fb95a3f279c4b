//! Prometheus metrics for redis-toolbox

use crate::store::EXPIRED_KEYS_REMOVED;
use prometheus::core::Collector;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};
use std::sync::atomic::Ordering;
use tracing::error;

/// Global metrics instance
pub struct Metrics {
    pub registry: Registry,

    /// Tool calls by tool name
    pub tool_calls: IntCounterVec,

    // Reply outcome counters
    pub failed_replies: IntCounter,
    pub absent_replies: IntCounter,

    /// Request lines that did not decode to a tool call
    pub rejected_requests: IntCounter,

    pub tool_latency: Histogram,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        let registry = Registry::new();

        let tool_calls = register(
            &registry,
            IntCounterVec::new(
                Opts::new("toolbox_tool_calls_total", "Total tool calls"),
                &["tool"],
            )
            .unwrap(),
        );
        let failed_replies = register(
            &registry,
            IntCounter::new(
                "toolbox_failed_replies_total",
                "Tool calls answered with a translated store error",
            )
            .unwrap(),
        );
        let absent_replies = register(
            &registry,
            IntCounter::new(
                "toolbox_absent_replies_total",
                "Tool calls answered with a no-data sentinel",
            )
            .unwrap(),
        );
        let rejected_requests = register(
            &registry,
            IntCounter::new(
                "toolbox_rejected_requests_total",
                "Requests that were not a valid tool call",
            )
            .unwrap(),
        );
        let tool_latency = register(
            &registry,
            Histogram::with_opts(
                HistogramOpts::new("toolbox_tool_latency_seconds", "Tool latency in seconds")
                    .buckets(vec![
                        0.0001, 0.0005, 0.001, 0.002, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5,
                        1.0,
                    ]),
            )
            .unwrap(),
        );

        Self {
            registry,
            tool_calls,
            failed_replies,
            absent_replies,
            rejected_requests,
            tool_latency,
        }
    }

    /// Get Prometheus formatted metrics
    pub fn gather(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            error!("Failed to encode metrics: {}", e);
        }
        let mut output = String::from_utf8_lossy(&buffer).into_owned();

        // Memory backend expiration stats (from static counter)
        let expired_removed = EXPIRED_KEYS_REMOVED.load(Ordering::Relaxed);
        output.push_str(&format!(
            "\n# HELP toolbox_expired_keys_removed_total Keys removed by lazy expiration in the memory store\n\
             # TYPE toolbox_expired_keys_removed_total counter\n\
             toolbox_expired_keys_removed_total {expired_removed}\n"
        ));

        output
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn register<T: Collector + Clone + 'static>(registry: &Registry, metric: T) -> T {
    // Names are static and unique, so registration cannot collide
    registry.register(Box::new(metric.clone())).unwrap();
    metric
}
