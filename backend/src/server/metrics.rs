//! Prometheus request metrics, compiled in with the `metrics` feature.

use std::io;

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use prometheus::Registry;

/// Prefix of every exported series.
const NAMESPACE: &str = "marketplace";
/// Path answered by the exporter.
const ENDPOINT: &str = "/metrics";

/// Request counters and latency histograms, exported at `/metrics`.
///
/// A fresh registry per server keeps series from leaking between instances.
///
/// # Errors
/// Returns an [`io::Error`] when the collectors cannot be registered.
pub(super) fn request_metrics() -> io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(NAMESPACE)
        .registry(Registry::new())
        .endpoint(ENDPOINT)
        .build()
        .map_err(|err| io::Error::other(err.to_string()))
}
