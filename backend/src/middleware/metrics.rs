//! Request metrics collectors and their registry.
//!
//! The collectors are owned by the instrumentation context rather than a
//! process-wide default registry, so tests and embedders can each build an
//! isolated set.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// The counters and histogram recorded by the metrics stage.
///
/// All collectors are internally atomic; concurrent increments from
/// parallel requests accumulate without loss.
pub struct HttpMetrics {
    registry: Registry,
    pub requests: IntCounterVec,
    pub statuses: IntCounterVec,
    pub durations: HistogramVec,
}

impl HttpMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests."),
            &["http_method", "http_endpoint"],
        )?;
        let statuses = IntCounterVec::new(
            Opts::new("http_response_status", "Status of HTTP response."),
            &["http_method", "http_endpoint", "http_response_status"],
        )?;
        let durations = HistogramVec::new(
            HistogramOpts::new("http_response_time_seconds", "Duration of HTTP requests."),
            &["http_method", "http_endpoint"],
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(statuses.clone()))?;
        registry.register(Box::new(durations.clone()))?;

        Ok(HttpMetrics {
            registry,
            requests,
            statuses,
            durations,
        })
    }

    /// Renders the registry in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_exposition_contains_recorded_series() {
        let metrics = HttpMetrics::new().unwrap();
        metrics
            .requests
            .with_label_values(&["GET", "/user/*"])
            .inc();

        let exposition = metrics.render().unwrap();
        assert!(exposition.contains("http_requests_total"));
        assert!(exposition.contains("http_endpoint=\"/user/*\""));
    }

    #[test]
    fn concurrent_increments_accumulate() {
        let metrics = HttpMetrics::new().unwrap();
        let counter = metrics.requests.with_label_values(&["GET", "/user/*"]);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        counter.inc();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.get(), 8000);
    }
}
