//! Metrics collection and registry.

use crate::generator::FillStats;
use crate::speed::SpeedReport;
use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Cumulative generation counters for a metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Identifiers generated.
    pub identifiers: u64,
    /// Symbols written.
    pub symbols: u64,
    /// Entropy blocks requested.
    pub entropy_blocks: u64,
    /// Random bytes examined.
    pub bytes_drawn: u64,
    /// Examined bytes discarded by the rejection filter.
    pub bytes_rejected: u64,
    /// Mean nanoseconds per identifier from the latest speed test.
    pub ns_per_id: Option<u64>,
}

impl MetricsSnapshot {
    /// Creates a snapshot from sampling counters over `identifiers` calls.
    pub fn from_stats(identifiers: u64, stats: &FillStats) -> Self {
        Self {
            identifiers,
            symbols: stats.accepted(),
            entropy_blocks: stats.blocks,
            bytes_drawn: stats.drawn,
            bytes_rejected: stats.rejected,
            ..Self::default()
        }
    }

    /// Creates a snapshot from a speed test.
    pub fn from_speed(report: &SpeedReport) -> Self {
        Self {
            ns_per_id: Some(u64::try_from(report.nanos_per_id()).unwrap_or(u64::MAX)),
            ..Self::from_stats(report.iterations as u64, &report.stats)
        }
    }

    /// Fraction of examined bytes that were rejected.
    pub fn rejection_ratio(&self) -> f64 {
        if self.bytes_drawn == 0 {
            return 0.0;
        }
        self.bytes_rejected as f64 / self.bytes_drawn as f64
    }
}

/// Prometheus metrics registry for identifier generation.
pub struct MetricsRegistry {
    registry: Registry,

    identifiers_total: IntCounter,
    symbols_total: IntCounter,
    failures_total: IntCounter,

    // Sampling
    entropy_blocks_total: IntCounter,
    bytes_drawn_total: IntCounter,
    bytes_rejected_total: IntCounter,
    rejection_ratio: Gauge,

    speed_ns_per_id: IntGauge,
}

/// Raises `counter` to `target`; counters never go down.
fn advance(counter: &IntCounter, target: u64) {
    let current = counter.get();
    if target > current {
        counter.inc_by(target - current);
    }
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all generation metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let identifiers_total =
            IntCounter::new("nanoid_identifiers_total", "Total identifiers generated")?;
        let symbols_total = IntCounter::new("nanoid_symbols_total", "Total symbols written")?;
        let failures_total =
            IntCounter::new("nanoid_failures_total", "Total failed generation calls")?;

        let entropy_blocks_total = IntCounter::new(
            "nanoid_entropy_blocks_total",
            "Total random blocks requested from the entropy source",
        )?;
        let bytes_drawn_total = IntCounter::new(
            "nanoid_bytes_drawn_total",
            "Total random bytes examined by the sampler",
        )?;
        let bytes_rejected_total = IntCounter::new(
            "nanoid_bytes_rejected_total",
            "Total random bytes discarded by the rejection filter",
        )?;
        let rejection_ratio = Gauge::new(
            "nanoid_rejection_ratio",
            "Fraction of examined bytes that were rejected",
        )?;

        let speed_ns_per_id = IntGauge::new(
            "nanoid_speed_ns_per_id",
            "Mean nanoseconds per identifier from the latest speed test",
        )?;

        registry.register(Box::new(identifiers_total.clone()))?;
        registry.register(Box::new(symbols_total.clone()))?;
        registry.register(Box::new(failures_total.clone()))?;
        registry.register(Box::new(entropy_blocks_total.clone()))?;
        registry.register(Box::new(bytes_drawn_total.clone()))?;
        registry.register(Box::new(bytes_rejected_total.clone()))?;
        registry.register(Box::new(rejection_ratio.clone()))?;
        registry.register(Box::new(speed_ns_per_id.clone()))?;

        Ok(Self {
            registry,
            identifiers_total,
            symbols_total,
            failures_total,
            entropy_blocks_total,
            bytes_drawn_total,
            bytes_rejected_total,
            rejection_ratio,
            speed_ns_per_id,
        })
    }

    /// Updates all metrics from a snapshot of cumulative counters.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        advance(&self.identifiers_total, snapshot.identifiers);
        advance(&self.symbols_total, snapshot.symbols);

        advance(&self.entropy_blocks_total, snapshot.entropy_blocks);
        advance(&self.bytes_drawn_total, snapshot.bytes_drawn);
        advance(&self.bytes_rejected_total, snapshot.bytes_rejected);
        self.rejection_ratio.set(snapshot.rejection_ratio());

        if let Some(ns) = snapshot.ns_per_id {
            self.speed_ns_per_id.set(i64::try_from(ns).unwrap_or(i64::MAX));
        }
    }

    /// Counts one failed generation call.
    pub fn record_failure(&self) {
        self.failures_total.inc();
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();

        let stats = FillStats {
            blocks: 3,
            drawn: 80,
            rejected: 20,
        };
        registry.update(&MetricsSnapshot::from_stats(3, &stats));

        let output = registry.encode().unwrap();
        assert!(output.contains("nanoid_identifiers_total 3"));
        assert!(output.contains("nanoid_symbols_total 60"));
        assert!(output.contains("nanoid_entropy_blocks_total 3"));
        assert!(output.contains("nanoid_bytes_rejected_total 20"));
        assert!(output.contains("nanoid_rejection_ratio 0.25"));
    }

    #[test]
    fn test_counters_never_decrease() {
        let registry = MetricsRegistry::new().unwrap();

        registry.update(&MetricsSnapshot {
            identifiers: 10,
            ..Default::default()
        });
        registry.update(&MetricsSnapshot {
            identifiers: 4,
            ..Default::default()
        });

        let output = registry.encode().unwrap();
        assert!(output.contains("nanoid_identifiers_total 10"));
    }

    #[test]
    fn test_failures_counted() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.encode().unwrap();
        assert!(output.contains("nanoid_failures_total 0"));

        registry.record_failure();
        registry.record_failure();
        // Snapshots carry no failure count and leave it alone
        registry.update(&MetricsSnapshot::from_stats(1, &FillStats::default()));

        let output = registry.encode().unwrap();
        assert!(output.contains("nanoid_failures_total 2"));
    }

    #[test]
    fn test_speed_snapshot() {
        let report = SpeedReport {
            iterations: 10,
            elapsed: Duration::from_nanos(5000),
            stats: FillStats {
                blocks: 10,
                drawn: 210,
                rejected: 0,
            },
        };
        let registry = MetricsRegistry::new().unwrap();
        registry.update(&MetricsSnapshot::from_speed(&report));

        let output = registry.encode().unwrap();
        assert!(output.contains("nanoid_speed_ns_per_id 500"));
        assert!(output.contains("nanoid_identifiers_total 10"));
    }

    #[test]
    fn test_metrics_encode() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.encode().unwrap();

        assert!(output.contains("nanoid_identifiers_total"));
        assert!(output.contains("nanoid_bytes_drawn_total"));
        assert!(output.contains("nanoid_failures_total"));
    }
}
