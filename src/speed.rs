//! Throughput measurement.
//!
//! Runs an untimed burn-in, then times `count` generations into one reused
//! buffer with the default alphabet.

use crate::config::SpeedConfig;
use crate::entropy::EntropySource;
use crate::generator::{Alphabet, FillStats, GenerateError, Generator};
use std::time::{Duration, Instant};

/// Speed test parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedTest {
    /// Timed iterations.
    pub count: usize,
    /// Untimed warm-up iterations.
    pub burnin: usize,
    /// Symbols per identifier.
    pub length: usize,
}

impl From<&SpeedConfig> for SpeedTest {
    fn from(config: &SpeedConfig) -> Self {
        Self {
            count: config.count,
            burnin: config.effective_burnin(),
            length: config.length,
        }
    }
}

impl Default for SpeedTest {
    fn default() -> Self {
        Self::from(&SpeedConfig::default())
    }
}

/// Result of a timed run.
#[derive(Debug, Clone, Copy)]
pub struct SpeedReport {
    /// Timed iterations.
    pub iterations: usize,
    /// Wall time of the timed phase.
    pub elapsed: Duration,
    /// Sampling counters of the timed phase.
    pub stats: FillStats,
}

impl SpeedReport {
    /// Mean nanoseconds per identifier, truncated.
    pub fn nanos_per_id(&self) -> u128 {
        if self.iterations == 0 {
            return 0;
        }
        self.elapsed.as_nanos() / self.iterations as u128
    }
}

impl SpeedTest {
    /// Runs `burnin` untimed generations.
    pub fn burn_in<S: EntropySource>(&self, generator: &Generator<S>) -> Result<(), GenerateError> {
        let mut buf = vec![0u8; self.length];
        for _ in 0..self.burnin {
            generator.sample(&mut buf, &Alphabet::DEFAULT)?;
        }
        tracing::debug!(iterations = self.burnin, "Burn-in complete");
        Ok(())
    }

    /// Times `count` generations.
    pub fn measure<S: EntropySource>(
        &self,
        generator: &Generator<S>,
    ) -> Result<SpeedReport, GenerateError> {
        let mut buf = vec![0u8; self.length];
        let mut stats = FillStats::default();

        let start = Instant::now();
        for _ in 0..self.count {
            stats.merge(&generator.sample(&mut buf, &Alphabet::DEFAULT)?);
        }
        let elapsed = start.elapsed();

        let report = SpeedReport {
            iterations: self.count,
            elapsed,
            stats,
        };
        tracing::info!(
            iterations = self.count,
            elapsed_ms = elapsed.as_millis() as u64,
            ns_per_id = report.nanos_per_id() as u64,
            "Speed test complete"
        );
        Ok(report)
    }

    /// Burn-in followed by the timed run.
    pub fn run<S: EntropySource>(&self, generator: &Generator<S>) -> Result<SpeedReport, GenerateError> {
        self.burn_in(generator)?;
        self.measure(generator)
    }
}
