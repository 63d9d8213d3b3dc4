//! Sample-and-test uniformity runner.

use super::uniformity::{ChiSquare, SymbolTally, TallyError, DEFAULT_ALPHA};
use crate::entropy::EntropySource;
use crate::generator::{Alphabet, FillStats, GenerateError, Generator};
use thiserror::Error;

/// Errors from a uniformity check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Sampling failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),
    /// A sample could not be tallied.
    #[error(transparent)]
    Tally(#[from] TallyError),
}

/// Parameters for one uniformity check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformityCheck {
    /// Identifiers to generate.
    pub samples: usize,
    /// Symbols per identifier.
    pub length: usize,
    /// Significance level.
    pub alpha: f64,
}

impl Default for UniformityCheck {
    fn default() -> Self {
        Self {
            samples: 100_000,
            length: 20,
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// Outcome of a uniformity check.
#[derive(Debug, Clone, Copy)]
pub struct UniformityReport {
    /// Identifiers generated.
    pub samples: usize,
    /// Symbols per identifier.
    pub length: usize,
    /// Alphabet size.
    pub alphabet_len: usize,
    /// Significance level the verdict uses.
    pub alpha: f64,
    /// Test result.
    pub chi_square: ChiSquare,
    /// Sampling counters across the whole run.
    pub stats: FillStats,
}

impl UniformityReport {
    /// Returns true unless uniformity is rejected at the configured level.
    pub fn is_uniform(&self) -> bool {
        self.chi_square.is_uniform(self.alpha)
    }
}

impl UniformityCheck {
    /// Generates the sample with `generator` and tests it.
    pub fn run<S: EntropySource>(
        &self,
        generator: &Generator<S>,
        alphabet: &Alphabet<'_>,
    ) -> Result<UniformityReport, CheckError> {
        tracing::info!(
            samples = self.samples,
            length = self.length,
            alphabet_len = alphabet.len(),
            "Sampling identifiers"
        );

        let mut tally = SymbolTally::new(*alphabet);
        let mut stats = FillStats::default();
        let mut buf = vec![0u8; self.length];
        for _ in 0..self.samples {
            stats.merge(&generator.sample(&mut buf, alphabet)?);
            tally.add(&buf)?;
        }

        let chi_square = tally.chi_square()?;
        tracing::info!(
            statistic = chi_square.statistic,
            dof = chi_square.degrees_of_freedom,
            p_value = chi_square.p_value,
            "Chi-square test complete"
        );

        Ok(UniformityReport {
            samples: self.samples,
            length: self.length,
            alphabet_len: alphabet.len(),
            alpha: self.alpha,
            chi_square,
            stats,
        })
    }
}
