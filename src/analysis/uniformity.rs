//! Symbol tallies and the chi-square goodness-of-fit test.
//!
//! A sample is a set of equal-length identifiers. Under uniform sampling
//! every symbol of the alphabet is expected `size * len / A` times.

use super::gamma::chi_square_p_value;
use crate::generator::Alphabet;
use thiserror::Error;

/// Default significance level.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Errors while building a sample.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TallyError {
    /// An identifier's length differs from the first one tallied.
    #[error("identifier has length {got}, sample length is {expected}")]
    LengthMismatch {
        /// Length of every earlier identifier.
        expected: usize,
        /// Length of the offending identifier.
        got: usize,
    },
    /// A byte is not in the alphabet.
    #[error("identifier contains symbol 0x{0:02x} outside the alphabet")]
    UnknownSymbol(u8),
    /// Nothing has been tallied.
    #[error("sample is empty")]
    Empty,
}

/// Per-symbol counts over a sample of identifiers.
#[derive(Debug, Clone)]
pub struct SymbolTally<'a> {
    alphabet: Alphabet<'a>,
    counts: [u64; 256],
    size: usize,
    len: usize,
}

impl<'a> SymbolTally<'a> {
    /// Creates an empty tally over `alphabet`.
    pub fn new(alphabet: Alphabet<'a>) -> Self {
        Self {
            alphabet,
            counts: [0; 256],
            size: 0,
            len: 0,
        }
    }

    /// Adds one identifier.
    ///
    /// The first identifier fixes the sample length. Nothing is counted if
    /// the identifier is rejected.
    pub fn add(&mut self, id: &[u8]) -> Result<(), TallyError> {
        if self.size > 0 && id.len() != self.len {
            return Err(TallyError::LengthMismatch {
                expected: self.len,
                got: id.len(),
            });
        }
        if let Some(&symbol) = id.iter().find(|&&b| !self.alphabet.contains(b)) {
            return Err(TallyError::UnknownSymbol(symbol));
        }

        for &b in id {
            self.counts[usize::from(b)] += 1;
        }
        self.len = id.len();
        self.size += 1;
        Ok(())
    }

    /// Number of identifiers added.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Length of every identifier in the sample.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no identifier has been added.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Occurrences of `symbol`.
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[usize::from(symbol)]
    }

    /// Total symbols counted.
    pub fn total(&self) -> u64 {
        (self.size as u64) * (self.len as u64)
    }

    /// Expected occurrences of each symbol under uniform sampling.
    pub fn expected(&self) -> f64 {
        self.total() as f64 / self.alphabet.len() as f64
    }

    /// Runs the chi-square test with one category per alphabet symbol.
    ///
    /// Symbols that never occur still contribute their full expectation.
    pub fn chi_square(&self) -> Result<ChiSquare, TallyError> {
        if self.total() == 0 {
            return Err(TallyError::Empty);
        }

        let expected = self.expected();
        let statistic: f64 = self
            .alphabet
            .symbols()
            .iter()
            .map(|&s| {
                let diff = self.count(s) as f64 - expected;
                diff * diff / expected
            })
            .sum();
        let degrees_of_freedom = u32::try_from(self.alphabet.len() - 1).unwrap_or(u32::MAX);

        Ok(ChiSquare {
            statistic,
            degrees_of_freedom,
            expected,
            p_value: chi_square_p_value(statistic, degrees_of_freedom),
        })
    }
}

/// Result of a chi-square goodness-of-fit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquare {
    /// Sum of squared deviations over expectation.
    pub statistic: f64,
    /// Alphabet size minus one.
    pub degrees_of_freedom: u32,
    /// Expected count per symbol.
    pub expected: f64,
    /// Probability of a statistic at least this large under uniformity.
    pub p_value: f64,
}

impl ChiSquare {
    /// Returns true unless uniformity is rejected at significance `alpha`.
    pub fn is_uniform(&self, alpha: f64) -> bool {
        self.p_value >= alpha
    }
}
