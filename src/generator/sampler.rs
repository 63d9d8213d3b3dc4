//! Masked rejection sampling over an alphabet.
//!
//! Each random byte is masked down to the smallest power-of-two range that
//! covers the alphabet. Values that land outside the alphabet are discarded
//! rather than folded back with a remainder, so every accepted symbol has
//! probability exactly `1 / len`. At most half of the draws are discarded.

use super::alphabet::{Alphabet, AlphabetError};
use super::id::DefaultId;
use crate::entropy::{EntropyError, EntropySource, SystemEntropy};
use thiserror::Error;

/// Default identifier length.
pub const DEFAULT_SIZE: usize = 21;

/// Bytes requested from the entropy source per refill.
///
/// Tuned for the default size; correctness does not depend on it.
pub const RANDOM_BLOCK_SIZE: usize = 32;

/// Errors that can occur during generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The alphabet failed validation.
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(#[from] AlphabetError),
    /// Zero symbols were requested.
    #[error("invalid length: identifiers need at least one symbol")]
    InvalidLength,
    /// The entropy source failed.
    #[error("failed to generate ID: {0}")]
    GenerationFailed(#[from] EntropyError),
    /// A text identifier was requested over a non-ASCII alphabet and the
    /// drawn bytes are not UTF-8.
    #[error("generated ID is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::string::FromUtf8Error),
}

/// Counters from one or more fills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillStats {
    /// Blocks requested from the entropy source.
    pub blocks: u64,
    /// Random bytes examined.
    pub drawn: u64,
    /// Examined bytes discarded by the rejection filter.
    pub rejected: u64,
}

impl FillStats {
    /// Bytes that became symbols.
    #[inline]
    pub fn accepted(&self) -> u64 {
        self.drawn - self.rejected
    }

    /// Fraction of examined bytes that were rejected.
    pub fn rejection_rate(&self) -> f64 {
        if self.drawn == 0 {
            return 0.0;
        }
        self.rejected as f64 / self.drawn as f64
    }

    /// Adds another fill's counters to these.
    pub fn merge(&mut self, other: &FillStats) {
        self.blocks += other.blocks;
        self.drawn += other.drawn;
        self.rejected += other.rejected;
    }
}

/// Identifier generator over an entropy source.
///
/// Holds no state besides the source, so a generator over a `Sync` source
/// can be shared between threads; each call uses its own scratch block and
/// the caller's output buffer.
#[derive(Debug, Clone, Default)]
pub struct Generator<S = SystemEntropy> {
    source: S,
}

impl Generator<SystemEntropy> {
    /// Creates a generator over the platform's preferred entropy backend.
    pub fn new() -> Self {
        Self::with_source(SystemEntropy::new())
    }
}

impl<S: EntropySource> Generator<S> {
    /// Creates a generator over `source`.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Returns the entropy source.
    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consumes the generator, returning its source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Fills `out` with symbols from `alphabet` (default alphabet for `None`).
    ///
    /// Reentrant. Invalid alphabets and empty buffers are rejected before any
    /// entropy is drawn. On entropy failure the contents of `out` are
    /// unspecified.
    pub fn fill<'b>(
        &self,
        out: &'b mut [u8],
        alphabet: Option<&[u8]>,
    ) -> Result<&'b mut [u8], GenerateError> {
        self.fill_with_stats(out, alphabet)?;
        Ok(out)
    }

    /// Like [`fill`](Self::fill), returning sampling counters instead.
    pub fn fill_with_stats(
        &self,
        out: &mut [u8],
        alphabet: Option<&[u8]>,
    ) -> Result<FillStats, GenerateError> {
        let alphabet = Alphabet::resolve(alphabet)?;
        self.sample(out, &alphabet)
    }

    /// Fills `out` from an already validated alphabet.
    pub fn sample(&self, out: &mut [u8], alphabet: &Alphabet<'_>) -> Result<FillStats, GenerateError> {
        if out.is_empty() {
            return Err(GenerateError::InvalidLength);
        }

        let mask = alphabet.mask();
        let mut block = [0u8; RANDOM_BLOCK_SIZE];
        let mut stats = FillStats::default();
        let mut written = 0;

        loop {
            self.source.fill(&mut block)?;
            stats.blocks += 1;

            for &byte in &block {
                stats.drawn += 1;
                let Some(symbol) = alphabet.get(usize::from(byte & mask)) else {
                    stats.rejected += 1;
                    continue;
                };
                out[written] = symbol;
                written += 1;
                if written == out.len() {
                    return Ok(stats);
                }
            }
        }
    }

    /// Generates an identifier of `length` raw symbols.
    pub fn generate_bytes(
        &self,
        length: usize,
        alphabet: Option<&[u8]>,
    ) -> Result<Vec<u8>, GenerateError> {
        let alphabet = Alphabet::resolve(alphabet)?;
        if length == 0 {
            return Err(GenerateError::InvalidLength);
        }

        let mut buf = vec![0u8; length];
        self.sample(&mut buf, &alphabet)?;
        Ok(buf)
    }

    /// Generates an identifier of `length` symbols as text.
    ///
    /// Always succeeds on ASCII alphabets. Over other byte alphabets the
    /// result may not be UTF-8, which is reported as
    /// [`GenerateError::NotUtf8`]; use [`generate_bytes`](Self::generate_bytes)
    /// for those.
    pub fn generate(&self, length: usize, alphabet: Option<&[u8]>) -> Result<String, GenerateError> {
        let bytes = self.generate_bytes(length, alphabet)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Generates a [`DEFAULT_SIZE`] identifier with a NUL terminator.
    pub fn generate_default(&self, alphabet: Option<&[u8]>) -> Result<DefaultId, GenerateError> {
        let mut id = DefaultId::zeroed();
        self.fill(id.symbols_mut(), alphabet)?;
        Ok(id)
    }
}
