//! Scripted entropy source for tests.

use super::source::{EntropyError, EntropySource};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock entropy source that replays a fixed byte pattern.
///
/// NOT random. Bytes are served from `pattern` in order, wrapping around,
/// continuing across calls. Every call to [`EntropySource::fill`] is
/// counted, including failed ones.
#[derive(Debug, Default)]
pub struct MockEntropy {
    pattern: Vec<u8>,
    cursor: AtomicUsize,
    calls: AtomicUsize,
    call_limit: Option<usize>,
}

impl MockEntropy {
    /// Serves `pattern` cyclically. An empty pattern serves zeros.
    pub fn cycling(pattern: impl Into<Vec<u8>>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Fails every call with [`EntropyError::Exhausted`].
    pub fn failing() -> Self {
        Self::default().with_call_limit(0)
    }

    /// Succeeds for the first `limit` calls, then fails.
    pub fn with_call_limit(mut self, limit: usize) -> Self {
        self.call_limit = Some(limit);
        self
    }

    /// Number of `fill` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Number of bytes served so far.
    pub fn bytes_served(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }
}

impl EntropySource for MockEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        if self.call_limit.is_some_and(|limit| call >= limit) {
            return Err(EntropyError::Exhausted);
        }

        let start = self.cursor.fetch_add(buf.len(), Ordering::Relaxed);
        if self.pattern.is_empty() {
            buf.fill(0);
            return Ok(());
        }
        for (offset, slot) in buf.iter_mut().enumerate() {
            *slot = self.pattern[(start + offset) % self.pattern.len()];
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_continues_across_calls() {
        let mock = MockEntropy::cycling([1u8, 2, 3]);

        let mut a = [0u8; 4];
        let mut b = [0u8; 4];
        mock.fill(&mut a).unwrap();
        mock.fill(&mut b).unwrap();

        assert_eq!(a, [1, 2, 3, 1]);
        assert_eq!(b, [2, 3, 1, 2]);
        assert_eq!(mock.calls(), 2);
        assert_eq!(mock.bytes_served(), 8);
    }

    #[test]
    fn test_failing_counts_calls() {
        let mock = MockEntropy::failing();
        let mut buf = [0u8; 4];

        assert!(matches!(mock.fill(&mut buf), Err(EntropyError::Exhausted)));
        assert_eq!(mock.calls(), 1);
        assert_eq!(mock.bytes_served(), 0);
    }

    #[test]
    fn test_call_limit() {
        let mock = MockEntropy::cycling([9u8]).with_call_limit(2);
        let mut buf = [0u8; 2];

        assert!(mock.fill(&mut buf).is_ok());
        assert!(mock.fill(&mut buf).is_ok());
        assert!(mock.fill(&mut buf).is_err());
    }

    #[test]
    fn test_empty_pattern_serves_zeros() {
        let mock = MockEntropy::cycling(Vec::new());
        let mut buf = [0xFFu8; 8];
        mock.fill(&mut buf).unwrap();
        assert_eq!(buf, [0u8; 8]);
    }
}
