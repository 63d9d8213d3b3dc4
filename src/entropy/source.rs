//! Entropy source abstraction.
//!
//! Everything the generator needs from the operating system is the single
//! [`EntropySource::fill`] operation. [`SystemEntropy`] binds the strongest
//! facility compiled for the target; other implementations exist for
//! explicit device paths and for tests.

use super::backend::Backend;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported when secure random bytes cannot be obtained.
#[derive(Debug, Error)]
pub enum EntropyError {
    /// A system call reported an error.
    #[error("{backend} entropy call failed: {source}")]
    Os {
        /// Facility that failed.
        backend: Backend,
        /// The `errno` it reported.
        #[source]
        source: io::Error,
    },
    /// The entropy device could not be opened.
    #[error("failed to open entropy device {}: {source}", path.display())]
    DeviceOpen {
        /// Device path.
        path: PathBuf,
        /// Open error.
        #[source]
        source: io::Error,
    },
    /// Reading the entropy device failed.
    #[error("failed to read entropy device {}: {source}", path.display())]
    DeviceRead {
        /// Device path.
        path: PathBuf,
        /// Read error.
        #[source]
        source: io::Error,
    },
    /// The entropy device returned end of file.
    #[error("entropy device {} reached end of file", path.display())]
    DeviceEof {
        /// Device path.
        path: PathBuf,
    },
    /// The backend is not compiled in for this target.
    #[error("{0} entropy backend is not available on this platform")]
    Unsupported(Backend),
    /// The portable fallback failed.
    #[error("platform entropy source failed: {0}")]
    Platform(String),
    /// A scripted source ran out of calls.
    #[error("entropy source exhausted")]
    Exhausted,
}

impl EntropyError {
    /// Builds an [`EntropyError::Os`] from the calling thread's `errno`.
    pub(crate) fn last_os_error(backend: Backend) -> Self {
        Self::Os {
            backend,
            source: io::Error::last_os_error(),
        }
    }
}

/// A provider of cryptographically secure random bytes.
///
/// Implementations must fill the entire buffer or fail; a partial fill is
/// never a success. `fill` takes `&self` so a single source can back
/// concurrent generation calls.
pub trait EntropySource {
    /// Fills `buf` completely with secure random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError>;
}

impl<S: EntropySource + ?Sized> EntropySource for &S {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        (**self).fill(buf)
    }
}

/// Entropy from the operating system.
///
/// The backend is chosen once, at construction, from the ranking compiled
/// for the target (see [`Backend::ranked`]). Failed calls are reported as-is;
/// there is no fallback to a weaker backend at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemEntropy {
    backend: Backend,
}

impl SystemEntropy {
    /// Binds the strongest backend available on this platform.
    pub fn new() -> Self {
        Self {
            backend: Backend::preferred(),
        }
    }

    /// Pins a specific backend.
    ///
    /// Fails with [`EntropyError::Unsupported`] if the backend is not
    /// compiled for this target.
    pub fn with_backend(backend: Backend) -> Result<Self, EntropyError> {
        if !backend.is_available() {
            return Err(EntropyError::Unsupported(backend));
        }
        Ok(Self { backend })
    }

    /// Returns the bound backend.
    #[inline]
    pub fn backend(&self) -> Backend {
        self.backend
    }
}

impl Default for SystemEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for SystemEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        self.backend.fill(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_entropy_uses_preferred_backend() {
        let source = SystemEntropy::new();
        assert_eq!(source.backend(), Backend::preferred());
    }

    #[test]
    fn test_system_entropy_fills_buffer() {
        let source = SystemEntropy::default();
        let mut buf = [0u8; 64];
        source.fill(&mut buf).unwrap();

        // 64 zero bytes from a working source has probability 2^-512
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_successive_fills_differ() {
        let source = SystemEntropy::new();
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        source.fill(&mut a).unwrap();
        source.fill(&mut b).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_every_ranked_backend_fills() {
        for &backend in Backend::ranked() {
            let source = SystemEntropy::with_backend(backend).unwrap();
            let mut buf = [0u8; 600];
            source.fill(&mut buf).unwrap();
            assert!(buf.iter().any(|&b| b != 0), "{backend} returned zeros");
        }
    }

    #[test]
    fn test_unavailable_backend_rejected() {
        let missing = Backend::ALL
            .iter()
            .copied()
            .find(|backend| !backend.is_available());

        if let Some(backend) = missing {
            assert!(matches!(
                SystemEntropy::with_backend(backend),
                Err(EntropyError::Unsupported(b)) if b == backend
            ));
        }
    }

    #[test]
    fn test_empty_buffer_is_noop() {
        let source = SystemEntropy::new();
        let mut buf = [0u8; 0];
        assert!(source.fill(&mut buf).is_ok());
    }

    #[test]
    fn test_reference_is_a_source() {
        fn draw(source: impl EntropySource) -> [u8; 16] {
            let mut buf = [0u8; 16];
            source.fill(&mut buf).unwrap();
            buf
        }

        let source = SystemEntropy::new();
        let bytes = draw(&source);
        assert!(bytes.iter().any(|&b| b != 0));
    }
}
