//! Random device file backend, the last Unix resort.
//!
//! The device is opened for every request and closed when the handle drops,
//! on success and failure alike. Reads are retried on `Interrupted` and
//! `WouldBlock`; end-of-file before the buffer is full is a failure.

use super::source::{EntropyError, EntropySource};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Path of the system random device.
pub const DEFAULT_DEVICE: &str = "/dev/urandom";

/// Entropy read from a device file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntropy {
    path: PathBuf,
}

impl DeviceEntropy {
    /// Reads from the device at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the device path.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_full(&self, reader: &mut impl Read, buf: &mut [u8]) -> Result<(), EntropyError> {
        let mut filled = 0;
        while filled < buf.len() {
            match reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(EntropyError::DeviceEof {
                        path: self.path.clone(),
                    })
                }
                Ok(n) => filled += n,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                    ) => {}
                Err(source) => {
                    return Err(EntropyError::DeviceRead {
                        path: self.path.clone(),
                        source,
                    })
                }
            }
        }
        Ok(())
    }
}

impl Default for DeviceEntropy {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE)
    }
}

impl EntropySource for DeviceEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        let mut file = File::open(&self.path).map_err(|source| EntropyError::DeviceOpen {
            path: self.path.clone(),
            source,
        })?;
        self.read_full(&mut file, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Reader that yields transient errors between one-byte reads.
    struct Flaky {
        data: Vec<u8>,
        pos: usize,
        hiccup: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.hiccup = !self.hiccup;
            if self.hiccup {
                let kind = if self.pos % 2 == 0 {
                    io::ErrorKind::Interrupted
                } else {
                    io::ErrorKind::WouldBlock
                };
                return Err(io::Error::from(kind));
            }
            match self.data.get(self.pos) {
                Some(&byte) if !buf.is_empty() => {
                    buf[0] = byte;
                    self.pos += 1;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_default_device_fills() {
        let source = DeviceEntropy::default();
        assert_eq!(source.path(), Path::new(DEFAULT_DEVICE));

        let mut buf = [0u8; 128];
        source.fill(&mut buf).unwrap();
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_missing_device_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let source = DeviceEntropy::new(dir.path().join("no-such-device"));

        let mut buf = [0u8; 8];
        assert!(matches!(
            source.fill(&mut buf),
            Err(EntropyError::DeviceOpen { .. })
        ));
    }

    #[test]
    fn test_short_file_reports_eof() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[7u8; 10]).unwrap();
        file.flush().unwrap();

        let source = DeviceEntropy::new(file.path());
        let mut buf = [0u8; 32];
        assert!(matches!(
            source.fill(&mut buf),
            Err(EntropyError::DeviceEof { .. })
        ));
    }

    #[test]
    fn test_regular_file_serves_its_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..64).collect();
        file.write_all(&data).unwrap();
        file.flush().unwrap();

        let source = DeviceEntropy::new(file.path());
        let mut buf = [0u8; 64];
        source.fill(&mut buf).unwrap();
        assert_eq!(&buf[..], &data[..]);

        // Reopened per request, so the same bytes come back
        let mut again = [0u8; 16];
        source.fill(&mut again).unwrap();
        assert_eq!(&again[..], &data[..16]);
    }

    #[test]
    fn test_transient_errors_are_retried() {
        let source = DeviceEntropy::default();
        let mut reader = Flaky {
            data: vec![1, 2, 3, 4, 5],
            pos: 0,
            hiccup: false,
        };

        let mut buf = [0u8; 5];
        source.read_full(&mut reader, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_hard_read_error_propagates() {
        let source = DeviceEntropy::default();
        let mut buf = [0u8; 4];
        assert!(matches!(
            source.read_full(&mut Broken, &mut buf),
            Err(EntropyError::DeviceRead { .. })
        ));
    }
}
