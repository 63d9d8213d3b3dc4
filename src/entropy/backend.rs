//! Ranked operating system entropy facilities.
//!
//! Each target compiles a preference list, strongest first. A facility is
//! skipped only when it does not exist on the platform; the ranking is fixed
//! at build time and never re-probed at runtime.

use super::device::DeviceEntropy;
use super::source::{EntropyError, EntropySource};
use super::{arc4random, getentropy, getrandom, platform};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An operating system entropy facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `getentropy(3)`: blocks until seeded, at most 256 bytes per call.
    GetEntropy,
    /// `getrandom(2)`: kernel pool, may return short reads.
    GetRandom,
    /// `arc4random_buf(3)`: C runtime helper, cannot fail.
    Arc4Random,
    /// Reading `/dev/urandom`.
    Device,
    /// The portable OS generator behind `rand_core::OsRng`.
    Platform,
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd"
))]
const RANKED: &[Backend] = &[
    Backend::GetEntropy,
    Backend::Arc4Random,
    Backend::Device,
    Backend::Platform,
];

#[cfg(target_os = "netbsd")]
const RANKED: &[Backend] = &[Backend::Arc4Random, Backend::Device, Backend::Platform];

#[cfg(target_os = "dragonfly")]
const RANKED: &[Backend] = &[
    Backend::GetRandom,
    Backend::Arc4Random,
    Backend::Device,
    Backend::Platform,
];

// glibc 2.25 and later
#[cfg(all(target_os = "linux", target_env = "gnu"))]
const RANKED: &[Backend] = &[
    Backend::GetEntropy,
    Backend::GetRandom,
    Backend::Device,
    Backend::Platform,
];

#[cfg(any(
    all(target_os = "linux", not(target_env = "gnu")),
    target_os = "android"
))]
const RANKED: &[Backend] = &[Backend::GetRandom, Backend::Device, Backend::Platform];

#[cfg(all(
    unix,
    not(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly",
        target_os = "linux",
        target_os = "android"
    ))
))]
const RANKED: &[Backend] = &[Backend::Device, Backend::Platform];

#[cfg(not(unix))]
const RANKED: &[Backend] = &[Backend::Platform];

impl Backend {
    /// Every backend, in global preference order.
    pub const ALL: [Backend; 5] = [
        Backend::GetEntropy,
        Backend::GetRandom,
        Backend::Arc4Random,
        Backend::Device,
        Backend::Platform,
    ];

    /// Backends compiled for this target, strongest first.
    pub fn ranked() -> &'static [Backend] {
        RANKED
    }

    /// The strongest backend compiled for this target.
    pub fn preferred() -> Backend {
        RANKED[0]
    }

    /// Returns true if this backend is compiled for the current target.
    pub fn is_available(self) -> bool {
        RANKED.contains(&self)
    }

    /// Stable lowercase name, as accepted by [`FromStr`] and config files.
    pub fn name(self) -> &'static str {
        match self {
            Backend::GetEntropy => "getentropy",
            Backend::GetRandom => "getrandom",
            Backend::Arc4Random => "arc4random",
            Backend::Device => "device",
            Backend::Platform => "platform",
        }
    }

    /// Fills `buf` using this facility.
    pub(crate) fn fill(self, buf: &mut [u8]) -> Result<(), EntropyError> {
        if !self.is_available() {
            return Err(EntropyError::Unsupported(self));
        }

        match self {
            Backend::GetEntropy => getentropy::fill(buf),
            Backend::GetRandom => getrandom::fill(buf),
            Backend::Arc4Random => arc4random::fill(buf),
            Backend::Device => DeviceEntropy::default().fill(buf),
            Backend::Platform => platform::fill(buf),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown backend name.
#[derive(Debug, Clone, Error)]
#[error("unknown entropy backend '{0}' (expected one of: getentropy, getrandom, arc4random, device, platform)")]
pub struct ParseBackendError(String);

impl FromStr for Backend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .iter()
            .copied()
            .find(|backend| backend.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseBackendError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_is_non_empty_and_ends_with_platform() {
        let ranked = Backend::ranked();
        assert!(!ranked.is_empty());
        assert_eq!(ranked.last(), Some(&Backend::Platform));
        assert_eq!(Backend::preferred(), ranked[0]);
    }

    #[test]
    fn test_ranking_follows_global_order() {
        let positions: Vec<usize> = Backend::ranked()
            .iter()
            .map(|b| Backend::ALL.iter().position(|a| a == b).unwrap())
            .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn test_glibc_prefers_getentropy() {
        assert_eq!(Backend::ranked()[..2], [Backend::GetEntropy, Backend::GetRandom]);
        assert!(Backend::Device.is_available());
        assert!(!Backend::Arc4Random.is_available());
    }

    #[cfg(any(
        all(target_os = "linux", not(target_env = "gnu")),
        target_os = "android"
    ))]
    #[test]
    fn test_linux_prefers_getrandom() {
        assert_eq!(Backend::preferred(), Backend::GetRandom);
        assert!(!Backend::GetEntropy.is_available());
        assert!(Backend::Device.is_available());
    }

    #[cfg(target_os = "dragonfly")]
    #[test]
    fn test_dragonfly_prefers_getrandom() {
        assert_eq!(Backend::ranked()[..2], [Backend::GetRandom, Backend::Arc4Random]);
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_macos_prefers_getentropy() {
        assert_eq!(Backend::preferred(), Backend::GetEntropy);
    }

    #[test]
    fn test_name_roundtrip() {
        for backend in Backend::ALL {
            assert_eq!(backend.name().parse::<Backend>().unwrap(), backend);
        }
        assert_eq!("GetRandom".parse::<Backend>().unwrap(), Backend::GetRandom);
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = "rdrand".parse::<Backend>().unwrap_err();
        assert!(err.to_string().contains("rdrand"));
    }

    #[test]
    fn test_unavailable_backend_fill_fails() {
        for backend in Backend::ALL {
            if backend.is_available() {
                continue;
            }
            let mut buf = [0u8; 8];
            assert!(matches!(
                backend.fill(&mut buf),
                Err(EntropyError::Unsupported(b)) if b == backend
            ));
        }
    }
}
