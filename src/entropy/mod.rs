//! Operating system entropy.
//!
//! This module hides the per-platform facilities behind one operation,
//! [`EntropySource::fill`]. The facilities are ranked per target at build
//! time:
//!
//! ```text
//! getentropy → getrandom → arc4random_buf → /dev/urandom → OsRng
//! ```
//!
//! A [`SystemEntropy`] binds the first one compiled for the target and
//! never falls back at runtime.

mod arc4random;
mod backend;
mod device;
mod getentropy;
mod getrandom;
mod mock;
mod platform;
mod source;

pub use backend::{Backend, ParseBackendError};
pub use device::{DeviceEntropy, DEFAULT_DEVICE};
pub use getentropy::GETENTROPY_MAX;
pub use mock::MockEntropy;
pub use source::{EntropyError, EntropySource, SystemEntropy};
