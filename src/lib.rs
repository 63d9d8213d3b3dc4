//! Secure Nano ID Generation Library
//!
//! Tiny, URL-friendly, unique string identifiers drawn from operating
//! system entropy. Random bytes are mapped onto an alphabet by masked
//! rejection sampling, so every symbol is equally likely.
//!
//! # Architecture
//!
//! ```text
//! entropy (ranked OS facilities) → generator (mask + reject) → identifier
//!                                        ↓
//!                          analysis / speed / metrics
//! ```
//!
//! # Design Principles
//!
//! - **No modulo bias**: bytes are masked to the smallest covering power of
//!   two and out-of-range values are discarded
//! - **OS entropy only**: no user-space generator, no seeding, no caching
//! - **Fail loudly**: an entropy failure is an error, never a weaker fallback
//! - **Reentrant**: callers own every output buffer
//!
//! # Example
//!
//! ```
//! use secure_nanoid::{generate, nanoid, Generator, DEFAULT_SIZE};
//!
//! let id = nanoid().unwrap();
//! assert_eq!(id.len(), DEFAULT_SIZE);
//!
//! let hex = generate(12, Some(b"0123456789abcdef".as_slice())).unwrap();
//! assert!(hex.bytes().all(|b| b.is_ascii_hexdigit()));
//!
//! let mut buf = [0u8; 8];
//! Generator::new().fill(&mut buf, None).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod entropy;
pub mod generator;
pub mod metrics;
pub mod speed;

// Re-export commonly used types at crate root
pub use config::{ConfigError, FileConfig};
pub use entropy::{Backend, EntropyError, EntropySource, SystemEntropy};
pub use generator::{
    fill, generate, generate_bytes, generate_default, nanoid, Alphabet, AlphabetError, DefaultId,
    FillStats, GenerateError, Generator, DEFAULT_ALPHABET, DEFAULT_SIZE,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
