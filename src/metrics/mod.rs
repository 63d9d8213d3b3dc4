//! Prometheus metrics for identifier generation.
//!
//! Counters summarise sampling work so the rejection rate and throughput
//! of an alphabet can be observed. The registry is encoded in the
//! Prometheus text format on demand; nothing is served over the network.
//!
//! # Metrics Exposed
//!
//! - `nanoid_identifiers_total` - Identifiers generated
//! - `nanoid_symbols_total` - Symbols written
//! - `nanoid_failures_total` - Failed generation calls
//! - `nanoid_entropy_blocks_total` - Random blocks requested
//! - `nanoid_bytes_drawn_total` - Random bytes examined
//! - `nanoid_bytes_rejected_total` - Random bytes rejected
//! - `nanoid_rejection_ratio` - Rejected over examined bytes
//! - `nanoid_speed_ns_per_id` - Latest speed test result
//!
//! # Example
//!
//! ```
//! use secure_nanoid::generator::{FillStats, Generator};
//! use secure_nanoid::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let mut buf = [0u8; 21];
//! let stats: FillStats = Generator::new().fill_with_stats(&mut buf, None).unwrap();
//!
//! registry.update(&MetricsSnapshot::from_stats(1, &stats));
//! assert!(registry.encode().unwrap().contains("nanoid_identifiers_total 1"));
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
