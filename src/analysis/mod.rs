//! Distribution testing for generated identifiers.
//!
//! A chi-square goodness-of-fit test over per-symbol counts. These are
//! sanity checks that catch a biased mapping or a broken entropy source,
//! not proofs of randomness.

mod check;
mod gamma;
mod uniformity;

pub use check::{CheckError, UniformityCheck, UniformityReport};
pub use gamma::{chi_square_p_value, ln_gamma, upper_regularized_gamma};
pub use uniformity::{ChiSquare, SymbolTally, TallyError, DEFAULT_ALPHA};
