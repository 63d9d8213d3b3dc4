//! Portable backend over `rand_core::OsRng`.
//!
//! Ranked last on every target; on targets without a Unix facility
//! (Windows, WASI) it is the only backend.

use super::source::EntropyError;
use rand_core::{OsRng, RngCore};

pub(super) fn fill(buf: &mut [u8]) -> Result<(), EntropyError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| EntropyError::Platform(e.to_string()))
}
