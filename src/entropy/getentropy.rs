//! `getentropy(3)` backend.
//!
//! The call fills the whole buffer or fails, but refuses requests larger
//! than [`GETENTROPY_MAX`], so larger buffers are filled chunk by chunk.

use super::backend::Backend;
use super::source::EntropyError;

/// Largest request a single `getentropy` call accepts.
pub const GETENTROPY_MAX: usize = 256;

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    all(target_os = "linux", target_env = "gnu")
))]
#[allow(unsafe_code)]
pub(super) fn fill(buf: &mut [u8]) -> Result<(), EntropyError> {
    for chunk in buf.chunks_mut(GETENTROPY_MAX) {
        // SAFETY: `chunk` is valid for writes of `chunk.len()` bytes and
        // `chunk.len() <= GETENTROPY_MAX`.
        let ret = unsafe { libc::getentropy(chunk.as_mut_ptr().cast(), chunk.len()) };
        if ret == -1 {
            return Err(EntropyError::last_os_error(Backend::GetEntropy));
        }
    }
    Ok(())
}

#[cfg(not(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    all(target_os = "linux", target_env = "gnu")
)))]
pub(super) fn fill(_buf: &mut [u8]) -> Result<(), EntropyError> {
    Err(EntropyError::Unsupported(Backend::GetEntropy))
}

#[cfg(all(
    test,
    any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "openbsd",
        all(target_os = "linux", target_env = "gnu")
    )
))]
mod tests {
    use super::*;

    #[test]
    fn test_fill_larger_than_one_call() {
        let mut buf = vec![0u8; GETENTROPY_MAX * 3 + 17];
        fill(&mut buf).unwrap();

        // Every chunk, including the short tail, must have been written
        for chunk in buf.chunks(GETENTROPY_MAX) {
            assert!(chunk.iter().any(|&b| b != 0));
        }
    }
}
