//! `arc4random_buf(3)` backend. Fills any length in one call and never fails.

use super::source::EntropyError;

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
))]
#[allow(unsafe_code)]
pub(super) fn fill(buf: &mut [u8]) -> Result<(), EntropyError> {
    // SAFETY: `buf` is valid for writes of `buf.len()` bytes.
    unsafe { libc::arc4random_buf(buf.as_mut_ptr().cast(), buf.len()) };
    Ok(())
}

#[cfg(not(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
)))]
pub(super) fn fill(_buf: &mut [u8]) -> Result<(), EntropyError> {
    Err(EntropyError::Unsupported(super::backend::Backend::Arc4Random))
}
