//! `getrandom(2)` backend.
//!
//! The kernel may return fewer bytes than requested or be interrupted by a
//! signal, so the call is repeated until the buffer is full.

use super::backend::Backend;
use super::source::EntropyError;

#[cfg(any(target_os = "linux", target_os = "android", target_os = "dragonfly"))]
#[allow(unsafe_code)]
pub(super) fn fill(buf: &mut [u8]) -> Result<(), EntropyError> {
    use std::io;

    let mut filled = 0;
    while filled < buf.len() {
        let rest = &mut buf[filled..];
        // SAFETY: `rest` is valid for writes of `rest.len()` bytes; flags 0
        // selects the blocking urandom pool.
        let ret = unsafe { libc::getrandom(rest.as_mut_ptr().cast(), rest.len(), 0) };
        if ret < 0 {
            let err = EntropyError::last_os_error(Backend::GetRandom);
            if matches!(&err, EntropyError::Os { source, .. } if source.kind() == io::ErrorKind::Interrupted)
            {
                continue;
            }
            return Err(err);
        }
        filled += ret.unsigned_abs();
    }
    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "dragonfly")))]
pub(super) fn fill(_buf: &mut [u8]) -> Result<(), EntropyError> {
    Err(EntropyError::Unsupported(Backend::GetRandom))
}

#[cfg(all(test, any(target_os = "linux", target_os = "android", target_os = "dragonfly")))]
mod tests {
    use super::*;

    #[test]
    fn test_fill_large_buffer() {
        // Large requests may come back short; the loop must cover them
        let mut buf = vec![0u8; 64 * 1024];
        fill(&mut buf).unwrap();

        assert!(buf[buf.len() - 32..].iter().any(|&b| b != 0));
    }
}
