//! Default-length identifier value.

use super::sampler::DEFAULT_SIZE;
use std::fmt;
use std::str::Utf8Error;

/// An identifier of [`DEFAULT_SIZE`] symbols followed by a NUL terminator.
///
/// Returned by value from [`Generator::generate_default`](super::Generator::generate_default),
/// so every caller owns its own storage.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefaultId {
    bytes: [u8; DEFAULT_SIZE + 1],
}

impl DefaultId {
    pub(crate) fn zeroed() -> Self {
        Self {
            bytes: [0u8; DEFAULT_SIZE + 1],
        }
    }

    /// Writable symbol region; the terminator stays outside it.
    pub(crate) fn symbols_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..DEFAULT_SIZE]
    }

    /// The symbols, without the terminator.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..DEFAULT_SIZE]
    }

    /// The symbols followed by the NUL terminator.
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8; DEFAULT_SIZE + 1] {
        &self.bytes
    }

    /// The identifier as text.
    ///
    /// Fails only when the identifier was drawn from a non-ASCII alphabet
    /// and its bytes are not UTF-8.
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }

    /// Number of symbols, always [`DEFAULT_SIZE`].
    #[inline]
    pub fn len(&self) -> usize {
        DEFAULT_SIZE
    }

    /// Always false.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl AsRef<[u8]> for DefaultId {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl TryFrom<DefaultId> for String {
    type Error = Utf8Error;

    fn try_from(id: DefaultId) -> Result<Self, Self::Error> {
        id.as_str().map(str::to_owned)
    }
}

impl fmt::Debug for DefaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DefaultId")
            .field(&self.as_bytes().escape_ascii().to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminator_survives_fill() {
        let mut id = DefaultId::zeroed();
        id.symbols_mut().fill(b'x');

        assert_eq!(id.as_bytes(), &[b'x'; DEFAULT_SIZE][..]);
        assert_eq!(id.as_bytes_with_nul()[DEFAULT_SIZE], 0);
        assert_eq!(id.as_str(), Ok("xxxxxxxxxxxxxxxxxxxxx"));
        assert_eq!(String::try_from(id).unwrap().len(), 21);
    }

    #[test]
    fn test_non_utf8_reported() {
        let mut id = DefaultId::zeroed();
        id.symbols_mut().fill(0xFF);

        assert!(id.as_str().is_err());
        assert!(String::try_from(id).is_err());
        assert_eq!(AsRef::<[u8]>::as_ref(&id), &[0xFF; DEFAULT_SIZE][..]);
        assert!(format!("{:?}", id).contains("\\xff"));
    }
}
