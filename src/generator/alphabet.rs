//! Alphabets and the rejection mask.

use std::fmt;
use thiserror::Error;

/// Default symbols: `A-Za-z0-9-_`, the base64url set of RFC 4648 §5.
pub const DEFAULT_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Smallest accepted alphabet.
pub const MIN_ALPHABET_LEN: usize = 2;

/// Largest accepted alphabet. One random byte is drawn per trial.
pub const MAX_ALPHABET_LEN: usize = 254;

/// Alphabet validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphabetError {
    /// Fewer than two symbols.
    #[error("alphabet has {len} symbol(s), at least 2 required")]
    TooSmall {
        /// Symbols supplied.
        len: usize,
    },
    /// More than 254 symbols.
    #[error("alphabet has {len} symbols, at most 254 allowed")]
    TooLarge {
        /// Symbols supplied.
        len: usize,
    },
    /// A byte occurs more than once.
    #[error("alphabet repeats symbol '{}'", std::ascii::escape_default(*.symbol))]
    Duplicate {
        /// The repeated byte.
        symbol: u8,
    },
}

/// Rounds up to the next power of two.
///
/// `0` and `1` map to themselves; values above `2^31` map to `0`.
#[inline]
pub fn next_power_of_two(v: u32) -> u32 {
    if v <= 1 {
        return v;
    }
    v.checked_next_power_of_two().unwrap_or(0)
}

/// Smallest all-ones byte mask covering `count - 1`.
///
/// Saturates at `0xFF` for counts above 256.
#[inline]
pub fn mask_for(count: usize) -> u8 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    let rounded = next_power_of_two(count);
    if rounded == 0 && count > 1 {
        return u8::MAX;
    }
    u8::try_from(rounded.saturating_sub(1)).unwrap_or(u8::MAX)
}

/// A validated alphabet: 2 to 254 distinct bytes.
///
/// Symbols are raw bytes; any value, including NUL and bytes above 0x7F,
/// may appear once. Borrowed from the caller for the duration of a
/// generation call.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alphabet<'a> {
    symbols: &'a [u8],
}

impl Alphabet<'static> {
    /// The 64-symbol default alphabet.
    pub const DEFAULT: Self = Self {
        symbols: DEFAULT_ALPHABET,
    };
}

impl<'a> Alphabet<'a> {
    /// Validates `symbols`.
    pub fn new(symbols: &'a [u8]) -> Result<Self, AlphabetError> {
        let len = symbols.len();
        if len < MIN_ALPHABET_LEN {
            return Err(AlphabetError::TooSmall { len });
        }
        if len > MAX_ALPHABET_LEN {
            return Err(AlphabetError::TooLarge { len });
        }

        let mut seen = [false; 256];
        for &symbol in symbols {
            let slot = &mut seen[usize::from(symbol)];
            if *slot {
                return Err(AlphabetError::Duplicate { symbol });
            }
            *slot = true;
        }

        Ok(Self { symbols })
    }

    /// Validates `symbols`, or returns the default alphabet for `None`.
    pub fn resolve(symbols: Option<&'a [u8]>) -> Result<Self, AlphabetError> {
        match symbols {
            Some(symbols) => Self::new(symbols),
            None => Ok(Alphabet::DEFAULT),
        }
    }

    /// Number of symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; validated alphabets hold at least two symbols.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols in order.
    #[inline]
    pub fn symbols(&self) -> &'a [u8] {
        self.symbols
    }

    /// Symbol at `index`, or `None` when `index >= len()`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.symbols.get(index).copied()
    }

    /// Returns true if `symbol` belongs to the alphabet.
    pub fn contains(&self, symbol: u8) -> bool {
        self.symbols.contains(&symbol)
    }

    /// The rejection mask for this alphabet, recomputed on every call.
    #[inline]
    pub fn mask(&self) -> u8 {
        mask_for(self.len())
    }

    /// Returns true if every symbol is ASCII, so any identifier is valid UTF-8.
    pub fn is_ascii(&self) -> bool {
        self.symbols.is_ascii()
    }

    /// Returns true if no drawn byte is ever rejected.
    pub fn is_power_of_two(&self) -> bool {
        self.len().is_power_of_two()
    }
}

impl Default for Alphabet<'static> {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for Alphabet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alphabet")
            .field("symbols", &self.symbols.escape_ascii().to_string())
            .field("len", &self.len())
            .field("mask", &format_args!("{:#04x}", self.mask()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_power_of_two_guards() {
        assert_eq!(next_power_of_two(0), 0);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(2), 2);
        assert_eq!(next_power_of_two(3), 4);
        assert_eq!(next_power_of_two(62), 64);
        assert_eq!(next_power_of_two(64), 64);
        assert_eq!(next_power_of_two(65), 128);
        assert_eq!(next_power_of_two(254), 256);
        assert_eq!(next_power_of_two(u32::MAX), 0);
    }

    #[test]
    fn test_mask_values() {
        assert_eq!(mask_for(2), 1);
        assert_eq!(mask_for(3), 3);
        assert_eq!(mask_for(10), 15);
        assert_eq!(mask_for(62), 63);
        assert_eq!(mask_for(64), 63);
        assert_eq!(mask_for(65), 127);
        assert_eq!(mask_for(254), 255);
        assert_eq!(mask_for(1000), 255);
    }

    #[test]
    fn test_mask_covers_every_index() {
        for count in MIN_ALPHABET_LEN..=MAX_ALPHABET_LEN {
            let mask = usize::from(mask_for(count));
            assert!(mask >= count - 1, "mask {mask} too small for {count}");
            // Smallest such mask: fewer than half of the masked values are rejected
            assert!(mask < 2 * count - 1, "mask {mask} too large for {count}");
        }
    }

    #[test]
    fn test_default_alphabet() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.len(), 64);
        assert_eq!(alphabet.mask(), 63);
        assert!(alphabet.is_power_of_two());
        assert!(Alphabet::new(DEFAULT_ALPHABET).is_ok());
    }

    #[test]
    fn test_resolve_none_is_default() {
        assert_eq!(Alphabet::resolve(None).unwrap(), Alphabet::DEFAULT);
        assert_eq!(Alphabet::resolve(Some(&b"ab"[..])).unwrap().len(), 2);
    }

    #[test]
    fn test_size_bounds() {
        assert_eq!(
            Alphabet::new(b""),
            Err(AlphabetError::TooSmall { len: 0 })
        );
        assert_eq!(
            Alphabet::new(b"a"),
            Err(AlphabetError::TooSmall { len: 1 })
        );

        let big: Vec<u8> = vec![b'x'; 255];
        assert_eq!(
            Alphabet::new(&big),
            Err(AlphabetError::TooLarge { len: 255 })
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        assert_eq!(
            Alphabet::new(b"abca"),
            Err(AlphabetError::Duplicate { symbol: b'a' })
        );
    }

    #[test]
    fn test_byte_alphabets_accepted() {
        let latin = Alphabet::new(&[b'a', 0xC3, 0xA9]).unwrap();
        assert_eq!(latin.len(), 3);
        assert!(!latin.is_ascii());

        let with_nul = Alphabet::new(&[b'a', 0, b'b']).unwrap();
        assert!(with_nul.contains(0));

        let high: Vec<u8> = (0x80..=0x8F).collect();
        let high = Alphabet::new(&high).unwrap();
        assert_eq!(high.mask(), 15);
        assert!(high.is_power_of_two());
    }

    #[test]
    fn test_largest_alphabet() {
        let symbols: Vec<u8> = (1..=254).collect();
        let alphabet = Alphabet::new(&symbols).unwrap();
        assert_eq!(alphabet.len(), MAX_ALPHABET_LEN);
        assert_eq!(alphabet.mask(), 0xFF);
        assert_eq!(alphabet.get(253), Some(254));
        assert_eq!(alphabet.get(254), None);
    }

    #[test]
    fn test_high_byte_duplicate_rejected() {
        assert_eq!(
            Alphabet::new(&[0x90, b'a', 0x90]),
            Err(AlphabetError::Duplicate { symbol: 0x90 })
        );
    }

    #[test]
    fn test_get_is_bounds_checked() {
        let alphabet = Alphabet::new(b"xyz").unwrap();
        assert_eq!(alphabet.get(0), Some(b'x'));
        assert_eq!(alphabet.get(2), Some(b'z'));
        assert_eq!(alphabet.get(3), None);
        assert!(alphabet.contains(b'y'));
        assert!(!alphabet.contains(b'a'));
    }

    #[test]
    fn test_error_messages() {
        let err = Alphabet::new(b"aa").unwrap_err();
        assert_eq!(err.to_string(), "alphabet repeats symbol 'a'");

        let err = Alphabet::new(&[0xFE, 0xFE]).unwrap_err();
        assert_eq!(err.to_string(), "alphabet repeats symbol '\\xfe'");
    }
}
