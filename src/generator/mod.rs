//! Identifier generation.
//!
//! Maps random bytes onto an alphabet with masked rejection sampling. The
//! free functions here use a [`Generator`] over [`SystemEntropy`](crate::entropy::SystemEntropy).

mod alphabet;
mod id;
mod sampler;

pub use alphabet::{
    mask_for, next_power_of_two, Alphabet, AlphabetError, DEFAULT_ALPHABET, MAX_ALPHABET_LEN,
    MIN_ALPHABET_LEN,
};
pub use id::DefaultId;
pub use sampler::{FillStats, GenerateError, Generator, DEFAULT_SIZE, RANDOM_BLOCK_SIZE};

/// Fills `out` with symbols from `alphabet`, or the default alphabet for `None`.
pub fn fill<'b>(out: &'b mut [u8], alphabet: Option<&[u8]>) -> Result<&'b mut [u8], GenerateError> {
    Generator::new().fill(out, alphabet)
}

/// Generates an identifier of `length` raw symbols.
pub fn generate_bytes(length: usize, alphabet: Option<&[u8]>) -> Result<Vec<u8>, GenerateError> {
    Generator::new().generate_bytes(length, alphabet)
}

/// Generates an identifier of `length` symbols as text.
pub fn generate(length: usize, alphabet: Option<&[u8]>) -> Result<String, GenerateError> {
    Generator::new().generate(length, alphabet)
}

/// Generates a default-length identifier with a NUL terminator.
pub fn generate_default(alphabet: Option<&[u8]>) -> Result<DefaultId, GenerateError> {
    Generator::new().generate_default(alphabet)
}

/// Generates a default identifier: 21 symbols from the default alphabet.
pub fn nanoid() -> Result<String, GenerateError> {
    generate(DEFAULT_SIZE, None)
}
