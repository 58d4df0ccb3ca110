//! Error types.

/// Alias for [`core::result::Result`] with the `textbook-rsa` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Message to encrypt is empty.
    #[error("message must contain at least one byte")]
    MessageEmpty,

    /// Encoded message is not strictly smaller than the modulus.
    #[error("message too long")]
    MessageTooLong,

    /// Key material is malformed or its parts are inconsistent.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(&'static str),

    /// The randomness source failed to supply bits.
    #[error("entropy source unavailable")]
    EntropyUnavailable,

    /// Requested bit length is below the minimum of two bits.
    #[error("bit length must be at least 2, got {0}")]
    InvalidBitLength(usize),

    /// Too few primes of the requested size to draw two distinct ones.
    #[error("too few primes of given length to generate an RSA key")]
    TooFewPrimes,

    /// Public exponent cannot be paired with the totient.
    #[error("invalid exponent")]
    InvalidExponent,

    /// Ciphertext is out of range for the key or decodes to the wrong length.
    #[error("decryption error")]
    Decryption,

    /// Reading or writing stored key material failed.
    #[cfg(feature = "std")]
    #[error("key storage error: {0}")]
    KeyStorage(std::io::ErrorKind),
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::KeyStorage(err.kind())
    }
}
