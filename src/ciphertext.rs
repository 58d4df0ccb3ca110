//! Ciphertext produced by [`RsaPublicKey::encrypt`](crate::RsaPublicKey::encrypt).

use core::fmt;

use num_bigint::BigUint;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An encrypted message block.
///
/// Holds the ciphertext integer, which lies in `[0, n)`, and the byte length
/// of the plaintext. The length carries no secret beyond what the integer's
/// range already reveals and lets decryption restore leading `0x00` bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ciphertext {
    value: BigUint,
    len: usize,
}

impl Ciphertext {
    /// Pairs a ciphertext integer with the length of the message it encrypts.
    pub fn new(value: BigUint, message_len: usize) -> Self {
        Self {
            value,
            len: message_len,
        }
    }

    /// The ciphertext integer.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Byte length of the plaintext.
    pub fn message_len(&self) -> usize {
        self.len
    }

    /// Splits the ciphertext into its integer and the plaintext length.
    pub fn into_parts(self) -> (BigUint, usize) {
        (self.value, self.len)
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
