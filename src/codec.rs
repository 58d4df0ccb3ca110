//! Conversion between messages and the integers RSA operates on.
//!
//! A message is read as a big-endian unsigned integer. The integer alone
//! cannot tell how many leading `0x00` bytes the message had, so [`decode`]
//! takes the original length and pads back to it.

use alloc::vec::Vec;
use num_bigint::BigUint;

use crate::algorithms::pad::uint_to_zeroizing_be_pad;
use crate::errors::Result;

/// Interprets `message` as a big-endian unsigned integer.
///
/// The empty message and messages made only of `0x00` bytes encode to zero.
#[inline]
pub fn encode(message: &[u8]) -> BigUint {
    BigUint::from_bytes_be(message)
}

/// Converts `value` back to exactly `len` big-endian bytes, restoring any
/// leading `0x00` bytes.
///
/// Returns [`Error::Decryption`](crate::Error::Decryption) if `value` does
/// not fit in `len` bytes.
#[inline]
pub fn decode(value: &BigUint, len: usize) -> Result<Vec<u8>> {
    uint_to_zeroizing_be_pad(value.clone(), len)
}
