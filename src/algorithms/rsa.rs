//! Generic RSA implementation

use log::trace;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::errors::{Error, Result};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// Computes `value^exponent mod modulus` by square-and-multiply.
///
/// Encryption and decryption are both this operation; only the exponent
/// differs. The result is always in `[0, modulus)`.
///
/// # Panics
///
/// Panics if `modulus` is zero.
#[inline]
pub fn transform(value: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    trace!("modpow: {}-bit base, {}-bit modulus", value.bits(), modulus.bits());
    value.modpow(exponent, modulus)
}

/// ⚠️ Raw RSA encryption of m with the public key. No padding is performed.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Raw RSA is deterministic and malleable. See the
/// [module-level documentation][crate::hazmat] for more information.
#[inline]
pub fn rsa_encrypt<K: PublicKeyParts>(key: &K, m: &BigUint) -> Result<BigUint> {
    if key.n().is_zero() {
        return Err(Error::InvalidKeyMaterial("modulus is zero"));
    }
    if m >= key.n() {
        return Err(Error::MessageTooLong);
    }

    Ok(transform(m, key.e(), key.n()))
}

/// ⚠️ Performs raw RSA decryption with no padding.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Raw RSA is deterministic and malleable. See the
/// [module-level documentation][crate::hazmat] for more information.
#[inline]
pub fn rsa_decrypt<K: PrivateKeyParts>(priv_key: &K, c: &BigUint) -> Result<BigUint> {
    if priv_key.n().is_zero() {
        return Err(Error::InvalidKeyMaterial("modulus is zero"));
    }
    if c >= priv_key.n() {
        return Err(Error::Decryption);
    }

    Ok(transform(c, priv_key.d(), priv_key.n()))
}
