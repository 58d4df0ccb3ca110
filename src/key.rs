use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::algorithms::generate::{derive_from_primes, generate_key_components, RsaKeyComponents};
use crate::algorithms::rsa::{rsa_decrypt, rsa_encrypt};
use crate::ciphertext::Ciphertext;
use crate::codec;
use crate::errors::{Error, Result};
use crate::traits::keys::{PrivateKeyParts, PublicKeyParts};

/// Default bit length of each prime; the modulus has twice as many bits.
pub const DEFAULT_PRIME_BITS: usize = 1024;

/// Default fixed public exponent.
pub const DEFAULT_EXPONENT: u64 = 65537;

/// Represents the public part of an RSA key.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawPublicKey")
)]
pub struct RsaPublicKey {
    /// Modulus
    n: BigUint,
    /// Public exponent
    e: BigUint,
}

/// Represents the private part of an RSA key: the private exponent and the
/// modulus. The prime factors are not kept.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawPrivateKey")
)]
pub struct RsaPrivateKey {
    /// Modulus
    n: BigUint,
    /// Private exponent
    d: BigUint,
}

/// Unchecked public key fields; deserialized keys go through [`RsaPublicKey::new`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(rename = "RsaPublicKey")]
struct RawPublicKey {
    n: BigUint,
    e: BigUint,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPublicKey> for RsaPublicKey {
    type Error = Error;

    fn try_from(raw: RawPublicKey) -> Result<Self> {
        Self::new(raw.n, raw.e)
    }
}

/// Unchecked private key fields; deserialized keys go through
/// [`RsaPrivateKey::from_components`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(rename = "RsaPrivateKey")]
struct RawPrivateKey {
    n: BigUint,
    d: BigUint,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPrivateKey> for RsaPrivateKey {
    type Error = Error;

    fn try_from(raw: RawPrivateKey) -> Result<Self> {
        Self::from_components(raw.n, raw.d)
    }
}

/// How the public exponent is chosen during key generation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PublicExponent {
    /// Use this exponent; the primes are redrawn until it is coprime to φ(n).
    Fixed(BigUint),
    /// Draw a random prime with as many bits as each RSA prime.
    RandomPrime,
}

impl Default for PublicExponent {
    fn default() -> Self {
        PublicExponent::Fixed(BigUint::from(DEFAULT_EXPONENT))
    }
}

/// Key generation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyGenConfig {
    /// Bit length of each of the two primes.
    pub bit_length: usize,
    /// Public exponent strategy.
    pub exponent: PublicExponent,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            bit_length: DEFAULT_PRIME_BITS,
            exponent: PublicExponent::default(),
        }
    }
}

impl KeyGenConfig {
    /// Parameters for primes of `bit_length` bits and the default exponent.
    pub fn new(bit_length: usize) -> Self {
        Self {
            bit_length,
            ..Self::default()
        }
    }

    /// Replaces the public exponent strategy.
    pub fn with_exponent(mut self, exponent: PublicExponent) -> Self {
        self.exponent = exponent;
        self
    }

    /// Generates a new key pair from `rng`.
    pub fn generate<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(RsaPublicKey, RsaPrivateKey)> {
        debug!(
            "generating key pair from two {}-bit primes ({:?})",
            self.bit_length, self.exponent
        );
        let components = generate_key_components(rng, self.bit_length, &self.exponent)?;
        Ok(split_components(components))
    }
}

fn split_components(components: RsaKeyComponents) -> (RsaPublicKey, RsaPrivateKey) {
    let RsaKeyComponents { n, e, d } = components;
    let public_key = RsaPublicKey { n: n.clone(), e };
    let private_key = RsaPrivateKey { n, d };
    (public_key, private_key)
}

/// Generates a key pair whose primes have `bit_length` bits each, using the
/// default public exponent and the given random source.
pub fn generate_keypair_with_rng<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_length: usize,
) -> Result<(RsaPublicKey, RsaPrivateKey)> {
    KeyGenConfig::new(bit_length).generate(rng)
}

/// Generates a key pair whose primes have `bit_length` bits each, drawing
/// randomness from the operating system.
#[cfg(feature = "getrandom")]
pub fn generate_keypair(bit_length: usize) -> Result<(RsaPublicKey, RsaPrivateKey)> {
    generate_keypair_with_rng(&mut rand_core::OsRng, bit_length)
}

/// Derives a key pair from two known primes and a public exponent.
///
/// Nothing is redrawn: the primes must be distinct and `e` must satisfy
/// `1 < e < φ(n)` and `gcd(e, φ(n)) = 1`.
pub fn keypair_from_primes(
    p: BigUint,
    q: BigUint,
    e: BigUint,
) -> Result<(RsaPublicKey, RsaPrivateKey)> {
    let components = derive_from_primes(Zeroizing::new(p), Zeroizing::new(q), e)?;
    Ok(split_components(components))
}

/// Encrypts `message` with `public_key`. See [`RsaPublicKey::encrypt`].
pub fn encrypt(message: &[u8], public_key: &RsaPublicKey) -> Result<Ciphertext> {
    public_key.encrypt(message)
}

/// Decrypts `ciphertext` with `private_key`. See [`RsaPrivateKey::decrypt`].
pub fn decrypt(ciphertext: &Ciphertext, private_key: &RsaPrivateKey) -> Result<Vec<u8>> {
    private_key.decrypt(ciphertext)
}

fn check_modulus(n: &BigUint) -> Result<()> {
    if *n <= BigUint::one() {
        return Err(Error::InvalidKeyMaterial("modulus must be greater than one"));
    }
    Ok(())
}

impl RsaPublicKey {
    /// Create a new public key from its components.
    ///
    /// Only the structure is checked: `n > 1` and `1 < e < n`. Whether `e`
    /// really belongs to `n` cannot be told without the factorization.
    pub fn new(n: BigUint, e: BigUint) -> Result<Self> {
        check_modulus(&n)?;
        if e <= BigUint::one() {
            return Err(Error::InvalidKeyMaterial("public exponent must be greater than one"));
        }
        if e >= n {
            return Err(Error::InvalidKeyMaterial("public exponent must be less than the modulus"));
        }

        Ok(Self { n, e })
    }

    /// Longest message that always encrypts under this key: every byte
    /// string of this length encodes to an integer below `n`.
    pub fn max_message_len(&self) -> usize {
        (self.n.bits() - 1) / 8
    }

    /// Encrypts `message` without padding.
    ///
    /// Encryption is deterministic: the same message under the same key
    /// always gives the same ciphertext.
    ///
    /// Fails with [`Error::MessageEmpty`] for an empty message and with
    /// [`Error::MessageTooLong`] if the message is longer than the modulus or
    /// encodes to an integer `>= n`.
    pub fn encrypt(&self, message: &[u8]) -> Result<Ciphertext> {
        if message.is_empty() {
            return Err(Error::MessageEmpty);
        }
        if message.len() > self.size() {
            return Err(Error::MessageTooLong);
        }

        let m = Zeroizing::new(codec::encode(message));
        let c = rsa_encrypt(self, &m)?;
        Ok(Ciphertext::new(c, message.len()))
    }
}

impl PublicKeyParts for RsaPublicKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

/// The `"<e> <n>"` decimal text form.
impl fmt::Display for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.e, self.n)
    }
}

impl FromStr for RsaPublicKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (e, n) = parse_pair(s)?;
        Self::new(n, e)
    }
}

impl RsaPrivateKey {
    /// Constructs an RSA private key from its components.
    ///
    /// Only the structure is checked: `n > 1` and `0 < d < n`.
    pub fn from_components(n: BigUint, d: BigUint) -> Result<Self> {
        check_modulus(&n)?;
        if d.is_zero() {
            return Err(Error::InvalidKeyMaterial("private exponent must not be zero"));
        }
        if d >= n {
            return Err(Error::InvalidKeyMaterial("private exponent must be less than the modulus"));
        }

        Ok(Self { n, d })
    }

    /// Decrypts `ciphertext` and restores the exact plaintext bytes.
    ///
    /// Fails with [`Error::Decryption`] if the ciphertext integer is not
    /// below `n` or the recovered integer does not fit the carried message
    /// length, which happens when the wrong key is used.
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Vec<u8>> {
        let len = ciphertext.message_len();
        if len == 0 || len > self.size() {
            return Err(Error::Decryption);
        }

        let m = Zeroizing::new(rsa_decrypt(self, ciphertext.value())?);
        codec::decode(&m, len)
    }

    /// The `"<d> <n>"` decimal text form, wiped when dropped.
    pub fn to_text(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("{} {}", self.d, self.n))
    }
}

impl PrivateKeyParts for RsaPrivateKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn d(&self) -> &BigUint {
        &self.d
    }
}

impl FromStr for RsaPrivateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (d, n) = parse_pair(s)?;
        Self::from_components(n, d)
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("n", &self.n)
            .finish_non_exhaustive()
    }
}

impl Zeroize for RsaPrivateKey {
    fn zeroize(&mut self) {
        self.d.zeroize();
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Parses two whitespace separated decimal integers.
fn parse_pair(s: &str) -> Result<(BigUint, BigUint)> {
    let mut parts = s.split_whitespace();
    let (Some(first), Some(second), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::InvalidKeyMaterial("expected two decimal integers"));
    };

    let parse = |part: &str| {
        BigUint::from_str(part).map_err(|_| Error::InvalidKeyMaterial("malformed decimal integer"))
    };
    Ok((parse(first)?, parse(second)?))
}
