#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Usage
//!
//! ```
//! use textbook_rsa::{KeyGenConfig, PublicExponent};
//! use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
//!
//! let mut rng = ChaCha8Rng::from_seed([42; 32]); // rand_chacha@0.3
//!
//! let config = KeyGenConfig::new(256).with_exponent(PublicExponent::RandomPrime);
//! let (public_key, private_key) = config.generate(&mut rng).expect("failed to generate a key");
//!
//! // Encrypt
//! let data = b"hello world";
//! let ciphertext = public_key.encrypt(data).expect("failed to encrypt");
//!
//! // Decrypt
//! let dec_data = private_key.decrypt(&ciphertext).expect("failed to decrypt");
//! assert_eq!(&data[..], &dec_data[..]);
//! ```
//!
//! ## Raw integers
//!
//! The textbook example with `p = 61`, `q = 53` and `e = 17`:
//!
//! ```
//! use textbook_rsa::{hazmat::transform, keypair_from_primes, BigUint, PrivateKeyParts};
//!
//! let (public_key, private_key) =
//!     keypair_from_primes(BigUint::from(61u32), BigUint::from(53u32), BigUint::from(17u32))?;
//! assert_eq!(private_key.d(), &BigUint::from(2753u32));
//!
//! let n = BigUint::from(3233u32);
//! let c = transform(&BigUint::from(65u32), &BigUint::from(17u32), &n);
//! assert_eq!(c, BigUint::from(2790u32));
//! assert_eq!(transform(&c, private_key.d(), &n), BigUint::from(65u32));
//! # Ok::<(), textbook_rsa::Error>(())
//! ```

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use num_bigint::BigUint;
pub use rand_core;

mod algorithms;
pub mod codec;
pub mod errors;
pub mod hazmat;
pub mod prime;
#[cfg(feature = "std")]
pub mod storage;
pub mod traits;

mod ciphertext;
#[cfg(test)]
mod dummy_rng;
mod key;

#[cfg(feature = "getrandom")]
pub use crate::key::generate_keypair;
pub use crate::{
    ciphertext::Ciphertext,
    errors::{Error, Result},
    key::{
        decrypt, encrypt, generate_keypair_with_rng, keypair_from_primes, KeyGenConfig,
        PublicExponent, RsaPrivateKey, RsaPublicKey, DEFAULT_EXPONENT, DEFAULT_PRIME_BITS,
    },
    traits::{PrivateKeyParts, PublicKeyParts},
};
