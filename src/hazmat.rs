//! ⚠️ Low-level "hazmat" RSA functions.
//!
//! # ☢️️ WARNING: HAZARDOUS API ☢️
//!
//! This module holds the raw modular exponentiation that both encryption and
//! decryption reduce to, applied to integers with no length bookkeeping.
//! Everything in this crate is textbook RSA: deterministic, malleable and
//! without padding. These functions are the bare core of it, for callers
//! that already hold message integers.

pub use crate::algorithms::rsa::{rsa_decrypt, rsa_encrypt, transform};
