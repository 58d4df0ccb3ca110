//! Generate the exponent pair for a two-prime RSA key

use log::debug;
use num_bigint::{BigUint, IntoBigUint, ModInverse};
use num_integer::Integer;
use num_traits::One;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::{
    errors::{Error, Result},
    key::PublicExponent,
    prime::generate_prime,
};

/// Everything that survives key generation. The primes and the totient do not.
pub(crate) struct RsaKeyComponents {
    pub n: BigUint,
    pub e: BigUint,
    pub d: BigUint,
}

/// Generates a two-prime RSA key whose primes have `bit_length` bits each,
/// so the modulus has exactly `2 * bit_length` bits.
///
/// `p`, `q` and φ(n) are held in [`Zeroizing`] wrappers scoped to this call.
pub(crate) fn generate_key_components<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_length: usize,
    exponent: &PublicExponent,
) -> Result<RsaKeyComponents> {
    if bit_length < 2 {
        return Err(Error::InvalidBitLength(bit_length));
    }
    check_prime_supply(bit_length)?;
    if let PublicExponent::Fixed(e) = exponent {
        check_fixed_exponent(e, bit_length)?;
    }

    loop {
        let (n, totient) = {
            let (p, q) = draw_distinct_primes(rng, bit_length)?;
            (&*p * &*q, Zeroizing::new(totient(&p, &q)))
        };

        let e = match exponent {
            PublicExponent::Fixed(e) => {
                if !is_valid_public_exponent(e, &totient) {
                    debug!("fixed public exponent shares a factor with the totient, redrawing primes");
                    continue;
                }
                e.clone()
            }
            PublicExponent::RandomPrime => draw_public_exponent(rng, bit_length, &totient)?,
        };

        let d = private_exponent(&e, &totient)?;
        return Ok(RsaKeyComponents { n, e, d });
    }
}

/// Derives the key components from two known primes and a public exponent.
///
/// Unlike [`generate_key_components`] nothing is redrawn: equal primes are
/// [`Error::InvalidKeyMaterial`] and an exponent outside `(1, φ)` or sharing a
/// factor with φ is [`Error::InvalidExponent`].
pub(crate) fn derive_from_primes(
    p: Zeroizing<BigUint>,
    q: Zeroizing<BigUint>,
    e: BigUint,
) -> Result<RsaKeyComponents> {
    if *p == *q {
        return Err(Error::InvalidKeyMaterial("primes must be distinct"));
    }
    if *p <= BigUint::one() || *q <= BigUint::one() {
        return Err(Error::InvalidKeyMaterial("primes must be greater than one"));
    }

    let n = &*p * &*q;
    let totient = Zeroizing::new(totient(&p, &q));
    drop(p);
    drop(q);

    if !is_valid_public_exponent(&e, &totient) {
        return Err(Error::InvalidExponent);
    }

    let d = private_exponent(&e, &totient)?;
    Ok(RsaKeyComponents { n, e, d })
}

/// Acceptance predicate for a public exponent: `1 < e < φ` and `gcd(e, φ) = 1`.
/// All three conditions are required.
pub(crate) fn is_valid_public_exponent(e: &BigUint, totient: &BigUint) -> bool {
    let one = BigUint::one();
    *e > one && e < totient && e.gcd(totient) == one
}

fn totient(p: &BigUint, q: &BigUint) -> BigUint {
    (p - BigUint::one()) * (q - BigUint::one())
}

fn draw_distinct_primes<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_length: usize,
) -> Result<(Zeroizing<BigUint>, Zeroizing<BigUint>)> {
    loop {
        let p = Zeroizing::new(generate_prime(rng, bit_length)?);
        let q = Zeroizing::new(generate_prime(rng, bit_length)?);
        if *p != *q {
            return Ok((p, q));
        }
        debug!("drew the same {}-bit prime twice, redrawing", bit_length);
    }
}

fn draw_public_exponent<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_length: usize,
    totient: &BigUint,
) -> Result<BigUint> {
    loop {
        let e = generate_prime(rng, bit_length)?;
        if is_valid_public_exponent(&e, totient) {
            return Ok(e);
        }
        debug!("public exponent candidate rejected, redrawing");
    }
}

/// Computes `d = e⁻¹ mod φ` once. A missing or wrong inverse means the
/// exponent check above is broken, so it is reported rather than retried.
fn private_exponent(e: &BigUint, totient: &BigUint) -> Result<BigUint> {
    let d = e
        .clone()
        .mod_inverse(totient)
        .and_then(|d| d.into_biguint())
        .ok_or(Error::InvalidExponent)?;

    if (e * &d) % totient != BigUint::one() {
        return Err(Error::InvalidExponent);
    }

    Ok(d)
}

/// Rejects bit lengths with too few primes to draw two distinct ones in a
/// reasonable amount of time.
fn check_prime_supply(bit_length: usize) -> Result<()> {
    if bit_length < 64 {
        let prime_limit = (1u64 << bit_length) as f64;

        // pi approximates the number of primes less than prime_limit

        // Calculate `log(prime_limit)` as `log(x) = log2(x) / log2(e) = log2(x) * log(2)`.
        let mut pi = prime_limit / (bit_length as f64 * core::f64::consts::LN_2 - 1.);

        // Generated primes start with 0b11, so we can only use a quarter of them.
        pi /= 4f64;
        // Use a factor of two to ensure that key generation terminates in a
        // reasonable amount of time.
        pi /= 2f64;

        if pi < 2. {
            return Err(Error::TooFewPrimes);
        }
    }

    Ok(())
}

/// A fixed exponent cannot be redrawn, so reject the ones that can never pass.
///
/// Both primes are at least `3 * 2^(bit_length - 2) + 1`, which puts φ above
/// `2^(2 * bit_length - 1)`. Any odd `e >= 3` below that is in range.
fn check_fixed_exponent(e: &BigUint, bit_length: usize) -> Result<()> {
    if *e < BigUint::from(3u32) || e.is_even() {
        return Err(Error::InvalidExponent);
    }
    if e.bits() > 2 * bit_length - 1 {
        return Err(Error::InvalidExponent);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::rsa::transform;
    use crate::dummy_rng::FailingRng;
    use num_traits::{FromPrimitive, ToPrimitive};
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    const EXP: u64 = 65537;

    fn big(v: u64) -> BigUint {
        BigUint::from_u64(v).unwrap()
    }

    fn secret(v: u64) -> Zeroizing<BigUint> {
        Zeroizing::new(big(v))
    }

    /// Splits a modulus whose smaller factor fits comfortably in trial division.
    fn factor(n: u64) -> (u64, u64) {
        let mut f = 3;
        while f * f <= n {
            if n % f == 0 {
                return (f, n / f);
            }
            f += 2;
        }
        panic!("{} has no odd factor", n);
    }

    #[test]
    fn test_textbook_components() {
        let components = derive_from_primes(secret(61), secret(53), big(17)).unwrap();
        assert_eq!(components.n, big(3233));
        assert_eq!(components.e, big(17));
        assert_eq!(components.d, big(2753));
    }

    #[test]
    fn test_derive_rejects_equal_primes() {
        assert_eq!(
            derive_from_primes(secret(61), secret(61), big(17)).err(),
            Some(Error::InvalidKeyMaterial("primes must be distinct"))
        );
    }

    #[test]
    fn test_derive_rejects_bad_exponents() {
        // phi = 3120 = 2^4 * 3 * 5 * 13
        for e in [0u64, 1, 3, 5, 26, 3120, 3121, 5000] {
            assert_eq!(
                derive_from_primes(secret(61), secret(53), big(e)).err(),
                Some(Error::InvalidExponent),
                "e = {}",
                e
            );
        }
    }

    #[test]
    fn test_public_exponent_predicate() {
        let phi = big(3120);
        assert!(is_valid_public_exponent(&big(17), &phi));
        assert!(is_valid_public_exponent(&big(3119), &phi));
        // in range but not coprime
        assert!(!is_valid_public_exponent(&big(39), &phi));
        // coprime but out of range
        assert!(!is_valid_public_exponent(&big(3121), &phi));
        assert!(!is_valid_public_exponent(&big(1), &phi));
    }

    #[test]
    fn test_impossible_keys() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);

        for i in 0..6 {
            assert!(generate_key_components(&mut rng, i, &PublicExponent::RandomPrime).is_err());
        }
        assert_eq!(
            generate_key_components(&mut rng, 8, &PublicExponent::default()).err(),
            Some(Error::InvalidExponent)
        );
        assert_eq!(
            generate_key_components(&mut rng, 32, &PublicExponent::Fixed(big(4))).err(),
            Some(Error::InvalidExponent)
        );
    }

    #[test]
    fn test_entropy_unavailable() {
        assert_eq!(
            generate_key_components(&mut FailingRng, 64, &PublicExponent::default()).err(),
            Some(Error::EntropyUnavailable)
        );
    }

    macro_rules! small_key_generation {
        ($name:ident, $size:expr, $exp:expr) => {
            #[test]
            fn $name() {
                let mut rng = ChaCha8Rng::from_seed([42; 32]);
                for _ in 0..10 {
                    let components = generate_key_components(&mut rng, $size, &$exp).unwrap();
                    assert_eq!(components.n.bits(), 2 * $size);

                    let (p, q) = factor(components.n.to_u64().unwrap());
                    assert_ne!(p, q);
                    let phi = big((p - 1) * (q - 1));

                    assert!(is_valid_public_exponent(&components.e, &phi));
                    assert!(((&components.e * &components.d) % &phi).is_one());
                }
            }
        };
    }

    small_key_generation!(key_generation_16_fixed, 16, PublicExponent::Fixed(big(EXP)));
    small_key_generation!(key_generation_16_random, 16, PublicExponent::RandomPrime);
    small_key_generation!(key_generation_20_random, 20, PublicExponent::RandomPrime);
    small_key_generation!(key_generation_12_fixed_3, 12, PublicExponent::Fixed(big(3)));

    macro_rules! key_generation {
        ($name:ident, $size:expr, $exp:expr) => {
            #[test]
            fn $name() {
                let mut rng = ChaCha8Rng::from_seed([42; 32]);
                let m = big(0x5ca1_ab1e);
                for _ in 0..3 {
                    let components = generate_key_components(&mut rng, $size, &$exp).unwrap();
                    assert_eq!(components.n.bits(), 2 * $size);

                    let c = transform(&m, &components.e, &components.n);
                    assert_eq!(transform(&c, &components.d, &components.n), m);
                }
            }
        };
    }

    key_generation!(key_generation_128_fixed, 128, PublicExponent::Fixed(big(EXP)));
    key_generation!(key_generation_128_random, 128, PublicExponent::RandomPrime);
    key_generation!(key_generation_512_fixed, 512, PublicExponent::Fixed(big(EXP)));
}
