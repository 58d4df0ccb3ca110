//! Generation of random probable primes.

use alloc::vec;
use log::trace;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Number of Miller-Rabin rounds applied to every candidate, on top of the
/// Baillie-PSW check. A composite survives with probability at most ¼ⁿ.
pub const MILLER_RABIN_ROUNDS: usize = 20;

/// A list of small, prime numbers that allows us to rapidly
/// exclude some fraction of composite candidates when searching for a random
/// prime. This list is truncated at the point where the product exceeds
/// a u64. It does not include two because we ensure that the candidates are
/// odd by construction.
const SMALL_PRIMES: [u8; 15] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// The product of the values in [`SMALL_PRIMES`].
const SMALL_PRIMES_PRODUCT: u64 = 16_294_579_238_595_022_365;

/// Reports whether `x` is probably prime.
///
/// Primes are always accepted; composites are accepted with probability
/// below 2⁻¹⁰⁰. The answer is exact for inputs less than 2⁶⁴.
pub fn is_probable_prime(x: &BigUint) -> bool {
    num_bigint::prime::probably_prime(x, MILLER_RABIN_ROUNDS)
}

/// Generates a random probable prime of exactly `bit_length` bits.
///
/// The two most significant bits of every candidate are set, so the product
/// of two primes from this function has exactly `2 * bit_length` bits.
///
/// Fails with [`Error::InvalidBitLength`] for `bit_length < 2` and with
/// [`Error::EntropyUnavailable`] as soon as `rng` refuses to supply bytes.
/// There is no retry cap: the expected number of candidates is small, but a
/// caller that needs a deadline has to impose it.
pub fn generate_prime<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_length: usize) -> Result<BigUint> {
    if bit_length < 2 {
        return Err(Error::InvalidBitLength(bit_length));
    }

    let mut b = bit_length % 8;
    if b == 0 {
        b = 8;
    }

    let bytes_len = (bit_length + 7) / 8;
    let mut bytes = Zeroizing::new(vec![0u8; bytes_len]);
    let mut candidates = 0usize;

    loop {
        candidates += 1;
        rng.try_fill_bytes(&mut bytes)
            .map_err(|_| Error::EntropyUnavailable)?;

        // Clear bits in the first byte to make sure the candidate has a size <= bits.
        bytes[0] &= ((1u32 << b) - 1) as u8;

        // Set the two most significant bits so that a product of two of
        // these values is never one bit short.
        if b >= 2 {
            bytes[0] |= 3u8.wrapping_shl(b as u32 - 2);
        } else {
            bytes[0] |= 1;
            if bytes_len > 1 {
                bytes[1] |= 0x80;
            }
        }

        // Make the value odd since an even number this large certainly isn't prime.
        bytes[bytes_len - 1] |= 1;

        let mut p = BigUint::from_bytes_be(&bytes);
        let rem = match (&p % SMALL_PRIMES_PRODUCT).to_u64() {
            Some(rem) => rem,
            None => continue,
        };

        'next: for delta in (0..1u64 << 20).step_by(2) {
            let m = rem + delta;

            for prime in SMALL_PRIMES {
                if m % u64::from(prime) == 0 && (bit_length > 6 || m != u64::from(prime)) {
                    continue 'next;
                }
            }

            if delta > 0 {
                p += delta;
            }

            break;
        }

        // Adding delta may have pushed the candidate one bit too long.
        if p.bits() == bit_length && is_probable_prime(&p) {
            trace!("found {}-bit prime after {} candidates", bit_length, candidates);
            return Ok(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy_rng::FailingRng;
    use num_traits::FromPrimitive;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    #[test]
    fn test_prime_small() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        for n in 2..10 {
            let p = generate_prime(&mut rng, n).unwrap();

            assert_eq!(p.bits(), n);
            assert!(is_probable_prime(&p));
        }
    }

    #[test]
    fn test_gen_prime_1024() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let p = generate_prime(&mut rng, 1024).unwrap();
        assert_eq!(p.bits(), 1024);
        assert!(is_probable_prime(&p));
    }

    #[test]
    fn test_top_two_bits_set() {
        let mut rng = ChaCha8Rng::from_seed([7; 32]);
        for bits in [16, 17, 31, 64, 129] {
            let p = generate_prime(&mut rng, bits).unwrap();
            let q = generate_prime(&mut rng, bits).unwrap();
            assert_eq!((&p * &q).bits(), 2 * bits);
        }
    }

    #[test]
    fn test_bit_length_too_small() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        assert_eq!(generate_prime(&mut rng, 0), Err(Error::InvalidBitLength(0)));
        assert_eq!(generate_prime(&mut rng, 1), Err(Error::InvalidBitLength(1)));
    }

    #[test]
    fn test_entropy_unavailable() {
        assert_eq!(
            generate_prime(&mut FailingRng, 64),
            Err(Error::EntropyUnavailable)
        );
    }

    #[test]
    fn test_is_probable_prime() {
        for p in [2u64, 3, 53, 61, 65537, 2_147_483_647] {
            assert!(is_probable_prime(&BigUint::from_u64(p).unwrap()), "{}", p);
        }
        // 561 is a Carmichael number, 3233 = 61 * 53
        for c in [0u64, 1, 4, 561, 3233, 4_294_967_297] {
            assert!(!is_probable_prime(&BigUint::from_u64(c).unwrap()), "{}", c);
        }

        let mersenne_127 = (BigUint::from_u64(1).unwrap() << 127usize) - 1u32;
        assert!(is_probable_prime(&mersenne_127));
    }
}
