use core::num::NonZeroU32;
use rand_core::{CryptoRng, Error, RngCore};

/// An RNG whose entropy source is permanently unavailable. Infallible draws
/// are never expected; fallible ones always fail.
#[derive(Copy, Clone)]
pub(crate) struct FailingRng;

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        unimplemented!();
    }

    fn next_u64(&mut self) -> u64 {
        unimplemented!();
    }

    fn fill_bytes(&mut self, _: &mut [u8]) {
        unimplemented!();
    }

    fn try_fill_bytes(&mut self, _: &mut [u8]) -> Result<(), Error> {
        Err(Error::from(NonZeroU32::new(Error::CUSTOM_START).unwrap()))
    }
}

impl CryptoRng for FailingRng {}
