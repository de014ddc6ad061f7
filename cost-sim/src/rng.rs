//! Seeded random sources and stream derivation.

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

/// Generator used for every seeded stream in the engine.
pub type SimRng = ChaCha20Rng;

/// Build the sequential driver's generator from a user-visible seed.
#[must_use]
pub fn master_rng(seed: u64) -> SimRng {
    SimRng::seed_from_u64(derive_stream_seed(seed, b"sequential"))
}

/// Build the generator for one path of the parallel driver.
///
/// Each path gets its own stream so results do not depend on how paths are
/// scheduled across threads.
#[must_use]
pub fn path_rng(master_seed: u64, path_index: u64) -> SimRng {
    let mut tag = [0u8; 13];
    tag[..5].copy_from_slice(b"path-");
    tag[5..].copy_from_slice(&path_index.to_le_bytes());
    SimRng::seed_from_u64(derive_stream_seed(master_seed, &tag))
}

/// Derive an independent 64-bit stream seed from a master seed and domain tag.
#[must_use]
pub fn derive_stream_seed(master_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length, so construction cannot fail for 8 bytes.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&master_seed.to_le_bytes()) else {
        return master_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl<R: rand::RngCore> CountingRng<R> {
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    #[must_use]
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}
