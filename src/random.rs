use core::ops::Range;

use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};

/// Seed used when no explicit seed is given and no clock is available.
pub const FALLBACK_SEED: u64 = 0x6772_6f75_6e64_776b;

/// Explicit seed if given, otherwise one derived from the wall clock.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(seed) => seed,
        None => clock_seed(),
    }
}

#[cfg(feature = "std")]
fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(FALLBACK_SEED)
}

#[cfg(not(feature = "std"))]
fn clock_seed() -> u64 {
    FALLBACK_SEED
}

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform sample from the half-open `range`; an empty range yields its start.
pub fn rand_range(rng: &mut impl RngCore, range: &Range<u32>) -> u32 {
    if range.start >= range.end {
        return range.start;
    }
    let span = range.end - range.start;
    range.start + (rng.next_u32() % span)
}

pub fn rand_below(rng: &mut impl RngCore, bound: usize) -> usize {
    if bound == 0 {
        return 0;
    }
    (rng.next_u64() % bound as u64) as usize
}

/// True with probability `percent / 100`.
#[inline]
pub fn roll_percent(rng: &mut impl RngCore, percent: u32) -> bool {
    (rng.next_u32() % 100) < percent
}
