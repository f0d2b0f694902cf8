//! Deterministic hash states.
//!
//! Tables keyed by names must iterate the same way on every run, so nothing
//! here draws a random seed.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

const SEED: u64 = 0x5EA1_ED0F_7E57_C0DE;

/// The hasher built by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// `foldhash` with a compile-time seed.
///
/// ```
/// use core::hash::BuildHasher;
/// use weft_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one("name"), FixedHashState.hash_one("name"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline]
    fn build_hasher(&self) -> FixedHasher {
        const STATE: FixedState = FixedState::with_seed(SEED);
        STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHashState

/// Returns the last `u64` written, unchanged.
///
/// Meant for keys that are already hashes, such as [`TypeId`](core::any::TypeId).
/// Other writes are folded byte by byte, big-endian.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher(u64);

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        self.0 = bytes
            .iter()
            .fold(self.0, |acc, byte| (acc << 8) | u64::from(*byte));
    }

    #[inline]
    fn write_u64(&mut self, value: u64) {
        self.0 = value;
    }
}

/// Builds [`NoOpHasher`]s.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline]
    fn build_hasher(&self) -> NoOpHasher {
        NoOpHasher(0)
    }
}
