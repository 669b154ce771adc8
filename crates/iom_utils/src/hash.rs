//! Hash containers with a fixed seed, built on *hashbrown* and *foldhash*.
//!
//! Registry lookups happen on every mapped struct, so the containers use a
//! fast non-cryptographic hasher whose output only depends on the input.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x3C6E_F372_FE94_F82B);

/// Hasher produced by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// [`BuildHasher`] with a fixed `foldhash` seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use iom_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("numeric.int32");
/// let b = FixedHashState.hash_one("numeric.int32");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHashState

/// Pass-through hasher for keys that are already well distributed,
/// such as [`TypeId`](core::any::TypeId).
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// [`BuildHasher`] creating [`NoOpHasher`]s.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

// -----------------------------------------------------------------------------
// Containers

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use hashbrown;

#[cfg(test)]
mod tests {
    use super::{HashMap, HashSet};

    #[test]
    fn containers_use_fixed_state() {
        let mut map = HashMap::default();
        map.insert("guid128", 1);
        assert_eq!(map.get("guid128"), Some(&1));

        let mut set = HashSet::default();
        assert!(set.insert("brand"));
        assert!(!set.insert("brand"));
    }
}
