//! 64-bit FNV-1a hash used to join TRPFD pack names to TRPFS pack records
//!
//! The TRPFS map stores only hashes; the TRPFD index stores only names. The
//! hash is computed over the raw UTF-8 bytes of the name, case-sensitive and
//! without any path normalization. It is a join key, not an integrity check.

use std::fmt;

/// FNV-1a 64-bit offset basis
pub const FNV1A_64_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2645;

/// FNV-1a 64-bit prime
pub const FNV1A_64_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Compute the 64-bit FNV-1a hash of `data`
///
/// # Examples
///
/// ```
/// use packslice_formats::fnv::fnv1a_64;
///
/// assert_eq!(fnv1a_64(b"a"), 0xaf63dc4c8601ec8c);
/// ```
pub fn fnv1a_64(data: &[u8]) -> u64 {
    let mut hasher = Fnv1a64::new();
    hasher.update(data);
    hasher.finish()
}

/// Incremental FNV-1a 64-bit hasher
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Fnv1a64 {
    state: u64,
}

impl Fnv1a64 {
    /// Start from the offset basis
    pub const fn new() -> Self {
        Self {
            state: FNV1A_64_OFFSET_BASIS,
        }
    }

    /// Feed more bytes
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(FNV1A_64_PRIME);
        }
    }

    /// Current hash value
    pub const fn finish(&self) -> u64 {
        self.state
    }
}

impl Default for Fnv1a64 {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Fnv1a64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fnv1a64({:016x})", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input_is_offset_basis() {
        assert_eq!(fnv1a_64(b""), FNV1A_64_OFFSET_BASIS);
    }

    #[test]
    fn test_known_vectors() {
        // Reference values from the FNV test suite
        assert_eq!(fnv1a_64(b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(fnv1a_64(b"foobar"), 0x85944171f73967e8);
    }

    #[test]
    fn test_case_sensitive() {
        assert_ne!(fnv1a_64(b"arc/pokemon.trpak"), fnv1a_64(b"ARC/pokemon.trpak"));
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut hasher = Fnv1a64::default();
        hasher.update(b"foo");
        hasher.update(b"bar");
        assert_eq!(hasher.finish(), fnv1a_64(b"foobar"));
    }

    proptest! {
        #[test]
        fn hash_is_deterministic(data in prop::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(fnv1a_64(&data), fnv1a_64(&data));
        }

        #[test]
        fn single_byte_change_changes_hash(
            data in prop::collection::vec(any::<u8>(), 1..128),
            index in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let mut changed = data.clone();
            let i = index.index(changed.len());
            changed[i] ^= flip;
            prop_assert_ne!(fnv1a_64(&data), fnv1a_64(&changed));
        }
    }
}
