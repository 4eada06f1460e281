//! xxHash-family hashers.

use xxhash_rust::xxh3::xxh3_64;
use xxhash_rust::xxh64::xxh64;

use crate::hasher::traits::KeyHasher;

/// XXH64 with seed 0. The default hasher for every ring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct XxHash64;

impl KeyHasher for XxHash64 {
    #[inline]
    fn hash(&self, data: &[u8]) -> u64 {
        xxh64(data, 0)
    }

    fn name(&self) -> &'static str {
        "xxh64"
    }
}

/// XXH3 (64-bit output). Faster on short keys; placements differ from [`XxHash64`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Xxh3;

impl KeyHasher for Xxh3 {
    #[inline]
    fn hash(&self, data: &[u8]) -> u64 {
        xxh3_64(data)
    }

    fn name(&self) -> &'static str {
        "xxh3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xxh64_known_vector() {
        // Reference value for the empty input, seed 0.
        assert_eq!(XxHash64.hash(b""), 0xEF46_DB37_51D8_E999);
    }

    #[test]
    fn test_hashers_are_deterministic() {
        assert_eq!(XxHash64.hash(b"key"), XxHash64.hash(b"key"));
        assert_eq!(Xxh3.hash(b"key"), Xxh3.hash(b"key"));
        assert_ne!(XxHash64.hash(b"key1"), XxHash64.hash(b"key2"));
    }

    #[test]
    fn test_hasher_names() {
        assert_eq!(XxHash64.name(), "xxh64");
        assert_eq!(Xxh3.name(), "xxh3");
    }
}
