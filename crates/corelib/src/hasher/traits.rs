//! Core hasher trait definitions.

use std::fmt::Debug;

/// Maps arbitrary bytes onto the 64-bit ring space.
///
/// Hashers are stateless and thread-safe, allowing concurrent
/// lookups without synchronization overhead. They do not need to be
/// cryptographic, only fast and well distributed.
pub trait KeyHasher: Clone + Debug + Send + Sync + 'static {
    /// Hashes `data` to a ring position.
    fn hash(&self, data: &[u8]) -> u64;

    /// Returns the name of this hasher.
    fn name(&self) -> &'static str;
}
