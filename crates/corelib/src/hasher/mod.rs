//! Hash function adapters.
//!
//! Every position on the ring (virtual nodes, partitions, lookup keys) is
//! derived through a single [`KeyHasher`], so two rings built with the same
//! hasher and membership agree on every placement.

pub mod traits;
pub mod xxhash;

pub use traits::KeyHasher;
pub use xxhash::{XxHash64, Xxh3};
