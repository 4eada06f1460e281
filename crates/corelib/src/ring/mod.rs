//! Consistent hash ring implementation.
//!
//! The ring manages virtual-node positions, owns the partition table, and
//! answers "closest N distinct members" queries for keys.

pub mod config;
mod distribution;
pub mod ring;

pub use config::{RingBuilder, RingConfig};
pub use ring::HashRing;

/// Alias for the main ring type (used by lib.rs).
pub type Ring = HashRing;
