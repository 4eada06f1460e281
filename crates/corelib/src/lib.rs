//! Core library for bounded-load consistent hashing.
//!
//! This crate provides the routing engine behind keyrouter:
//! - Hash function adapters
//! - Members and virtual nodes
//! - The membership differ
//! - The partitioned hash ring and its bounded-load assignment

pub mod diff;
pub mod error;
pub mod hasher;
pub mod member;
pub mod ring;
pub mod vnode;

pub use diff::{difference, Delta};
pub use error::{Error, Result};
pub use hasher::{KeyHasher, XxHash64, Xxh3};
pub use member::Member;
pub use ring::{HashRing, Ring, RingBuilder, RingConfig};
pub use vnode::VirtualNode;
