//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Each member contributes `R` positions (the replication factor) to the
//! ring instead of one. More positions per member give a smoother split of
//! the partition space and mean a join or leave only disturbs a fraction of
//! it.
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(M * R) entries for M members
//! - **Lookup**: O(log(M * R)) binary search for a successor
//! - **Insert**: O(M * R) (sorted `Vec` shift), paid only on membership change

use std::fmt;

use crate::hasher::KeyHasher;
use crate::member::Member;

/// A virtual node on the hash ring.
///
/// # Invariants
///
/// - Ordering is by `position`, then by `member` lexically, so two members
///   hashing to the same position always sort the same way
/// - Every `VirtualNode` belongs to exactly one member
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Position on the 64-bit ring.
    pub position: u64,

    /// The member that owns this virtual node.
    pub member: Member,
}

impl VirtualNode {
    /// Create a new virtual node.
    #[inline]
    pub fn new(position: u64, member: Member) -> Self {
        Self { position, member }
    }

    /// Create a virtual node from a member and replica index.
    ///
    /// The position is `hash(member ++ replica_index)` with the index
    /// rendered in decimal, e.g. `"10.0.0.1:80"` replica 7 hashes
    /// `"10.0.0.1:807"`.
    ///
    /// # Example
    /// ```rust
    /// use corelib::{Member, VirtualNode, XxHash64};
    ///
    /// let a = VirtualNode::from_index(&XxHash64, &Member::from("node1"), 0);
    /// let b = VirtualNode::from_index(&XxHash64, &Member::from("node1"), 1);
    /// assert_ne!(a.position, b.position);
    /// ```
    pub fn from_index<H: KeyHasher>(hasher: &H, member: &Member, replica_index: usize) -> Self {
        let key = format!("{}{}", member, replica_index);
        Self::new(hasher.hash(key.as_bytes()), member.clone())
    }

    /// All `replicas` virtual nodes for a member, unsorted.
    pub fn replicas<H: KeyHasher>(hasher: &H, member: &Member, replicas: usize) -> Vec<Self> {
        (0..replicas)
            .map(|i| Self::from_index(hasher, member, i))
            .collect()
    }
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VNode(position={:016x}, member={})", self.position, self.member)
    }
}

/// Index of the first virtual node at or after `position`, wrapping to 0.
///
/// `vnodes` must be sorted and non-empty.
#[inline]
pub(crate) fn successor(vnodes: &[VirtualNode], position: u64) -> usize {
    let idx = vnodes.partition_point(|v| v.position < position);
    if idx == vnodes.len() {
        0
    } else {
        idx
    }
}
