//! Bounded-load partition assignment.
//!
//! Partitions are placed in increasing index order. Each starts at the first
//! virtual node at or after its hashed position and walks clockwise past any
//! member already at capacity. With `load >= 1` the capacities sum to at
//! least the partition count, so the walk always terminates.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::hasher::KeyHasher;
use crate::member::Member;
use crate::ring::config::RingConfig;
use crate::vnode::{successor, VirtualNode};

/// A complete partition table and the per-member counts it implies.
#[derive(Debug, Clone, Default)]
pub(crate) struct Assignment {
    pub partitions: Vec<Member>,
    pub loads: HashMap<Member, usize>,
}

/// Ring position of a partition: the hash of its index as 8 little-endian bytes.
#[inline]
pub(crate) fn partition_position<H: KeyHasher>(hasher: &H, partition: usize) -> u64 {
    hasher.hash(&(partition as u64).to_le_bytes())
}

/// Assign every partition to a member of `vnodes`.
///
/// Works on fresh buffers only; callers commit the result once it is `Ok`.
pub(crate) fn distribute<H: KeyHasher>(
    config: &RingConfig,
    hasher: &H,
    vnodes: &[VirtualNode],
    member_count: usize,
) -> Result<Assignment> {
    if vnodes.is_empty() || member_count == 0 {
        return Ok(Assignment::default());
    }

    let capacity = config.capacity(member_count);
    let mut partitions = Vec::with_capacity(config.partition_count);
    let mut loads: HashMap<Member, usize> = HashMap::with_capacity(member_count);

    for partition in 0..config.partition_count {
        let start = successor(vnodes, partition_position(hasher, partition));
        let owner = place(vnodes, start, capacity, &loads)
            .ok_or(Error::RedistributionInvariantViolation { partition, capacity })?
            .clone();

        *loads.entry(owner.clone()).or_insert(0) += 1;
        partitions.push(owner);
    }

    Ok(Assignment { partitions, loads })
}

/// First member under `capacity` walking clockwise from `start`, at most one lap.
fn place<'a>(
    vnodes: &'a [VirtualNode],
    start: usize,
    capacity: usize,
    loads: &HashMap<Member, usize>,
) -> Option<&'a Member> {
    let len = vnodes.len();
    let mut previous: Option<&Member> = None;

    for step in 0..len {
        let member = &vnodes[(start + step) % len].member;
        if previous == Some(member) {
            continue;
        }
        if loads.get(member).copied().unwrap_or(0) < capacity {
            return Some(member);
        }
        previous = Some(member);
    }

    None
}
