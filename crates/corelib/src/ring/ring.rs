//! Partitioned hash ring with bounded loads.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::diff::{difference, Delta};
use crate::error::{Error, Result};
use crate::hasher::{KeyHasher, XxHash64};
use crate::member::Member;
use crate::ring::config::RingConfig;
use crate::ring::distribution::{distribute, partition_position, Assignment};
use crate::vnode::{successor, VirtualNode};

/// Consistent hash ring over a fixed partition table.
///
/// Keys map to one of `partition_count` partitions by `hash(key) % P`. Each
/// partition is owned by exactly one member, chosen by the bounded-load walk
/// described in the `distribution` module. The table is rebuilt after
/// every membership change and is otherwise read-only, so `&self` methods
/// are safe to call from many threads at once.
#[derive(Debug, Clone)]
pub struct HashRing<H: KeyHasher = XxHash64> {
    config: RingConfig,
    hasher: H,
    members: BTreeSet<Member>,
    /// Sorted by `(position, member)`.
    vnodes: Vec<VirtualNode>,
    /// Partition index -> owner. Empty when there are no members.
    partitions: Vec<Member>,
    loads: HashMap<Member, usize>,
}

impl HashRing<XxHash64> {
    /// Empty ring with default parameters. Every lookup fails until members are added.
    pub fn new() -> Self {
        Self {
            config: RingConfig::default(),
            hasher: XxHash64,
            members: BTreeSet::new(),
            vnodes: Vec::new(),
            partitions: Vec::new(),
            loads: HashMap::new(),
        }
    }

    /// Ring with default parameters populated with `members`.
    pub fn from_members<I, M>(members: I) -> Result<Self>
    where
        I: IntoIterator<Item = M>,
        M: Into<Member>,
    {
        Self::with_members(RingConfig::default(), XxHash64, members)
    }
}

impl Default for HashRing<XxHash64> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: KeyHasher> HashRing<H> {
    /// Empty ring with explicit parameters.
    pub fn with_config(config: RingConfig, hasher: H) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            hasher,
            members: BTreeSet::new(),
            vnodes: Vec::new(),
            partitions: Vec::new(),
            loads: HashMap::new(),
        })
    }

    /// Build all virtual nodes for `members` and distribute once.
    pub fn with_members<I, M>(config: RingConfig, hasher: H, members: I) -> Result<Self>
    where
        I: IntoIterator<Item = M>,
        M: Into<Member>,
    {
        let mut ring = Self::with_config(config, hasher)?;
        let members: BTreeSet<Member> = members.into_iter().map(Into::into).collect();

        let mut vnodes: Vec<VirtualNode> = members
            .iter()
            .flat_map(|m| VirtualNode::replicas(&ring.hasher, m, config.replication_factor))
            .collect();
        vnodes.sort();

        let assignment = distribute(&ring.config, &ring.hasher, &vnodes, members.len())?;
        ring.commit(members, vnodes, assignment);
        Ok(ring)
    }

    /// Add a member and redistribute.
    ///
    /// Returns `false` without touching the table if the member is already
    /// present. On error the ring keeps its previous state.
    pub fn add(&mut self, member: Member) -> Result<bool> {
        if self.members.contains(&member) {
            return Ok(false);
        }

        let mut vnodes = self.vnodes.clone();
        for vnode in VirtualNode::replicas(&self.hasher, &member, self.config.replication_factor) {
            let idx = vnodes.partition_point(|v| *v < vnode);
            vnodes.insert(idx, vnode);
        }

        let mut members = self.members.clone();
        members.insert(member.clone());

        let assignment = distribute(&self.config, &self.hasher, &vnodes, members.len())?;
        self.commit(members, vnodes, assignment);
        debug!(%member, members = self.members.len(), "added member to ring");
        Ok(true)
    }

    /// Remove a member and redistribute.
    ///
    /// Removing an absent member is a no-op and returns `false`.
    pub fn remove(&mut self, member: &Member) -> Result<bool> {
        if !self.members.contains(member) {
            return Ok(false);
        }

        let vnodes: Vec<VirtualNode> = self
            .vnodes
            .iter()
            .filter(|v| &v.member != member)
            .cloned()
            .collect();

        let mut members = self.members.clone();
        members.remove(member);

        let assignment = distribute(&self.config, &self.hasher, &vnodes, members.len())?;
        self.commit(members, vnodes, assignment);
        debug!(%member, members = self.members.len(), "removed member from ring");
        Ok(true)
    }

    /// Replace the membership with `members`, applying additions before removals.
    ///
    /// Stops at the first failing operation; changes applied before it are kept.
    pub fn set<I>(&mut self, members: I) -> Result<Delta>
    where
        I: IntoIterator<Item = Member>,
    {
        let delta = difference(members, self.members.iter().cloned());

        for member in &delta.added {
            self.add(member.clone())?;
        }
        for member in &delta.removed {
            self.remove(member)?;
        }

        Ok(delta)
    }

    /// Up to `count` distinct members for `key`, partition owner first.
    ///
    /// After the owner, members are collected in ring order starting at the
    /// partition's position, wrapping once.
    ///
    /// # Errors
    ///
    /// [`Error::NotEnoughMembers`] if `count` exceeds the number of distinct
    /// members, including the empty ring.
    pub fn get(&self, key: &[u8], count: usize) -> Result<Vec<Member>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let available = self.members.len();
        if count > available || self.partitions.is_empty() {
            return Err(Error::NotEnoughMembers { requested: count, available });
        }

        let partition = self.partition_for_key(key);
        let mut result = Vec::with_capacity(count);
        result.push(self.partitions[partition].clone());

        let len = self.vnodes.len();
        let start = successor(&self.vnodes, partition_position(&self.hasher, partition));
        for step in 0..len {
            if result.len() == count {
                break;
            }
            let member = &self.vnodes[(start + step) % len].member;
            if !result.contains(member) {
                result.push(member.clone());
            }
        }

        if result.len() < count {
            return Err(Error::NotEnoughMembers { requested: count, available: result.len() });
        }
        Ok(result)
    }

    /// Owner of the partition `key` falls in, if the ring has members.
    pub fn locate(&self, key: &[u8]) -> Option<&Member> {
        self.partitions.get(self.partition_for_key(key))
    }

    /// Partition index for `key`: `hash(key) % partition_count`.
    #[inline]
    pub fn partition_for_key(&self, key: &[u8]) -> usize {
        (self.hasher.hash(key) % self.config.partition_count as u64) as usize
    }

    /// Owner of partition `partition`.
    pub fn partition_owner(&self, partition: usize) -> Option<&Member> {
        self.partitions.get(partition)
    }

    /// Current members in lexical order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    /// Whether `member` is currently on the ring.
    pub fn contains(&self, member: &Member) -> bool {
        self.members.contains(member)
    }

    /// Number of distinct members.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// `true` until the first member is added.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Virtual nodes on the ring: `members * replication_factor`.
    pub fn vnode_count(&self) -> usize {
        self.vnodes.len()
    }

    /// Size of the partition table once the ring has members.
    pub fn partition_count(&self) -> usize {
        self.config.partition_count
    }

    /// Parameters the ring was built with.
    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Name of the key hash function, e.g. `"xxh64"`.
    pub fn hasher_name(&self) -> &'static str {
        self.hasher.name()
    }

    /// Partitions owned by each member.
    pub fn load_distribution(&self) -> &HashMap<Member, usize> {
        &self.loads
    }

    /// Average partitions per member at the current size.
    pub fn average_load(&self) -> f64 {
        self.config.average_load(self.members.len())
    }

    /// Per-member capacity at the current size.
    pub fn capacity(&self) -> usize {
        self.config.capacity(self.members.len())
    }

    /// Partition index -> owner, in index order. Empty without members.
    pub fn partition_table(&self) -> &[Member] {
        &self.partitions
    }

    fn commit(&mut self, members: BTreeSet<Member>, vnodes: Vec<VirtualNode>, assignment: Assignment) {
        self.members = members;
        self.vnodes = vnodes;
        self.partitions = assignment.partitions;
        self.loads = assignment.loads;
    }
}
