//! Ring parameters and the fluent builder.

use crate::error::{Error, Result};
use crate::hasher::{KeyHasher, XxHash64};
use crate::member::Member;
use crate::ring::ring::HashRing;

/// Default number of partitions. Prime, for an even spread of `hash % P`.
pub const DEFAULT_PARTITION_COUNT: usize = 15739;
/// Default virtual nodes per member.
pub const DEFAULT_REPLICATION_FACTOR: usize = 51;
/// Default load bound as a multiple of the average partition count.
pub const DEFAULT_LOAD: f64 = 1.25;

/// Tunable parameters of a [`HashRing`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingConfig {
    /// Number of partitions keys are bucketed into.
    pub partition_count: usize,
    /// Virtual nodes contributed by each member.
    pub replication_factor: usize,
    /// Capacity multiplier on the average load. Must be at least 1 for
    /// redistribution to always succeed.
    pub load: f64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            partition_count: DEFAULT_PARTITION_COUNT,
            replication_factor: DEFAULT_REPLICATION_FACTOR,
            load: DEFAULT_LOAD,
        }
    }
}

impl RingConfig {
    /// Reject parameters no ring can work with.
    ///
    /// A load in `(0, 1)` passes: it is representable, it just cannot hold
    /// every partition and fails at redistribution time.
    pub fn validate(&self) -> Result<()> {
        if self.partition_count == 0 {
            return Err(Error::InvalidConfig("partition count must be positive".into()));
        }
        if self.replication_factor == 0 {
            return Err(Error::InvalidConfig("replication factor must be positive".into()));
        }
        if !self.load.is_finite() || self.load <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "load must be a positive finite number, got {}",
                self.load
            )));
        }
        Ok(())
    }

    /// Average partitions per member for `member_count` members.
    pub fn average_load(&self, member_count: usize) -> f64 {
        if member_count == 0 {
            return 0.0;
        }
        self.partition_count as f64 / member_count as f64
    }

    /// Maximum partitions any one member may own: `ceil(average * load)`.
    pub fn capacity(&self, member_count: usize) -> usize {
        (self.average_load(member_count) * self.load).ceil() as usize
    }
}

/// Builder for a [`HashRing`].
///
/// # Example
///
/// ```rust
/// use corelib::RingBuilder;
///
/// let ring = RingBuilder::new()
///     .with_partition_count(271)
///     .add_member("10.0.0.1:8545")
///     .add_member("10.0.0.2:8545")
///     .build()
///     .unwrap();
/// assert_eq!(ring.member_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder<H: KeyHasher = XxHash64> {
    config: RingConfig,
    hasher: H,
    members: Vec<Member>,
}

impl RingBuilder<XxHash64> {
    /// Builder with default parameters and the xxh64 hasher.
    pub fn new() -> Self {
        Self {
            config: RingConfig::default(),
            hasher: XxHash64,
            members: Vec::new(),
        }
    }
}

impl Default for RingBuilder<XxHash64> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: KeyHasher> RingBuilder<H> {
    pub fn with_config(mut self, config: RingConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of fixed partitions keys hash into.
    pub fn with_partition_count(mut self, partition_count: usize) -> Self {
        self.config.partition_count = partition_count;
        self
    }

    /// Virtual nodes placed on the ring per member.
    pub fn with_replication_factor(mut self, replication_factor: usize) -> Self {
        self.config.replication_factor = replication_factor;
        self
    }

    /// Load factor; each member owns at most `ceil(P / M * load)` partitions.
    pub fn with_load(mut self, load: f64) -> Self {
        self.config.load = load;
        self
    }

    /// Swap the hash function.
    pub fn with_hasher<H2: KeyHasher>(self, hasher: H2) -> RingBuilder<H2> {
        RingBuilder {
            config: self.config,
            hasher,
            members: self.members,
        }
    }

    /// Queue one member. Duplicates collapse at build time.
    pub fn add_member(mut self, member: impl Into<Member>) -> Self {
        self.members.push(member.into());
        self
    }

    /// Queue several members.
    pub fn add_members<I, M>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Member>,
    {
        self.members.extend(members.into_iter().map(Into::into));
        self
    }

    /// Validate the parameters and distribute partitions over the members.
    pub fn build(self) -> Result<HashRing<H>> {
        HashRing::with_members(self.config, self.hasher, self.members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.partition_count, 15739);
        assert_eq!(config.replication_factor, 51);
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let zero_partitions = RingConfig { partition_count: 0, ..RingConfig::default() };
        assert!(matches!(zero_partitions.validate(), Err(Error::InvalidConfig(_))));

        let zero_replicas = RingConfig { replication_factor: 0, ..RingConfig::default() };
        assert!(matches!(zero_replicas.validate(), Err(Error::InvalidConfig(_))));

        let nan_load = RingConfig { load: f64::NAN, ..RingConfig::default() };
        assert!(matches!(nan_load.validate(), Err(Error::InvalidConfig(_))));

        let low_load = RingConfig { load: 0.5, ..RingConfig::default() };
        assert!(low_load.validate().is_ok());
    }

    #[test]
    fn test_capacity() {
        let config = RingConfig { partition_count: 100, replication_factor: 1, load: 1.25 };
        assert_eq!(config.capacity(3), 42); // ceil(33.33 * 1.25)
        assert_eq!(config.capacity(4), 32); // ceil(25 * 1.25) = 31.25 -> 32
        assert_eq!(config.capacity(1), 125);
        assert_eq!(config.capacity(0), 0);
    }
}
