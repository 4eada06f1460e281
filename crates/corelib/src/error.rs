//! Error types for the core library.

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// More distinct members were requested than the ring holds.
    #[error("not enough members: requested {requested}, available {available}")]
    NotEnoughMembers {
        /// Number of distinct members asked for.
        requested: usize,
        /// Number of distinct members on the ring.
        available: usize,
    },

    /// Ring parameters are unusable.
    #[error("invalid ring configuration: {0}")]
    InvalidConfig(String),

    /// No member had spare capacity for a partition.
    ///
    /// Only reachable when the load factor is below 1, so it points at a
    /// configuration defect rather than a transient condition.
    #[error(
        "redistribution invariant violated: no member under capacity {capacity} for partition {partition}"
    )]
    RedistributionInvariantViolation {
        /// Partition that could not be placed.
        partition: usize,
        /// Per-member capacity in effect.
        capacity: usize,
    },
}

impl Error {
    /// True if asking again for fewer members may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::NotEnoughMembers { .. })
    }
}
