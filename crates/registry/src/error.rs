//! Error types for the service registry.

/// Result type alias for the registry.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`Registry`](crate::Registry) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Lookup against a service name that was never populated.
    #[error("unrecognized service: {0}")]
    ServiceNotFound(String),

    /// The requested `[min, max]` range is empty or starts below 1.
    #[error("invalid range: min {min}, max {max} (need 1 <= min <= max)")]
    InvalidRange {
        /// Smallest acceptable member count.
        min: usize,
        /// Largest desired member count.
        max: usize,
    },

    /// A ring operation failed during a lookup.
    #[error(transparent)]
    Ring(#[from] corelib::Error),

    /// A membership update could not be applied in full.
    #[error("populate service {service} failed: {source}")]
    Populate {
        /// Service being updated.
        service: String,
        /// The failing ring operation.
        #[source]
        source: corelib::Error,
    },
}

impl Error {
    /// True if a smaller member count could still succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Ring(e) => e.is_retryable(),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ServiceNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_not_enough_members_is_retryable() {
        let not_enough = Error::from(corelib::Error::NotEnoughMembers { requested: 3, available: 2 });
        assert!(not_enough.is_retryable());
        assert!(!Error::ServiceNotFound("baz".into()).is_retryable());
        assert!(!Error::InvalidRange { min: 3, max: 1 }.is_retryable());
        assert!(!Error::from(corelib::Error::InvalidConfig("x".into())).is_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(Error::ServiceNotFound("baz".into()).to_string(), "unrecognized service: baz");
        assert_eq!(
            Error::from(corelib::Error::NotEnoughMembers { requested: 3, available: 2 }).to_string(),
            "not enough members: requested 3, available 2"
        );
    }
}
