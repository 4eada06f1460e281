//! Degrading multi-candidate queries.
//!
//! Callers ask for "as many members as possible, but no fewer than `min`".
//! The query tries `max` first and steps down one at a time until a count
//! succeeds or `min` has failed too.
//!
//! # State machine
//!
//! ```text
//! Trying(max) --ok--> Done(result)
//!     |
//!     +--NotEnoughMembers, n > min--> Trying(n - 1)
//!     +--NotEnoughMembers, n == min--> Failed(last error)
//!     +--any other error-----------> Failed(error)
//! ```

use tracing::trace;

use crate::error::{Error, Result};

/// Validated `[min, max]` bounds on the number of members to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRange {
    min: usize,
    max: usize,
}

impl QueryRange {
    /// Bounds with `1 <= min <= max`, else [`Error::InvalidRange`].
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min == 0 || min > max {
            return Err(Error::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// A range admitting exactly `count` members.
    pub fn exact(count: usize) -> Result<Self> {
        Self::new(count, count)
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// The range with `max` lowered to `limit`, or `None` if `limit < min`.
    ///
    /// Counts above the number of distinct members can never succeed, so
    /// trying them only burns time.
    pub fn capped(&self, limit: usize) -> Option<Self> {
        if limit < self.min {
            return None;
        }
        Some(Self {
            min: self.min,
            max: self.max.min(limit),
        })
    }

    /// Counts in the order they are tried: `max` down to `min`.
    pub fn counts(&self) -> impl Iterator<Item = usize> {
        (self.min..=self.max).rev()
    }
}

/// Run `query` for each count in `range` until one succeeds.
///
/// Only retryable errors (see [`Error::is_retryable`]) move on to the next
/// smaller count. Anything else, such as an unknown service, is returned
/// at once since no smaller count could succeed either.
pub fn degrade<T, F>(range: QueryRange, mut query: F) -> Result<T>
where
    F: FnMut(usize) -> Result<T>,
{
    let mut last = None;

    for count in range.counts() {
        match query(count) {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                trace!(count, error = %e, "query failed, trying fewer members");
                last = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last.unwrap_or(Error::InvalidRange {
        min: range.min,
        max: range.max,
    }))
}
