//! Membership differ.
//!
//! Turns "this is now the full desired list" into the minimal set of
//! additions and removals, so a ring only redistributes for real changes.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::member::Member;

/// Set difference between a desired and a current membership.
///
/// Both sets are ordered so that applying them is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Delta {
    /// `want - have`.
    pub added: BTreeSet<Member>,
    /// `have - want`.
    pub removed: BTreeSet<Member>,
}

impl Delta {
    /// True if the two memberships were already equal.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute `added = want - have` and `removed = have - want`.
///
/// Duplicates in either input collapse; comparison is exact string equality.
pub fn difference<W, H>(want: W, have: H) -> Delta
where
    W: IntoIterator<Item = Member>,
    H: IntoIterator<Item = Member>,
{
    let want: BTreeSet<Member> = want.into_iter().collect();
    let have: BTreeSet<Member> = have.into_iter().collect();

    Delta {
        added: want.difference(&have).cloned().collect(),
        removed: have.difference(&want).cloned().collect(),
    }
}
