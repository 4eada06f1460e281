//! Routing destinations on the hash ring.
//!
//! A [`Member`] is an opaque token, usually `host:port`. Identity is the
//! string value itself.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Routing destination participating in a ring.
///
/// Backed by `Arc<str>` so the partition table can hold one entry per
/// partition without copying the string each time.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Member(Arc<str>);

impl Member {
    /// Construct a member from any string-like value.
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(Arc::from(token.as_ref()))
    }

    /// The member token.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Member({:?})", &*self.0)
    }
}

impl AsRef<str> for Member {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Member {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Member {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Member {
    fn from(token: String) -> Self {
        Self(Arc::from(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_member_equality_is_exact() {
        assert_eq!(Member::from("10.0.0.1:80"), Member::from(String::from("10.0.0.1:80")));
        assert_ne!(Member::from("a"), Member::from("A"));
        assert_ne!(Member::from("a"), Member::from("a "));
    }

    #[test]
    fn test_member_borrow_lookup() {
        let set: HashSet<Member> = ["a", "b"].into_iter().map(Member::from).collect();
        assert!(set.contains("a"));
        assert!(!set.contains("c"));
    }

    #[test]
    fn test_member_display_is_raw_token() {
        let member = Member::from("host:1");
        assert_eq!(member.to_string(), "host:1");
        assert_eq!(member.as_str(), "host:1");
        assert_eq!(format!("{member:?}"), "Member(\"host:1\")");
    }
}
