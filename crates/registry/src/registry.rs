//! Named services, each backed by its own hash ring.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use corelib::{Delta, HashRing, Member, RingConfig, XxHash64};
use metrics::counter;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::query::{degrade, QueryRange};

/// A named routing table.
#[derive(Debug, Clone)]
pub struct Service {
    name: String,
    ring: HashRing,
}

impl Service {
    fn new(name: &str, ring: HashRing) -> Self {
        Self {
            name: name.to_owned(),
            ring,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ring(&self) -> &HashRing {
        &self.ring
    }
}

/// Point-in-time view of one service's membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSnapshot {
    pub name: String,
    pub members: Vec<Member>,
}

/// Process-wide table of services.
///
/// One reader/writer lock guards the map and every ring in it. Lookups share
/// the read side; membership updates take the write side and redistribute
/// while holding it, so a lookup never observes a half-built partition table.
///
/// # Example
///
/// ```rust
/// use corelib::Member;
/// use registry::Registry;
///
/// let registry = Registry::new();
/// registry
///     .populate_service("foo", ["a", "b", "c"].map(Member::from))
///     .unwrap();
///
/// let targets = registry.lookup("foo", b"key", 2, 3).unwrap();
/// assert_eq!(targets.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    ring_config: RingConfig,
    services: RwLock<HashMap<String, Service>>,
}

impl Registry {
    /// Registry whose rings use the default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose rings use `config`.
    pub fn with_ring_config(config: RingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ring_config: config,
            services: RwLock::new(HashMap::new()),
        })
    }

    /// Make `members` the full membership of service `name`.
    ///
    /// Creates the service on first use. Additions are applied before
    /// removals. If any operation fails the update stops there; the changes
    /// already made stay in place for the next reload to finish.
    pub fn populate_service<I>(&self, name: &str, members: I) -> Result<Delta>
    where
        I: IntoIterator<Item = Member>,
    {
        let mut services = self.services.write();

        let service = match services.entry(name.to_owned()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let ring = HashRing::with_config(self.ring_config, XxHash64)?;
                debug!(service = name, "creating service");
                entry.insert(Service::new(name, ring))
            }
        };

        let delta = service.ring.set(members).map_err(|source| {
            warn!(service = name, error = %source, "membership update failed");
            Error::Populate {
                service: name.to_owned(),
                source,
            }
        })?;

        if !delta.is_empty() {
            info!(
                service = name,
                added = delta.added.len(),
                removed = delta.removed.len(),
                members = service.ring.member_count(),
                "service membership updated"
            );
            counter!("keyrouter_members_added_total").increment(delta.added.len() as u64);
            counter!("keyrouter_members_removed_total").increment(delta.removed.len() as u64);
        }

        Ok(delta)
    }

    /// Between `min` and `max` distinct members for `key`, as many as possible.
    ///
    /// # Errors
    ///
    /// - [`Error::ServiceNotFound`] if `name` was never populated, whatever the range
    /// - [`Error::InvalidRange`] before any ring access if `min == 0` or `min > max`
    /// - [`Error::Ring`] with `NotEnoughMembers` if even `min` is too many
    pub fn lookup(&self, name: &str, key: &[u8], min: usize, max: usize) -> Result<Vec<Member>> {
        let services = self.services.read();
        let result = match services.get(name) {
            Some(service) => Self::lookup_in(service, key, min, max),
            None => Err(Error::ServiceNotFound(name.to_owned())),
        };
        drop(services);

        counter!("keyrouter_lookups_total").increment(1);
        if let Err(e) = &result {
            debug!(service = name, error = %e, "lookup failed");
            counter!("keyrouter_lookup_failures_total").increment(1);
        }
        result
    }

    fn lookup_in(service: &Service, key: &[u8], min: usize, max: usize) -> Result<Vec<Member>> {
        let range = QueryRange::new(min, max)?;
        let available = service.ring.member_count();
        match range.capped(available) {
            Some(range) => degrade(range, |count| Ok(service.ring.get(key, count)?)),
            None => Err(Error::Ring(corelib::Error::NotEnoughMembers {
                requested: range.min(),
                available,
            })),
        }
    }

    /// Exactly `count` distinct members for `key`.
    pub fn get(&self, name: &str, key: &[u8], count: usize) -> Result<Vec<Member>> {
        self.lookup(name, key, count, count)
    }

    /// Every service and its members, sorted by service name.
    pub fn services(&self) -> Vec<ServiceSnapshot> {
        let services = self.services.read();
        let mut snapshots: Vec<ServiceSnapshot> = services
            .values()
            .map(|s| ServiceSnapshot {
                name: s.name.clone(),
                members: s.ring.members().cloned().collect(),
            })
            .collect();
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }

    /// Members of one service in lexical order.
    pub fn members(&self, name: &str) -> Result<Vec<Member>> {
        self.services
            .read()
            .get(name)
            .map(|s| s.ring.members().cloned().collect())
            .ok_or_else(|| Error::ServiceNotFound(name.to_owned()))
    }

    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(tokens: &[&str]) -> Vec<Member> {
        tokens.iter().copied().map(Member::from).collect()
    }

    fn small_registry() -> Registry {
        Registry::with_ring_config(RingConfig {
            partition_count: 271,
            replication_factor: 20,
            load: 1.25,
        })
        .unwrap()
    }

    #[test]
    fn test_populate_creates_service_lazily() {
        let registry = small_registry();
        assert!(registry.is_empty());

        let delta = registry.populate_service("foo", members(&["a", "b"])).unwrap();
        assert_eq!(delta.added.len(), 2);
        assert!(delta.removed.is_empty());
        assert!(registry.contains("foo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_populate_same_list_is_noop() {
        let registry = small_registry();
        registry.populate_service("foo", members(&["a", "b"])).unwrap();
        let delta = registry.populate_service("foo", members(&["b", "a", "a"])).unwrap();
        assert!(delta.is_empty());
    }

    #[test]
    fn test_populate_with_empty_list_keeps_service() {
        let registry = small_registry();
        registry.populate_service("foo", members(&["a"])).unwrap();
        registry.populate_service("foo", Vec::new()).unwrap();

        assert!(registry.contains("foo"));
        assert!(registry.members("foo").unwrap().is_empty());
        let err = registry.lookup("foo", b"k", 1, 1).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_invalid_ring_config_rejected() {
        let err = Registry::with_ring_config(RingConfig {
            partition_count: 0,
            ..RingConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Ring(corelib::Error::InvalidConfig(_))));
    }

    #[test]
    fn test_low_load_populate_fails() {
        let registry = Registry::with_ring_config(RingConfig {
            partition_count: 100,
            replication_factor: 10,
            load: 0.5,
        })
        .unwrap();

        let err = registry.populate_service("foo", members(&["a", "b"])).unwrap_err();
        assert!(matches!(
            err,
            Error::Populate {
                source: corelib::Error::RedistributionInvariantViolation { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_services_snapshot_sorted() {
        let registry = small_registry();
        registry.populate_service("foo", members(&["c", "a", "b"])).unwrap();
        registry.populate_service("bar", members(&["1", "2", "3"])).unwrap();

        let snapshots = registry.services();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].name, "bar");
        assert_eq!(snapshots[1].name, "foo");
        assert_eq!(snapshots[1].members, members(&["a", "b", "c"]));
        assert_eq!(registry.service_names(), vec!["bar", "foo"]);
    }
}
