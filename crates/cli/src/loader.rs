//! Apply a services file to a registry.

use std::path::Path;

use anyhow::Context;
use registry::Registry;
use tracing::debug;

use crate::config::ServicesConfig;

/// Read `path` and populate every service it lists, in file order.
///
/// Stops at the first service that fails. Services already updated stay
/// updated. Services absent from the file are left untouched.
pub fn load_services(registry: &Registry, path: &Path) -> anyhow::Result<usize> {
    let config = ServicesConfig::load(path)?;

    for service in &config.services {
        debug!(service = %service.name, "populating service");
        let delta = registry
            .populate_service(&service.name, service.members())
            .with_context(|| format!("error updating service {}", service.name))?;

        if !delta.added.is_empty() {
            debug!(service = %service.name, added = ?delta.added, "members added");
        }
        if !delta.removed.is_empty() {
            debug!(service = %service.name, removed = ?delta.removed, "members removed");
        }
    }

    Ok(config.services.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::Member;
    use std::path::PathBuf;

    fn write(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("services.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_populates_registry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "[[services]]\nname = \"foo\"\nnodes = [\"a\", \"b\", \"c\"]\n\n\
             [[services]]\nname = \"bar\"\nnodes = [\"1\"]\n",
        );

        let registry = Registry::new();
        assert_eq!(load_services(&registry, &path).unwrap(), 2);
        assert_eq!(registry.service_names(), vec!["bar", "foo"]);
        assert_eq!(registry.lookup("foo", b"k", 3, 3).unwrap().len(), 3);
    }

    #[test]
    fn test_reload_applies_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[[services]]\nname = \"foo\"\nnodes = [\"a\", \"b\", \"c\"]\n");
        let registry = Registry::new();
        load_services(&registry, &path).unwrap();

        write(&dir, "[[services]]\nname = \"foo\"\nnodes = [\"a\", \"d\"]\n");
        load_services(&registry, &path).unwrap();

        assert_eq!(
            registry.members("foo").unwrap(),
            vec![Member::from("a"), Member::from("d")]
        );
    }

    #[test]
    fn test_failed_reload_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[[services]]\nname = \"foo\"\nnodes = [\"a\", \"b\"]\n");
        let registry = Registry::new();
        load_services(&registry, &path).unwrap();

        write(&dir, "[[services]\nthis is not toml");
        assert!(load_services(&registry, &path).is_err());

        assert_eq!(registry.members("foo").unwrap().len(), 2);
        assert_eq!(registry.lookup("foo", b"k", 2, 2).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new();
        assert!(load_services(&registry, &dir.path().join("missing.toml")).is_err());
        assert!(registry.is_empty());
    }
}
