//! TOML services file.
//!
//! ```toml
//! [[services]]
//! name = "foo"
//! nodes = ["10.0.0.1:8545", "10.0.0.2:8545"]
//! ```

use std::path::Path;

use anyhow::Context;
use corelib::Member;
use serde::Deserialize;

/// Top-level services file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// `[[services]]` tables in file order.
    pub services: Vec<ServiceEntry>,
}

/// One `[[services]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEntry {
    #[serde(alias = "Name")]
    pub name: String,
    /// Member tokens. Duplicates are collapsed by the ring.
    #[serde(default, alias = "Nodes")]
    pub nodes: Vec<String>,
}

impl ServiceEntry {
    pub fn members(&self) -> impl Iterator<Item = Member> + '_ {
        self.nodes.iter().map(|n| Member::from(n.as_str()))
    }
}

impl ServicesConfig {
    /// Read and parse the services file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read services file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid services file {}", path.display()))
    }

    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
