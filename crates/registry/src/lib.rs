//! Service registry for keyrouter.
//!
//! This crate maps service names to their own hash rings:
//! - Applying full desired member lists as minimal diffs
//! - Resolving a service by name for lookups
//! - Degrading queries that settle for fewer members down to a floor

pub mod error;
pub mod query;
pub mod registry;

pub use error::{Error, Result};
pub use query::{degrade, QueryRange};
pub use registry::{Registry, Service, ServiceSnapshot};
