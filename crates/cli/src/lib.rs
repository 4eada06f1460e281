//! Support code for the `keyrouter` binary.
//!
//! - [`config`] parses the TOML services file
//! - [`loader`] applies a services file to a [`registry::Registry`]

pub mod config;
pub mod loader;

pub use config::{ServiceEntry, ServicesConfig};
pub use loader::load_services;
