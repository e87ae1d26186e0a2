//! Infrastructure adapters for Strata.
//!
//! This crate implements the ports defined in `strata-core::application::ports`
//! and loads application configuration files into a committed registry.
//! It contains all external dependencies and I/O operations.

pub mod app_config;
pub mod filesystem;

// Re-export commonly used adapters
pub use app_config::{AppConfigError, AppConfigFile};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
