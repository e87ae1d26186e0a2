//! Application layer for Strata.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (Configurator, TemplateResolver, LayerService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer drives the domain model against the filesystem port.
//! Ordering and precedence rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    Configurator, EntryInfo, FilterInfo, LayerInfo, LayerService, NewLayer, ResolvedTemplate,
    Settings, TemplateInfo, TemplateResolver,
};

// Re-export port traits (for adapter implementation)
pub use ports::Filesystem;

pub use error::ApplicationError;
