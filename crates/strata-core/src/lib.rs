//! Strata Core - template layers with overrides
//!
//! A *layer* is a named, ordered list of directories that supply templates.
//! Applications declare layers and overrides through the [`Configurator`],
//! commit them into an immutable [`LayerRegistry`], and resolve templates
//! through the [`TemplateResolver`].
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           strata-cli (CLI)              │
//! │    list layers / templates, customize   │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (Configurator, TemplateResolver,        │
//! │  LayerService)                          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │            (Filesystem)                 │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    strata-adapters (Infrastructure)     │
//! │ (LocalFilesystem, MemoryFilesystem,     │
//! │  AppConfigFile)                         │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (LayerRegistry, LayerEntry, filters)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use strata_core::prelude::*;
//!
//! let settings = Settings::new("/srv/app").package("myapp", "/srv/app/myapp");
//! let mut config = Configurator::new(settings, filesystem.clone())?;
//! config.add_layer("page", "myapp:templates/page", None)?;
//! config.add_layer("page", "myapp:themes/dark", Some("page"))?;
//!
//! let registry = Arc::new(config.commit()?);
//! let resolver = TemplateResolver::new(registry, filesystem);
//! let path = resolver.resolve("page", "view.pt")?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Configurator, LayerService, NewLayer, ResolvedTemplate, Settings, TemplateResolver,
        ports::Filesystem,
    };
    pub use crate::domain::{
        EntryKind, FilterRegistration, LayerEntry, LayerName, LayerRegistry, NoteFilter,
        TemplateFilter, TemplatePath, TemplateRef,
    };
    pub use crate::error::{StrataError, StrataResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
