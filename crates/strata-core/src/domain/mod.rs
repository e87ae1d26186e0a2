// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Strata.
//!
//! This module contains the pure layering model with no I/O. Resolving asset
//! specs against the disk, checking directories and reading files are handled
//! via ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem or external calls
//! - **Immutable snapshot**: [`LayerRegistry`] never changes after `build()`
//! - **Validated values**: names, paths and selectors are checked on construction

pub mod entities;
pub mod error;
pub mod value_objects;

pub use entities::{
    CUSTOM_LABEL, DEFAULT_EXTENSION, EntryKind, FilterRegistration, Layer, LayerDecl, LayerEntry,
    LayerRegistry, NoteFilter, RegistryBuilder, TemplateFilter, TemplateRef,
};

pub use error::DomainError;

pub use value_objects::{
    AssetSpec, FilterSelector, LayerName, PackageRoots, TemplatePath, TemplateSelector,
    normalize_extension,
};
