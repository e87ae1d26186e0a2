//! Application layer errors.
//!
//! These errors represent failures while configuring layers or looking
//! templates up, not malformed values. Value errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during configuration, resolution and customization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// Fatal configuration problem detected at start-up.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// An override names a layer that was never declared.
    #[error("Layer \"{by}\" overrides unknown layer \"{target}\"")]
    UnknownOverrideTarget { target: String, by: String },

    #[error("Layer \"{layer}\" could not be found.")]
    LayerNotFound { layer: String },

    /// `template` is the `layer:path` that was searched.
    #[error("Template \"{template}\" could not be found.")]
    TemplateNotFound { template: String },

    #[error("Destination directory is not found.")]
    DestinationNotFound { path: PathBuf },

    #[error("Template is already customized at {path}")]
    AlreadyCustomized { path: PathBuf },

    /// The destination file is the template being customized.
    #[error("Template at {path} would be copied onto itself")]
    CopyOntoSource { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check the layer paths and the layer.custom setting".into(),
            ],
            Self::UnknownOverrideTarget { target, .. } => vec![
                format!("Declare layer '{}' before overriding it", target),
                "Or remove the override setting".into(),
            ],
            Self::LayerNotFound { .. } => vec!["List registered layers: strata <CONFIG> -l".into()],
            Self::TemplateNotFound { .. } => {
                vec!["List templates per layer: strata <CONFIG> -lt".into()]
            }
            Self::DestinationNotFound { path } => vec![
                format!("'{}' does not exist or is not a directory", path.display()),
                "Create the directory first".into(),
            ],
            Self::AlreadyCustomized { .. } => vec![
                "Use --force to overwrite the existing copy".into(),
                "Or edit the existing copy directly".into(),
            ],
            Self::CopyOntoSource { path } => vec![
                format!("'{}' is the template itself", path.display()),
                "Choose a destination outside the layer directory".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check file permissions".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration { .. } | Self::UnknownOverrideTarget { .. } => {
                ErrorCategory::Configuration
            }
            Self::LayerNotFound { .. }
            | Self::TemplateNotFound { .. }
            | Self::DestinationNotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyCustomized { .. } | Self::CopyOntoSource { .. } => {
                ErrorCategory::Validation
            }
            Self::FilesystemError { .. } => ErrorCategory::Internal,
        }
    }
}
