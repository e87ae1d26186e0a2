// ============================================================================
// domain/error.rs - DOMAIN VALIDATION ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (registries and listings are built from borrowed data)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// A `layer:path` selector without the separating colon.
    #[error("Template format is wrong.")]
    InvalidSelector { selector: String },

    #[error("Invalid layer name '{name}': {reason}")]
    InvalidLayerName { name: String, reason: String },

    #[error("Invalid template path '{path}': {reason}")]
    InvalidTemplatePath { path: String, reason: String },

    #[error("Invalid asset specification '{spec}': {reason}")]
    InvalidAssetSpec { spec: String, reason: String },

    #[error("Invalid renderer extension '{extension}'")]
    InvalidExtension { extension: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidSelector { selector } => vec![
                format!("'{}' is missing the layer separator", selector),
                "Templates are addressed as <layer>:<relative path>".into(),
                "Example: page:view.pt".into(),
            ],
            Self::InvalidLayerName { name, reason } => vec![
                format!("Layer name '{}' {}", name, reason),
                "Use letters, digits, '-', '_' or '.'".into(),
            ],
            Self::InvalidTemplatePath { .. } => vec![
                "Template paths are relative to a layer directory".into(),
                "Absolute paths and '..' components are not allowed".into(),
            ],
            Self::InvalidAssetSpec { .. } => vec![
                "Use <package>:<subpath> or a plain directory path".into(),
                "Declare packages in the [packages] table".into(),
            ],
            Self::InvalidExtension { .. } => {
                vec!["Extensions are given without the leading dot, e.g. \"pt\"".into()]
            }
        }
    }
}

