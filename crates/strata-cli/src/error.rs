//! Error handling for the Strata CLI.
//!
//! Provides structured errors with:
//! - The core's verbatim user-facing messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use std::{error::Error, path::PathBuf};

use owo_colors::OwoColorize;
use thiserror::Error;

use strata_core::{application::ApplicationError, domain::DomainError, error::StrataError};

// Re-export so callers only need `use crate::error::*`.
pub use strata_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input that clap could not catch.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The application configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    ConfigError {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error propagated from `strata-core`; displayed unchanged.
    #[error(transparent)]
    Core(#[from] StrataError),

    /// Writing output failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::ConfigError { path, .. } => {
                let mut suggestions = Vec::new();
                if let Some(path) = path {
                    suggestions.push(format!("Check the file at {}", path.display()));
                }
                suggestions.push("Layers are declared as [[layers]] with name and path".into());
                suggestions
            }

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check that stdout is writable".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Verbatim answer to a customize request that found nothing.
    ///
    /// These lines are the command's result and belong on stdout; the rest
    /// of the report (causes, hints) still goes to stderr.
    pub fn outcome(&self) -> Option<String> {
        let Self::Core(core) = self else {
            return None;
        };
        match core {
            StrataError::Domain(DomainError::InvalidSelector { .. })
            | StrataError::Application(
                ApplicationError::LayerNotFound { .. }
                | ApplicationError::TemplateNotFound { .. }
                | ApplicationError::DestinationNotFound { .. },
            ) => Some(core.to_string()),
            _ => None,
        }
    }

    /// Render the stderr report: the message (unless it is an
    /// [`outcome`](Self::outcome)), the cause chain when `verbose`, then one
    /// `hint:` line per suggestion.
    pub fn render(&self, verbose: bool, colored: bool) -> String {
        let mut out = String::new();

        if self.outcome().is_none() {
            if colored {
                out.push_str(&format!("{} {}\n", "error:".red().bold(), self.to_string().red()));
            } else {
                out.push_str(&format!("error: {self}\n"));
            }
        }

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                if colored {
                    out.push_str(&format!("  {}\n", format!("caused by: {err}").dimmed()));
                } else {
                    out.push_str(&format!("  caused by: {err}\n"));
                }
                cause = err.source();
            }
        }

        let hint = if colored {
            "hint:".yellow().bold().to_string()
        } else {
            "hint:".to_owned()
        };
        for suggestion in self.suggestions() {
            out.push_str(&format!("{hint} {suggestion}\n"));
        }

        out
    }

    /// Emit the error as a tracing event at a level matching its category.
    pub fn log(&self) {
        let exit_code = self.exit_code();
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(exit_code, "{self}");
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(exit_code, "{self}");
            }
        }
        if let Some(source) = self.source() {
            tracing::debug!(cause = %source, "error source");
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}
