//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `strata-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::error::StrataResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `strata_adapters::filesystem::LocalFilesystem` (production)
/// - `strata_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Existence checks return `bool`; a path that cannot be inspected counts
///   as missing
/// - Listings are sorted so resolution and output stay deterministic
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Check if anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Names of the immediate subdirectories of `dir`, sorted.
    fn list_dirs(&self, dir: &Path) -> StrataResult<Vec<String>>;

    /// Every file below `dir`, recursively, relative to `dir`, sorted.
    fn list_files(&self, dir: &Path) -> StrataResult<Vec<PathBuf>>;

    /// Check if `a` and `b` name the same existing file.
    fn same_file(&self, a: &Path, b: &Path) -> bool;

    /// Copy the file at `from` to `to`, replacing `to` if it exists.
    fn copy_file(&self, from: &Path, to: &Path) -> StrataResult<()>;
}
