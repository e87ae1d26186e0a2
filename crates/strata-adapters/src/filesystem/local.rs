//! Local filesystem adapter using std::fs and walkdir.

use std::io;
use std::path::{Path, PathBuf};

use strata_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{StrataError, StrataResult},
};
use tracing::trace;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dirs(&self, dir: &Path) -> StrataResult<Vec<String>> {
        let read_dir = std::fs::read_dir(dir).map_err(|e| map_io_error(dir, e, "read directory"))?;

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| map_io_error(dir, e, "read directory entry"))?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn list_files(&self, dir: &Path) -> StrataResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for walk_entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
            let walk_entry = walk_entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                let reason = match e.into_io_error() {
                    Some(io) => format!("Failed to walk directory: {io}"),
                    None => "Failed to walk directory: filesystem loop".to_owned(),
                };
                StrataError::from(ApplicationError::FilesystemError { path, reason })
            })?;
            if !walk_entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = walk_entry.path().strip_prefix(dir) {
                trace!(file = %relative.display(), "discovered");
                files.push(relative.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }

    fn same_file(&self, a: &Path, b: &Path) -> bool {
        match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn copy_file(&self, from: &Path, to: &Path) -> StrataResult<()> {
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(to, e, "copy file"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> StrataError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
