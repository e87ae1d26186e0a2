//! Action handlers.
//!
//! Each handler translates parsed arguments into calls on the core
//! [`LayerService`] and renders the result. No business logic lives here.

use std::{path::Path, sync::Arc};

use tracing::{debug, instrument};

use strata_adapters::{AppConfigError, AppConfigFile, LocalFilesystem};
use strata_core::application::{LayerService, ports::Filesystem};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

pub mod customize;
pub mod list;

/// Load the application configuration file and build the layer service
/// over the local filesystem.
#[instrument(skip(config))]
pub fn load_service(config_file: &Path, config: &AppConfig) -> CliResult<LayerService> {
    let file = AppConfigFile::load(config_file).map_err(|e| config_error(config_file, e))?;

    let mut settings = file.settings();
    if settings.extensions.is_empty() {
        settings = settings.extensions(config.templates.extensions.iter().cloned());
    }

    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let registry = file.registry_with(settings, Arc::clone(&filesystem))?;
    debug!(layers = registry.len(), "registry ready");

    Ok(LayerService::new(Arc::new(registry), filesystem))
}

fn config_error(path: &Path, e: AppConfigError) -> CliError {
    CliError::ConfigError {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}
