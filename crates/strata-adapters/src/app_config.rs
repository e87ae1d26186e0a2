//! Application configuration files.
//!
//! Declares packages, settings, layers and template filters for one
//! application, and replays them through a [`Configurator`].
//!
//! # Format
//!
//! ```toml
//! [packages]
//! app = "templates"            # relative to this file
//!
//! [settings]
//! "layer.custom" = "app:custom/"
//! extensions = ["pt"]
//!
//! [[layers]]
//! name = "page"
//! path = "app:page/"
//! description = "Base page templates"
//!
//! [[layers]]
//! name = "theme"
//! path = "app:theme/"
//! override = "page"
//!
//! [[filters]]
//! template = "page:actions"
//! name = "actions_filter"
//! note = "adds the action list"
//! ```
//!
//! Layers are declared in file order, so later overrides of the same layer
//! take precedence over earlier ones.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use strata_core::{
    application::{ApplicationError, Configurator, NewLayer, Settings, ports::Filesystem},
    domain::{LayerRegistry, NoteFilter},
    error::{StrataError, StrataResult},
};

/// Errors raised while reading an application configuration file.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl From<AppConfigError> for StrataError {
    fn from(e: AppConfigError) -> Self {
        ApplicationError::Configuration {
            message: e.to_string(),
        }
        .into()
    }
}

/// `[settings]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SettingsSection {
    /// Asset spec of the custom override directory.
    #[serde(rename = "layer.custom")]
    pub custom: Option<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// One `[[layers]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LayerSection {
    pub name: String,
    pub path: String,
    pub description: Option<String>,
    #[serde(rename = "override")]
    pub overrides: Option<String>,
}

/// One `[[filters]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    /// `layer:prefix` selector.
    pub template: String,
    pub name: String,
    pub note: Option<String>,
}

/// A parsed application configuration file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AppConfigFile {
    #[serde(default)]
    pub packages: BTreeMap<String, String>,
    #[serde(default)]
    pub settings: SettingsSection,
    #[serde(default)]
    pub layers: Vec<LayerSection>,
    #[serde(default)]
    pub filters: Vec<FilterSection>,

    #[serde(skip)]
    base_dir: PathBuf,
    #[serde(skip)]
    source: String,
}

impl AppConfigFile {
    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// A missing file, an unreadable file, or invalid TOML.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AppConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = fs::read_to_string(path).map_err(|source| AppConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let absolute = std::path::absolute(path).map_err(|source| AppConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let source = absolute
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let config = Self::parse(&raw, base_dir, source)?;
        debug!(
            layers = config.layers.len(),
            filters = config.filters.len(),
            "application config loaded"
        );
        Ok(config)
    }

    /// Parse TOML text; relative package roots and paths are resolved
    /// against `base_dir`, and `source` is recorded on declared filters.
    pub fn parse(
        raw: &str,
        base_dir: impl Into<PathBuf>,
        source: impl Into<String>,
    ) -> Result<Self, AppConfigError> {
        let base_dir = base_dir.into();
        let source = source.into();
        let mut config: Self = toml::from_str(raw).map_err(|e| AppConfigError::Parse {
            path: base_dir.join(&source),
            message: e.to_string(),
        })?;
        config.base_dir = base_dir;
        config.source = source;
        Ok(config)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Name filters declared here are reported under.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Configurator settings: packages rooted at the file's directory.
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::new(&self.base_dir).extensions(self.settings.extensions.clone());
        for (name, root) in &self.packages {
            settings = settings.package(name.as_str(), self.base_dir.join(root));
        }
        if let Some(custom) = &self.settings.custom {
            settings = settings.custom(custom.as_str());
        }
        settings
    }

    /// Declare every layer and filter of this file, in file order.
    pub fn apply(&self, configurator: &mut Configurator) -> StrataResult<()> {
        for layer in &self.layers {
            let mut new_layer = NewLayer::new(layer.name.as_str(), layer.path.as_str());
            new_layer.overrides = layer.overrides.clone();
            new_layer.description = layer.description.clone();
            configurator.add_layer_with(new_layer)?;
        }
        for filter in &self.filters {
            configurator.add_tmpl_filter_at(
                &filter.template,
                &filter.name,
                &self.source,
                NoteFilter(filter.note.clone()),
            )?;
        }
        Ok(())
    }

    /// Build and commit a registry from this file alone.
    #[instrument(skip_all, fields(source = %self.source))]
    pub fn registry(&self, filesystem: Arc<dyn Filesystem>) -> StrataResult<LayerRegistry> {
        self.registry_with(self.settings(), filesystem)
    }

    /// Like [`registry`](Self::registry) with adjusted settings.
    pub fn registry_with(
        &self,
        settings: Settings,
        filesystem: Arc<dyn Filesystem>,
    ) -> StrataResult<LayerRegistry> {
        let mut configurator = Configurator::new(settings, filesystem)?;
        self.apply(&mut configurator)?;
        let registry = configurator.commit()?;
        info!(layers = registry.len(), "registry built from configuration");
        Ok(registry)
    }
}
