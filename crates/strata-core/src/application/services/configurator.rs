//! Configurator - the registration API used at application start-up.
//!
//! Declarations are checked against the filesystem as soon as they are made,
//! then staged. Nothing becomes visible until [`Configurator::commit`] hands
//! back the immutable [`LayerRegistry`].

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{
        AssetSpec, FilterRegistration, FilterSelector, LayerDecl, LayerName, LayerRegistry,
        PackageRoots, RegistryBuilder, TemplateFilter, normalize_extension,
    },
    error::StrataResult,
};

/// Start-up settings for a [`Configurator`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Asset spec of the custom override directory (`layer.custom`).
    pub custom: Option<String>,
    /// Package roots for `package:subpath` asset specs.
    pub packages: PackageRoots,
    /// Renderer extensions tried for inexact template names.
    pub extensions: Vec<String>,
    /// Directory relative asset specs are resolved against.
    pub base_dir: PathBuf,
}

impl Settings {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    pub fn custom(mut self, spec: impl Into<String>) -> Self {
        self.custom = Some(spec.into());
        self
    }

    pub fn package(mut self, name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.packages.insert(name, root);
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

/// A layer declaration as written by application code or configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLayer {
    pub name: String,
    pub path: String,
    pub overrides: Option<String>,
    pub description: Option<String>,
}

impl NewLayer {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            overrides: None,
            description: None,
        }
    }

    pub fn overrides(mut self, target: impl Into<String>) -> Self {
        self.overrides = Some(target.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Registration API. Single owner, consumed by [`commit`](Self::commit).
pub struct Configurator {
    settings: Settings,
    filesystem: Arc<dyn Filesystem>,
    builder: RegistryBuilder,
}

impl Configurator {
    /// Create a configurator and stage the custom override directory.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error if `layer.custom` is set but does not
    /// name an existing directory, or if an extension is malformed.
    #[instrument(skip_all, fields(base_dir = %settings.base_dir.display()))]
    pub fn new(settings: Settings, filesystem: Arc<dyn Filesystem>) -> StrataResult<Self> {
        let extensions = settings
            .extensions
            .iter()
            .map(|e| normalize_extension(e))
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = RegistryBuilder::new();
        builder.extensions(extensions);

        let mut configurator = Self {
            settings,
            filesystem,
            builder,
        };
        if let Some(custom) = configurator.settings.custom.clone() {
            configurator.stage_custom(&custom)?;
        }
        Ok(configurator)
    }

    fn stage_custom(&mut self, spec: &str) -> StrataResult<()> {
        let dir = match self.resolve_dir(spec) {
            Some(dir) => dir,
            None => {
                return Err(ApplicationError::Configuration {
                    message: format!("layer.custom must name an existing directory: {spec}"),
                }
                .into());
            }
        };

        let prefix = if spec.ends_with('/') {
            spec.to_owned()
        } else {
            format!("{spec}/")
        };
        for sub in self.filesystem.list_dirs(&dir)? {
            if sub.starts_with('.') {
                continue;
            }
            let layer = match LayerName::new(sub.as_str()) {
                Ok(layer) => layer,
                Err(e) => {
                    warn!(dir = %sub, error = %e, "skipping custom directory");
                    continue;
                }
            };
            debug!(layer = %layer, "staging custom layer entry");
            self.builder.stage(LayerDecl::custom(
                layer,
                format!("{prefix}{sub}/"),
                dir.join(&sub),
            ));
        }
        info!(custom = %spec, "custom layer configured");
        Ok(())
    }

    /// Resolve `spec` to a directory, `None` if it is not one.
    fn resolve_dir(&self, spec: &str) -> Option<PathBuf> {
        let asset = AssetSpec::parse(spec, &self.settings.packages).ok()?;
        let path = asset
            .to_path(&self.settings.packages, &self.settings.base_dir)
            .ok()?;
        self.filesystem.is_dir(&path).then_some(path)
    }

    /// Declare a directory of templates for layer `name`.
    ///
    /// With `overrides = Some(target)`, the directory is placed ahead of
    /// `target`'s own entries instead.
    pub fn add_layer(
        &mut self,
        name: &str,
        path: &str,
        overrides: Option<&str>,
    ) -> StrataResult<&mut Self> {
        let mut layer = NewLayer::new(name, path);
        layer.overrides = overrides.map(str::to_owned);
        self.add_layer_with(layer)
    }

    /// Declare a layer with every option.
    ///
    /// # Errors
    ///
    /// Invalid names or asset specs, and paths that are not existing
    /// directories, fail immediately.
    #[instrument(skip_all, fields(layer = %layer.name, path = %layer.path))]
    pub fn add_layer_with(&mut self, layer: NewLayer) -> StrataResult<&mut Self> {
        let name = LayerName::new(layer.name.as_str())?;
        let asset = AssetSpec::parse(&layer.path, &self.settings.packages)?;
        let dir = asset.to_path(&self.settings.packages, &self.settings.base_dir)?;
        if !self.filesystem.is_dir(&dir) {
            return Err(ApplicationError::Configuration {
                message: format!(
                    "layer \"{}\": '{}' is not a directory ({})",
                    name,
                    layer.path,
                    dir.display()
                ),
            }
            .into());
        }

        let mut decl = match layer.overrides.as_deref() {
            Some(target) => LayerDecl::overriding(LayerName::new(target)?, &name, &layer.path, dir),
            None => LayerDecl::plain(name, &layer.path, dir),
        };
        if let Some(description) = layer.description {
            decl = decl.description(description);
        }

        if self.builder.stage(decl) {
            debug!("layer staged");
        }
        Ok(self)
    }

    /// Attach `filter` to templates matching `selector` (`layer:prefix`).
    ///
    /// The calling file is recorded as the filter's source.
    #[track_caller]
    pub fn add_tmpl_filter<F>(&mut self, selector: &str, name: &str, filter: F) -> StrataResult<&mut Self>
    where
        F: TemplateFilter + 'static,
    {
        let selector = FilterSelector::parse(selector)?;
        self.builder
            .add_filter(FilterRegistration::here(selector, name, Arc::new(filter)));
        Ok(self)
    }

    /// Like [`add_tmpl_filter`](Self::add_tmpl_filter) with an explicit source.
    pub fn add_tmpl_filter_at<F>(
        &mut self,
        selector: &str,
        name: &str,
        source: &str,
        filter: F,
    ) -> StrataResult<&mut Self>
    where
        F: TemplateFilter + 'static,
    {
        let selector = FilterSelector::parse(selector)?;
        self.builder
            .add_filter(FilterRegistration::new(selector, name, source, Arc::new(filter)));
        Ok(self)
    }

    /// Number of staged declarations.
    pub fn staged(&self) -> usize {
        self.builder.staged()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn base_dir(&self) -> &Path {
        &self.settings.base_dir
    }

    /// Publish the staged declarations.
    ///
    /// # Errors
    ///
    /// An override whose target layer has no entries of its own is a
    /// configuration error.
    #[instrument(skip_all)]
    pub fn commit(self) -> StrataResult<LayerRegistry> {
        if let Some((target, by)) = self.builder.dangling_overrides().into_iter().next() {
            return Err(ApplicationError::UnknownOverrideTarget {
                target: target.to_string(),
                by,
            }
            .into());
        }

        let registry = self.builder.build();
        info!(
            key = LayerRegistry::KEY,
            layers = registry.len(),
            filters = registry.filters().len(),
            "layer registry committed"
        );
        Ok(registry)
    }
}
