//! Template resolution against a committed [`LayerRegistry`].
//!
//! Resolution is a pure function of the registry and the files on disk: no
//! result is cached, and the registry never changes after commit.

use std::{fmt, path::PathBuf, sync::Arc};

use tracing::{debug, instrument, trace};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{LayerEntry, LayerName, LayerRegistry, TemplatePath, TemplateSelector},
    error::{StrataError, StrataResult},
};

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub layer: LayerName,
    /// Relative path of the file that matched, which may differ from the
    /// requested one in its extension.
    pub template: TemplatePath,
    pub path: PathBuf,
    /// Position of the winning entry in the layer's precedence order.
    pub entry_index: usize,
    pub entry_label: String,
}

impl ResolvedTemplate {
    /// The `layer:path` selector naming the file that matched.
    pub fn selector(&self) -> TemplateSelector {
        TemplateSelector {
            layer: self.layer.clone(),
            template: self.template.clone(),
        }
    }
}

impl fmt::Display for ResolvedTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.selector(), self.path.display())
    }
}

/// Resolves `(layer, relative path)` pairs to files.
#[derive(Clone)]
pub struct TemplateResolver {
    registry: Arc<LayerRegistry>,
    filesystem: Arc<dyn Filesystem>,
}

impl TemplateResolver {
    pub fn new(registry: Arc<LayerRegistry>, filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            registry,
            filesystem,
        }
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    /// Resolve `relative_path` exactly: the first entry of `layer` (custom
    /// entries first) containing that file wins.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::LayerNotFound`] for an unknown layer
    /// - [`DomainError::InvalidTemplatePath`](crate::domain::DomainError::InvalidTemplatePath)
    ///   for absolute or escaping paths
    /// - [`ApplicationError::TemplateNotFound`] when no entry has the file
    #[instrument(skip(self))]
    pub fn resolve(&self, layer: &str, relative_path: &str) -> StrataResult<PathBuf> {
        let (name, entries) = self.entries(layer)?;
        let template = TemplatePath::new(relative_path)?;

        for (index, entry) in entries.iter().enumerate() {
            if let Some(path) = self.probe(entry, &template) {
                debug!(entry = index, path = %path.display(), "template resolved");
                return Ok(path);
            }
        }
        Err(not_found(&name, relative_path))
    }

    /// Resolve a logical template name.
    ///
    /// For each entry in precedence order, the exact file is tried first and
    /// then the same name with each renderer extension of the registry, so
    /// `view.lt` can be answered by `view.pt`.
    #[instrument(skip(self))]
    pub fn resolve_template(&self, layer: &str, name: &str) -> StrataResult<ResolvedTemplate> {
        let (layer_name, entries) = self.entries(layer)?;
        let requested = TemplatePath::new(name)?;

        let mut candidates = vec![requested.clone()];
        for ext in self.registry.extensions() {
            if requested.extension() != Some(ext.as_str()) {
                candidates.push(requested.with_extension(ext));
            }
        }

        for (index, entry) in entries.iter().enumerate() {
            for candidate in &candidates {
                if let Some(path) = self.probe(entry, candidate) {
                    debug!(entry = index, path = %path.display(), "template resolved");
                    return Ok(ResolvedTemplate {
                        layer: layer_name,
                        template: candidate.clone(),
                        path,
                        entry_index: index,
                        entry_label: entry.label().to_owned(),
                    });
                }
            }
        }
        Err(not_found(&layer_name, name))
    }

    /// Resolve a `layer:name` selector with [`resolve_template`](Self::resolve_template).
    pub fn resolve_selector(&self, selector: &str) -> StrataResult<ResolvedTemplate> {
        let (layer, name) = TemplateSelector::split(selector)?;
        self.resolve_template(layer, name)
    }

    fn entries(&self, layer: &str) -> StrataResult<(LayerName, &[LayerEntry])> {
        let found = self
            .registry
            .layer(layer)
            .ok_or_else(|| ApplicationError::LayerNotFound {
                layer: layer.to_owned(),
            })?;
        Ok((found.name().clone(), found.entries()))
    }

    fn probe(&self, entry: &LayerEntry, template: &TemplatePath) -> Option<PathBuf> {
        let candidate = entry.path().join(template.to_path_buf());
        trace!(candidate = %candidate.display(), "probing");
        self.filesystem.is_file(&candidate).then_some(candidate)
    }
}

fn not_found(layer: &LayerName, template: &str) -> StrataError {
    ApplicationError::TemplateNotFound {
        template: format!("{layer}:{template}"),
    }
    .into()
}
