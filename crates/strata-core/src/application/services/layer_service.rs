//! Layer Service - inspection and customization use cases.
//!
//! Backs the `strata` CLI: listing layers, listing the templates each entry
//! contributes, and copying a resolved template out for local editing.

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem, services::resolver::TemplateResolver},
    domain::{EntryKind, LayerEntry, LayerName, LayerRegistry, TemplatePath, TemplateRef},
    error::StrataResult,
};

/// A layer, as shown by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerInfo {
    pub name: String,
    pub entries: Vec<EntryInfo>,
}

/// One entry of a layer. `templates` is only filled by template listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    pub label: String,
    pub spec: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<TemplateInfo>,
}

/// A logical template and the extensions it exists with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    /// Relative path without extension.
    pub name: String,
    /// Extensions with their leading dot, sorted.
    pub extensions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterInfo>,
}

/// A filter matching a listed template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterInfo {
    pub source: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl fmt::Display for FilterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}: {})", self.source, self.name)?;
        if let Some(note) = &self.note {
            write!(f, " {note}")?;
        }
        Ok(())
    }
}

/// `actions: .pt (app.rs: actions_filter)`
impl fmt::Display for TemplateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.extensions.is_empty() {
            write!(f, ": {}", self.extensions.join(", "))?;
        }
        for filter in &self.filters {
            write!(f, " {filter}")?;
        }
        Ok(())
    }
}

impl fmt::Display for EntryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)?;
        if !self.label.is_empty() {
            write!(f, " [{}]", self.label)?;
        }
        if let Some(description) = &self.description {
            write!(f, " - {description}")?;
        }
        Ok(())
    }
}

/// Service for listing and customizing templates.
pub struct LayerService {
    resolver: TemplateResolver,
    filesystem: Arc<dyn Filesystem>,
}

impl LayerService {
    pub fn new(registry: Arc<LayerRegistry>, filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            resolver: TemplateResolver::new(registry, Arc::clone(&filesystem)),
            filesystem,
        }
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    fn registry(&self) -> &LayerRegistry {
        self.resolver.registry()
    }

    /// Layers in registration order, restricted to `names` when non-empty.
    pub fn list_layers(&self, names: &[String]) -> Vec<LayerInfo> {
        self.selected(names)
            .map(|(name, entries)| LayerInfo {
                name: name.to_string(),
                entries: entries.iter().map(entry_info).collect(),
            })
            .collect()
    }

    /// Like [`list_layers`](Self::list_layers), with every entry's templates
    /// and the filters that match them.
    #[instrument(skip(self))]
    pub fn list_templates(&self, names: &[String]) -> StrataResult<Vec<LayerInfo>> {
        let mut layers = Vec::new();
        for (name, entries) in self.selected(names) {
            let mut infos = Vec::with_capacity(entries.len());
            for entry in entries {
                let mut info = entry_info(entry);
                info.templates = self.discover(name, entry)?;
                infos.push(info);
            }
            layers.push(LayerInfo {
                name: name.to_string(),
                entries: infos,
            });
        }
        Ok(layers)
    }

    fn selected<'a>(
        &'a self,
        names: &'a [String],
    ) -> impl Iterator<Item = (&'a LayerName, &'a [LayerEntry])> + 'a {
        self.registry()
            .layers()
            .filter(move |(name, _)| names.is_empty() || names.iter().any(|n| n == name.as_str()))
    }

    fn discover(&self, layer: &LayerName, entry: &LayerEntry) -> StrataResult<Vec<TemplateInfo>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for file in self.filesystem.list_files(entry.path())? {
            let path = match TemplatePath::new(file.to_string_lossy()) {
                Ok(path) => path,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "skipping file");
                    continue;
                }
            };
            if path.file_name().starts_with('.') {
                continue;
            }
            let extensions = grouped.entry(path.logical_name().to_owned()).or_default();
            if let Some(ext) = path.extension() {
                extensions.push(format!(".{ext}"));
            }
        }

        let registry = self.registry();
        Ok(grouped
            .into_iter()
            .map(|(name, mut extensions)| {
                extensions.sort();
                extensions.dedup();
                let template = TemplateRef {
                    layer,
                    logical_name: &name,
                    entry_dir: entry.path(),
                };
                let filters = registry
                    .filters_for(layer, &name)
                    .map(|f| FilterInfo {
                        source: f.source().to_owned(),
                        name: f.name().to_owned(),
                        note: f.annotate(&template),
                    })
                    .collect();
                TemplateInfo {
                    name,
                    extensions,
                    filters,
                }
            })
            .collect())
    }

    /// Copy the template named by `selector` (`layer:path`) into `dest_dir`.
    ///
    /// The copy keeps the resolved file's name, so a request for `view.lt`
    /// answered by `view.pt` lands as `dest_dir/view.pt`.
    ///
    /// # Errors
    ///
    /// Checked in order: malformed selector, unknown layer, unresolved
    /// template, missing destination directory, destination that is the
    /// template itself (even with `force`), existing copy without `force`.
    #[instrument(skip(self), fields(dest = %dest_dir.display()))]
    pub fn customize(&self, selector: &str, dest_dir: &Path, force: bool) -> StrataResult<PathBuf> {
        let resolved = self.resolver.resolve_selector(selector)?;
        debug!(source = %resolved.path.display(), "template located");

        if !self.filesystem.is_dir(dest_dir) {
            return Err(ApplicationError::DestinationNotFound {
                path: dest_dir.to_path_buf(),
            }
            .into());
        }

        let target = dest_dir.join(resolved.template.file_name());
        if self.filesystem.exists(&target) {
            if self.filesystem.same_file(&resolved.path, &target) {
                return Err(ApplicationError::CopyOntoSource { path: target }.into());
            }
            if !force {
                return Err(ApplicationError::AlreadyCustomized { path: target }.into());
            }
        }

        self.filesystem.copy_file(&resolved.path, &target)?;
        info!(
            template = %resolved,
            target = %target.display(),
            "template customized"
        );
        Ok(target)
    }
}

fn entry_info(entry: &LayerEntry) -> EntryInfo {
    EntryInfo {
        label: entry.label().to_owned(),
        spec: entry.spec().to_owned(),
        path: entry.path().to_path_buf(),
        kind: entry.kind(),
        description: entry.description().map(str::to_owned),
        templates: Vec::new(),
    }
}
