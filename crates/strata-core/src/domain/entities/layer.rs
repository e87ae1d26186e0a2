//! Layer entries and the declarations that produce them.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::value_objects::LayerName;

/// Label carried by entries contributed by the custom override directory.
pub const CUSTOM_LABEL: &str = "layer_custom";

/// How an entry was contributed; decides where it sits in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// From the custom override directory. Always consulted first.
    Custom,
    /// Declared with an `override` target. Newest first, ahead of plain entries.
    Override,
    /// An ordinary directory of the layer. Registration order.
    Plain,
}

/// One directory contributing templates to a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerEntry {
    label: String,
    spec: String,
    path: PathBuf,
    description: Option<String>,
    kind: EntryKind,
    parent: Option<usize>,
}

impl LayerEntry {
    /// Originating source identifier (`""` for plain entries).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Asset specification as it was written.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Absolute directory, verified when the entry was declared.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Index, within the same layer, of the entry this one directly shadows.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<usize>) {
        self.parent = parent;
    }
}

/// A staged layer declaration, produced by the configurator after the path
/// has been resolved and checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerDecl {
    /// Registry key the entry lands under.
    pub layer: LayerName,
    pub label: String,
    pub spec: String,
    pub path: PathBuf,
    pub description: Option<String>,
    pub kind: EntryKind,
}

impl LayerDecl {
    pub fn plain(layer: LayerName, spec: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            layer,
            label: String::new(),
            spec: spec.into(),
            path: path.into(),
            description: None,
            kind: EntryKind::Plain,
        }
    }

    /// An entry declared by layer `by` that overrides `target`.
    pub fn overriding(
        target: LayerName,
        by: &LayerName,
        spec: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            layer: target,
            label: by.as_str().to_owned(),
            spec: spec.into(),
            path: path.into(),
            description: None,
            kind: EntryKind::Override,
        }
    }

    pub fn custom(layer: LayerName, spec: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            layer,
            label: CUSTOM_LABEL.to_owned(),
            spec: spec.into(),
            path: path.into(),
            description: None,
            kind: EntryKind::Custom,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Two declarations are duplicates when they would yield the same entry.
    pub(crate) fn same_entry(&self, other: &Self) -> bool {
        self.layer == other.layer
            && self.label == other.label
            && self.path == other.path
            && self.kind == other.kind
    }

    pub(crate) fn into_entry(self) -> LayerEntry {
        LayerEntry {
            label: self.label,
            spec: self.spec,
            path: self.path,
            description: self.description,
            kind: self.kind,
            parent: None,
        }
    }
}
