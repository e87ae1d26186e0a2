//! Layer registry: staged by [`RegistryBuilder`], published as an immutable
//! [`LayerRegistry`].
//!
//! # Precedence
//!
//! Inside one layer, entries are ordered
//!
//! ```text
//! [custom entries] ++ [override entries, newest first] ++ [plain entries, oldest first]
//! ```
//!
//! and the first entry containing a template wins. Every override and custom
//! entry points at the entry it directly shadows through
//! [`LayerEntry::parent`].

use std::collections::HashMap;

use tracing::debug;

use super::filter::FilterRegistration;
use super::layer::{EntryKind, LayerDecl, LayerEntry};
use crate::domain::value_objects::LayerName;

/// Renderer extension tried when a template name has no exact match.
pub const DEFAULT_EXTENSION: &str = "pt";

/// One layer and its entries in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    name: LayerName,
    entries: Vec<LayerEntry>,
}

impl Layer {
    pub fn name(&self) -> &LayerName {
        &self.name
    }

    pub fn entries(&self) -> &[LayerEntry] {
        &self.entries
    }
}

/// Accumulates layer declarations and filters until [`build`](Self::build).
///
/// Nothing staged here is observable until the builder is consumed.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    decls: Vec<LayerDecl>,
    filters: Vec<FilterRegistration>,
    extensions: Vec<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a declaration. Returns `false` if an identical one is already
    /// staged, in which case nothing changes.
    pub fn stage(&mut self, decl: LayerDecl) -> bool {
        if self.decls.iter().any(|d| d.same_entry(&decl)) {
            debug!(layer = %decl.layer, path = %decl.path.display(), "duplicate layer declaration ignored");
            return false;
        }
        self.decls.push(decl);
        true
    }

    pub fn add_filter(&mut self, filter: FilterRegistration) {
        self.filters.push(filter);
    }

    /// Renderer extensions, without dots, in the order they are tried.
    pub fn extensions(&mut self, extensions: Vec<String>) {
        self.extensions = extensions;
    }

    /// Override targets with no custom or plain entry to override.
    pub fn dangling_overrides(&self) -> Vec<(LayerName, String)> {
        self.decls
            .iter()
            .filter(|d| d.kind == EntryKind::Override)
            .filter(|d| {
                !self
                    .decls
                    .iter()
                    .any(|o| o.layer == d.layer && o.kind != EntryKind::Override)
            })
            .map(|d| (d.layer.clone(), d.label.clone()))
            .collect()
    }

    pub fn staged(&self) -> usize {
        self.decls.len()
    }

    /// Publish everything staged as an immutable registry.
    pub fn build(self) -> LayerRegistry {
        // Layers appear in the order their first non-custom entry was staged;
        // layers that only exist in the custom directory come last.
        let mut order: Vec<LayerName> = Vec::new();
        for decl in self.decls.iter().filter(|d| d.kind != EntryKind::Custom) {
            if !order.contains(&decl.layer) {
                order.push(decl.layer.clone());
            }
        }
        for decl in self.decls.iter().filter(|d| d.kind == EntryKind::Custom) {
            if !order.contains(&decl.layer) {
                order.push(decl.layer.clone());
            }
        }

        let mut grouped: HashMap<LayerName, Vec<LayerDecl>> = HashMap::new();
        for decl in self.decls {
            grouped.entry(decl.layer.clone()).or_default().push(decl);
        }

        let mut layers = Vec::with_capacity(order.len());
        let mut index = HashMap::with_capacity(order.len());
        for name in order {
            let decls = grouped.remove(&name).unwrap_or_default();
            let entries = order_entries(decls);
            index.insert(name.clone(), layers.len());
            layers.push(Layer { name, entries });
        }

        let extensions = if self.extensions.is_empty() {
            vec![DEFAULT_EXTENSION.to_owned()]
        } else {
            self.extensions
        };

        LayerRegistry {
            layers,
            index,
            filters: self.filters,
            extensions,
        }
    }
}

fn order_entries(decls: Vec<LayerDecl>) -> Vec<LayerEntry> {
    let mut custom = Vec::new();
    let mut overrides = Vec::new();
    let mut plain = Vec::new();
    for decl in decls {
        match decl.kind {
            EntryKind::Custom => custom.push(decl),
            EntryKind::Override => overrides.push(decl),
            EntryKind::Plain => plain.push(decl),
        }
    }
    overrides.reverse();

    let mut entries: Vec<LayerEntry> = custom
        .into_iter()
        .chain(overrides)
        .chain(plain)
        .map(LayerDecl::into_entry)
        .collect();

    let len = entries.len();
    for (idx, entry) in entries.iter_mut().enumerate() {
        let shadows = entry.kind() != EntryKind::Plain && idx + 1 < len;
        entry.set_parent(shadows.then_some(idx + 1));
    }
    entries
}

/// Immutable, shareable registry of layers and template filters.
#[derive(Debug, Clone)]
pub struct LayerRegistry {
    layers: Vec<Layer>,
    index: HashMap<LayerName, usize>,
    filters: Vec<FilterRegistration>,
    extensions: Vec<String>,
}

impl LayerRegistry {
    /// Fixed identifier the registry is published under.
    pub const KEY: &'static str = "strata:layer";

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// An empty registry.
    pub fn empty() -> Self {
        RegistryBuilder::new().build()
    }

    /// Entries of `name` in precedence order; empty when the layer is unknown.
    pub fn get_layer(&self, name: &str) -> &[LayerEntry] {
        self.layer(name).map(Layer::entries).unwrap_or(&[])
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        let name = LayerName::new(name).ok()?;
        self.index.get(&name).map(|&idx| &self.layers[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layer(name).is_some()
    }

    /// All layers in registration order.
    pub fn layers(&self) -> impl Iterator<Item = (&LayerName, &[LayerEntry])> {
        self.layers.iter().map(|l| (&l.name, l.entries.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Follow the override chain starting at entry `index` of layer `name`.
    pub fn chain<'a>(&'a self, name: &str, index: usize) -> impl Iterator<Item = &'a LayerEntry> + 'a {
        let entries = self.get_layer(name);
        std::iter::successors(entries.get(index), move |entry| {
            entry.parent().and_then(|p| entries.get(p))
        })
    }

    pub fn filters(&self) -> &[FilterRegistration] {
        &self.filters
    }

    /// Filters whose selector matches a template's logical name.
    pub fn filters_for<'a>(
        &'a self,
        layer: &'a LayerName,
        logical_name: &'a str,
    ) -> impl Iterator<Item = &'a FilterRegistration> + 'a {
        self.filters
            .iter()
            .filter(move |f| f.matches(layer, logical_name))
    }

    /// Renderer extensions in the order they are tried.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::layer::CUSTOM_LABEL;

    fn name(n: &str) -> LayerName {
        LayerName::new(n).unwrap()
    }

    fn labels(registry: &LayerRegistry, layer: &str) -> Vec<String> {
        registry
            .get_layer(layer)
            .iter()
            .map(|e| e.label().to_owned())
            .collect()
    }

    #[test]
    fn custom_entry_precedes_plain_entry() {
        let mut builder = LayerRegistry::builder();
        // custom entries are staged first, at configurator construction
        builder.stage(LayerDecl::custom(name("dir1"), "tests:bundle/dir1", "/t/bundle/dir1"));
        builder.stage(LayerDecl::plain(name("dir1"), "tests:dir1/", "/t/dir1"));
        let registry = builder.build();

        let entries = registry.get_layer("dir1");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label(), CUSTOM_LABEL);
        assert_eq!(entries[1].label(), "");
        assert_eq!(entries[0].parent(), Some(1));
        assert_eq!(entries[1].parent(), None);
    }

    #[test]
    fn overrides_newest_first_and_plain_oldest_first() {
        let mut builder = LayerRegistry::builder();
        builder.stage(LayerDecl::plain(name("page"), "a", "/a"));
        builder.stage(LayerDecl::plain(name("page"), "b", "/b"));
        builder.stage(LayerDecl::overriding(name("page"), &name("t1"), "t1", "/t1"));
        builder.stage(LayerDecl::overriding(name("page"), &name("t2"), "t2", "/t2"));
        builder.stage(LayerDecl::overriding(name("page"), &name("t3"), "t3", "/t3"));
        let registry = builder.build();

        assert_eq!(labels(&registry, "page"), vec!["t3", "t2", "t1", "", ""]);
        let specs: Vec<_> = registry.get_layer("page").iter().map(|e| e.spec()).collect();
        assert_eq!(specs, vec!["t3", "t2", "t1", "a", "b"]);
    }

    #[test]
    fn chain_walks_to_the_base_entry() {
        let mut builder = LayerRegistry::builder();
        builder.stage(LayerDecl::plain(name("page"), "base", "/base"));
        builder.stage(LayerDecl::overriding(name("page"), &name("t1"), "t1", "/t1"));
        builder.stage(LayerDecl::overriding(name("page"), &name("t2"), "t2", "/t2"));
        let registry = builder.build();

        let chain: Vec<_> = registry.chain("page", 0).map(|e| e.spec()).collect();
        assert_eq!(chain, vec!["t2", "t1", "base"]);
    }

    #[test]
    fn unknown_layer_is_empty_not_error() {
        let registry = LayerRegistry::empty();
        assert!(registry.get_layer("nope").is_empty());
        assert!(registry.get_layer("bad:name").is_empty());
        assert!(!registry.contains("nope"));
    }

    #[test]
    fn duplicate_declaration_is_ignored() {
        let mut builder = LayerRegistry::builder();
        assert!(builder.stage(LayerDecl::plain(name("page"), "a", "/a")));
        assert!(!builder.stage(LayerDecl::plain(name("page"), "a", "/a")));
        assert_eq!(builder.staged(), 1);
        assert_eq!(builder.build().get_layer("page").len(), 1);
    }

    #[test]
    fn layers_keep_registration_order() {
        let mut builder = LayerRegistry::builder();
        builder.stage(LayerDecl::custom(name("zeta"), "c", "/c/zeta"));
        builder.stage(LayerDecl::plain(name("test2"), "b", "/b"));
        builder.stage(LayerDecl::plain(name("test1"), "a", "/a"));
        let registry = builder.build();

        let names: Vec<_> = registry.layers().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["test2", "test1", "zeta"]);
    }

    #[test]
    fn dangling_override_is_reported() {
        let mut builder = LayerRegistry::builder();
        builder.stage(LayerDecl::overriding(name("ghost"), &name("theme"), "t", "/t"));
        assert_eq!(
            builder.dangling_overrides(),
            vec![(name("ghost"), "theme".to_owned())]
        );
    }

    #[test]
    fn default_extension_applies() {
        assert_eq!(LayerRegistry::empty().extensions(), ["pt".to_owned()]);
    }
}
