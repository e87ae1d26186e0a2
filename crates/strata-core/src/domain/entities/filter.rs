//! Template filters attached to `layer:prefix` selectors.
//!
//! Filters are only consulted when templates are listed; the resolver never
//! looks at them.

use std::{fmt, panic::Location, path::Path, sync::Arc};

use crate::domain::value_objects::{FilterSelector, LayerName};

/// A discovered template, as handed to filters.
#[derive(Debug, Clone, Copy)]
pub struct TemplateRef<'a> {
    pub layer: &'a LayerName,
    /// Relative path without extension, `/`-separated.
    pub logical_name: &'a str,
    /// Directory of the entry the template was found in.
    pub entry_dir: &'a Path,
}

/// Capability of producing a display note for a matched template.
pub trait TemplateFilter: Send + Sync {
    /// Extra text shown next to the template in listings, if any.
    fn annotate(&self, template: &TemplateRef<'_>) -> Option<String>;
}

impl<F> TemplateFilter for F
where
    F: Fn(&TemplateRef<'_>) -> Option<String> + Send + Sync,
{
    fn annotate(&self, template: &TemplateRef<'_>) -> Option<String> {
        self(template)
    }
}

/// Filter with a fixed note, used for filters declared in configuration files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter(pub Option<String>);

impl TemplateFilter for NoteFilter {
    fn annotate(&self, _template: &TemplateRef<'_>) -> Option<String> {
        self.0.clone()
    }
}

/// A filter together with where and under which name it was registered.
#[derive(Clone)]
pub struct FilterRegistration {
    selector: FilterSelector,
    name: String,
    source: String,
    filter: Arc<dyn TemplateFilter>,
}

impl FilterRegistration {
    pub fn new(
        selector: FilterSelector,
        name: impl Into<String>,
        source: impl Into<String>,
        filter: Arc<dyn TemplateFilter>,
    ) -> Self {
        Self {
            selector,
            name: name.into(),
            source: source.into(),
            filter,
        }
    }

    /// Registration whose source is the caller's file.
    #[track_caller]
    pub fn here(
        selector: FilterSelector,
        name: impl Into<String>,
        filter: Arc<dyn TemplateFilter>,
    ) -> Self {
        let source = Location::caller().file().replace('\\', "/");
        Self::new(selector, name, source, filter)
    }

    pub fn selector(&self) -> &FilterSelector {
        &self.selector
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, layer: &LayerName, logical_name: &str) -> bool {
        self.selector.matches(layer, logical_name)
    }

    pub fn annotate(&self, template: &TemplateRef<'_>) -> Option<String> {
        self.filter.annotate(template)
    }
}

impl fmt::Debug for FilterRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistration")
            .field("selector", &self.selector)
            .field("name", &self.name)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> LayerName {
        LayerName::new("page").unwrap()
    }

    #[test]
    fn here_records_this_file() {
        let reg = FilterRegistration::here(
            FilterSelector::parse("page:actions").unwrap(),
            "actions",
            Arc::new(NoteFilter::default()),
        );
        assert!(reg.source().ends_with("filter.rs"));
        assert_eq!(reg.name(), "actions");
    }

    #[test]
    fn closures_are_filters() {
        let reg = FilterRegistration::new(
            FilterSelector::parse("page:").unwrap(),
            "shout",
            "app.rs",
            Arc::new(|t: &TemplateRef<'_>| Some(t.logical_name.to_uppercase())),
        );
        let layer = page();
        let template = TemplateRef {
            layer: &layer,
            logical_name: "view",
            entry_dir: Path::new("/tmp"),
        };
        assert_eq!(reg.annotate(&template).as_deref(), Some("VIEW"));
    }

    #[test]
    fn note_filter_returns_its_note() {
        let layer = page();
        let template = TemplateRef {
            layer: &layer,
            logical_name: "view",
            entry_dir: Path::new("/tmp"),
        };
        assert_eq!(
            NoteFilter(Some("static".into())).annotate(&template).as_deref(),
            Some("static")
        );
        assert_eq!(NoteFilter(None).annotate(&template), None);
    }
}
