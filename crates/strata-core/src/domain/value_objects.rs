//! Domain value objects: LayerName, TemplatePath, TemplateSelector, AssetSpec.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. Each
//! one validates on construction, so a value that exists is a value that is
//! well formed. None of them touch the filesystem; turning an [`AssetSpec`]
//! into a directory is the configurator's job.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

// ── LayerName ────────────────────────────────────────────────────────────────

/// Name of a layer, used as the registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LayerName(String);

impl LayerName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::InvalidLayerName {
                name,
                reason: "must not be empty".into(),
            });
        }
        if name.contains(':') {
            return Err(DomainError::InvalidLayerName {
                name,
                reason: "must not contain ':'".into(),
            });
        }
        if name.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidLayerName {
                name,
                reason: "must not contain whitespace".into(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LayerName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LayerName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LayerName> for String {
    fn from(value: LayerName) -> Self {
        value.0
    }
}

impl AsRef<str> for LayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── TemplatePath ─────────────────────────────────────────────────────────────

/// A template path relative to a layer directory.
///
/// Always relative, never empty, and never escapes its directory through
/// `..`. Separators are normalised to `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplatePath(String);

impl TemplatePath {
    pub fn new(path: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = path.as_ref();
        let invalid = |reason: &str| DomainError::InvalidTemplatePath {
            path: raw.to_owned(),
            reason: reason.to_owned(),
        };

        let normalized = raw.replace('\\', "/");
        let trimmed = normalized.trim_start_matches("./");
        if trimmed.is_empty() {
            return Err(invalid("path is empty"));
        }
        if trimmed.starts_with('/') || Path::new(trimmed).is_absolute() {
            return Err(invalid("path must be relative"));
        }
        if trimmed.ends_with('/') {
            return Err(invalid("path names a directory"));
        }

        let mut parts = Vec::new();
        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir => return Err(invalid("'..' is not allowed")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("path must be relative"));
                }
            }
        }
        if parts.is_empty() {
            return Err(invalid("path is empty"));
        }
        Ok(Self(parts.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path with `/` separators converted to the platform form.
    pub fn to_path_buf(&self) -> PathBuf {
        self.0.split('/').collect()
    }

    /// The final component's extension, without the dot.
    pub fn extension(&self) -> Option<&str> {
        let file = self.file_name();
        match file.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&file[idx + 1..]),
        }
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// The path without the final extension (`actions/list.pt` → `actions/list`).
    pub fn logical_name(&self) -> &str {
        match self.extension() {
            Some(ext) => &self.0[..self.0.len() - ext.len() - 1],
            None => &self.0,
        }
    }

    /// Same path with its extension replaced by `extension`.
    pub fn with_extension(&self, extension: &str) -> Self {
        Self(format!("{}.{}", self.logical_name(), extension))
    }
}

impl fmt::Display for TemplatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TemplatePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ── TemplateSelector ─────────────────────────────────────────────────────────

/// A fully qualified template reference, `layer:relative/path.ext`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateSelector {
    pub layer: LayerName,
    pub template: TemplatePath,
}

impl TemplateSelector {
    /// Split a `layer:rest` string on its first colon without validating
    /// either half.
    pub fn split(selector: &str) -> Result<(&str, &str), DomainError> {
        selector
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidSelector {
                selector: selector.to_owned(),
            })
    }

    pub fn parse(selector: &str) -> Result<Self, DomainError> {
        let (layer, template) = Self::split(selector)?;
        Ok(Self {
            layer: LayerName::new(layer)?,
            template: TemplatePath::new(template)?,
        })
    }
}

impl fmt::Display for TemplateSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.layer, self.template)
    }
}

impl FromStr for TemplateSelector {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── FilterSelector ───────────────────────────────────────────────────────────

/// Selector for template filters, `layer:path-prefix`.
///
/// The prefix matches on whole path components against a template's logical
/// name (its relative path without extension). An empty prefix matches every
/// template of the layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSelector {
    pub layer: LayerName,
    pub prefix: String,
}

impl FilterSelector {
    pub fn parse(selector: &str) -> Result<Self, DomainError> {
        let (layer, prefix) = TemplateSelector::split(selector)?;
        Ok(Self {
            layer: LayerName::new(layer)?,
            prefix: prefix.trim_matches('/').replace('\\', "/"),
        })
    }

    pub fn matches(&self, layer: &LayerName, logical_name: &str) -> bool {
        if &self.layer != layer {
            return false;
        }
        if self.prefix.is_empty() || logical_name == self.prefix {
            return true;
        }
        logical_name
            .strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for FilterSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.layer, self.prefix)
    }
}

// ── AssetSpec ────────────────────────────────────────────────────────────────

/// Where a layer directory lives, as written in configuration.
///
/// `package:subpath` is resolved against a declared package root; anything
/// else is a plain filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetSpec {
    Package { package: String, subpath: String },
    Path(PathBuf),
}

impl AssetSpec {
    /// Parse `spec`, treating `prefix:rest` as a package reference only when
    /// `prefix` is one of `packages`.
    pub fn parse(spec: &str, packages: &PackageRoots) -> Result<Self, DomainError> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidAssetSpec {
                spec: spec.to_owned(),
                reason: "specification is empty".into(),
            });
        }
        if let Some((package, subpath)) = trimmed.split_once(':') {
            if packages.contains(package) {
                return Ok(Self::Package {
                    package: package.to_owned(),
                    subpath: subpath.to_owned(),
                });
            }
        }
        Ok(Self::Path(PathBuf::from(trimmed)))
    }

    /// Turn the spec into a path. Relative plain paths are joined onto
    /// `base_dir`.
    pub fn to_path(&self, packages: &PackageRoots, base_dir: &Path) -> Result<PathBuf, DomainError> {
        match self {
            Self::Package { package, subpath } => {
                let root = packages.get(package).ok_or_else(|| DomainError::InvalidAssetSpec {
                    spec: self.to_string(),
                    reason: format!("unknown package '{package}'"),
                })?;
                let root = if root.is_absolute() {
                    root.to_path_buf()
                } else {
                    base_dir.join(root)
                };
                let subpath = subpath.trim_matches('/');
                Ok(if subpath.is_empty() {
                    root
                } else {
                    root.join(subpath)
                })
            }
            Self::Path(path) if path.is_absolute() => Ok(path.clone()),
            Self::Path(path) => Ok(base_dir.join(path)),
        }
    }
}

impl fmt::Display for AssetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package { package, subpath } => write!(f, "{package}:{subpath}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Package name → root directory table used by [`AssetSpec`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageRoots(BTreeMap<String, PathBuf>);

impl PackageRoots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, package: impl Into<String>, root: impl Into<PathBuf>) -> &mut Self {
        self.0.insert(package.into(), root.into());
        self
    }

    pub fn with(mut self, package: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.insert(package, root);
        self
    }

    pub fn get(&self, package: &str) -> Option<&Path> {
        self.0.get(package).map(PathBuf::as_path)
    }

    pub fn contains(&self, package: &str) -> bool {
        self.0.contains_key(package)
    }
}

// ── Extension ────────────────────────────────────────────────────────────────

/// Normalise a renderer extension (`".pt"` and `"pt"` are the same).
pub fn normalize_extension(extension: &str) -> Result<String, DomainError> {
    let ext = extension.trim().trim_start_matches('.');
    if ext.is_empty() || ext.contains(['/', '\\', '.']) {
        return Err(DomainError::InvalidExtension {
            extension: extension.to_owned(),
        });
    }
    Ok(ext.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_name_rejects_colon_and_empty() {
        assert!(LayerName::new("page").is_ok());
        assert!(LayerName::new("").is_err());
        assert!(LayerName::new("a:b").is_err());
        assert!(LayerName::new("a b").is_err());
    }

    #[test]
    fn template_path_normalises_separators() {
        let path = TemplatePath::new("./actions\\list.pt").unwrap();
        assert_eq!(path.as_str(), "actions/list.pt");
        assert_eq!(path.extension(), Some("pt"));
        assert_eq!(path.logical_name(), "actions/list");
        assert_eq!(path.file_name(), "list.pt");
    }

    #[test]
    fn template_path_rejects_escapes() {
        assert!(TemplatePath::new("../secret.pt").is_err());
        assert!(TemplatePath::new("a/../../b").is_err());
        assert!(TemplatePath::new("/etc/passwd").is_err());
        assert!(TemplatePath::new("").is_err());
        assert!(TemplatePath::new("dir/").is_err());
    }

    #[test]
    fn template_path_without_extension() {
        let path = TemplatePath::new("layer_custom").unwrap();
        assert_eq!(path.extension(), None);
        assert_eq!(path.logical_name(), "layer_custom");
        assert_eq!(path.with_extension("pt").as_str(), "layer_custom.pt");
    }

    #[test]
    fn dotfile_has_no_extension() {
        let path = TemplatePath::new(".hidden").unwrap();
        assert_eq!(path.extension(), None);
        assert_eq!(path.logical_name(), ".hidden");
    }

    #[test]
    fn extension_is_replaced() {
        let path = TemplatePath::new("view.lt").unwrap();
        assert_eq!(path.with_extension("pt").as_str(), "view.pt");
    }

    #[test]
    fn selector_splits_on_first_colon() {
        let sel = TemplateSelector::parse("page:dir/view.pt").unwrap();
        assert_eq!(sel.layer.as_str(), "page");
        assert_eq!(sel.template.as_str(), "dir/view.pt");
        assert_eq!(sel.to_string(), "page:dir/view.pt");
    }

    #[test]
    fn split_keeps_everything_after_first_colon() {
        assert_eq!(
            TemplateSelector::split("page:a:b.pt").unwrap(),
            ("page", "a:b.pt")
        );
        assert_eq!(TemplateSelector::split("page:").unwrap(), ("page", ""));
    }

    #[test]
    fn selector_without_colon_is_rejected() {
        let err = TemplateSelector::parse("test").unwrap_err();
        assert!(matches!(err, DomainError::InvalidSelector { .. }));
        assert_eq!(err.to_string(), "Template format is wrong.");
    }

    #[test]
    fn filter_selector_matches_on_component_boundaries() {
        let sel = FilterSelector::parse("page:actions").unwrap();
        let page = LayerName::new("page").unwrap();
        let other = LayerName::new("other").unwrap();

        assert!(sel.matches(&page, "actions"));
        assert!(sel.matches(&page, "actions/list"));
        assert!(!sel.matches(&page, "actionsbar"));
        assert!(!sel.matches(&other, "actions"));
    }

    #[test]
    fn empty_filter_prefix_matches_whole_layer() {
        let sel = FilterSelector::parse("page:").unwrap();
        let page = LayerName::new("page").unwrap();
        assert!(sel.matches(&page, "anything/at/all"));
    }

    #[test]
    fn asset_spec_resolves_known_package() {
        let packages = PackageRoots::new().with("tests", "fixtures");
        let spec = AssetSpec::parse("tests:dir1/", &packages).unwrap();
        assert_eq!(
            spec,
            AssetSpec::Package {
                package: "tests".into(),
                subpath: "dir1/".into()
            }
        );
        let path = spec.to_path(&packages, Path::new("/app")).unwrap();
        assert_eq!(path, PathBuf::from("/app/fixtures/dir1"));
    }

    #[test]
    fn asset_spec_unknown_prefix_is_a_path() {
        let packages = PackageRoots::new();
        let spec = AssetSpec::parse("unknown", &packages).unwrap();
        assert_eq!(spec, AssetSpec::Path(PathBuf::from("unknown")));
        assert_eq!(
            spec.to_path(&packages, Path::new("/base")).unwrap(),
            PathBuf::from("/base/unknown")
        );
    }

    #[test]
    fn asset_spec_rejects_empty() {
        assert!(AssetSpec::parse("  ", &PackageRoots::new()).is_err());
    }

    #[test]
    fn extension_normalisation() {
        assert_eq!(normalize_extension(".pt").unwrap(), "pt");
        assert_eq!(normalize_extension("pt").unwrap(), "pt");
        assert!(normalize_extension(".").is_err());
        assert!(normalize_extension("a/b").is_err());
    }
}
