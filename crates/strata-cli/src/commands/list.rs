//! `strata CONFIG -l` and `strata CONFIG -lt`.

use std::collections::BTreeMap;

use tracing::instrument;

use strata_core::{
    application::{LayerInfo, LayerService},
    domain::LayerRegistry,
};

use crate::{cli::OutputFormat, error::CliResult, output::OutputManager};

/// Printed when the registry, or the requested subset of it, is empty.
pub const NO_LAYERS: &str = "No layers are found.";

/// List layers, restricted to `names` when non-empty.
#[instrument(skip(service, output))]
pub fn layers(service: &LayerService, names: &[String], output: &OutputManager) -> CliResult<()> {
    let layers = service.list_layers(names);
    render(&layers, output)
}

/// List layers with every entry's templates.
#[instrument(skip(service, output))]
pub fn templates(service: &LayerService, names: &[String], output: &OutputManager) -> CliResult<()> {
    let layers = service.list_templates(names)?;
    render(&layers, output)
}

fn render(layers: &[LayerInfo], output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let document = BTreeMap::from([(LayerRegistry::KEY, layers)]);
        output.json(&document)?;
        return Ok(());
    }

    for line in lines(layers) {
        match line {
            Line::Header(text) => output.header(&text)?,
            Line::Entry(text) => output.print(&text)?,
            Line::Template(text) => output.detail(&text)?,
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Header(String),
    Entry(String),
    Template(String),
}

fn lines(layers: &[LayerInfo]) -> Vec<Line> {
    if layers.is_empty() {
        return vec![Line::Entry(NO_LAYERS.to_owned())];
    }

    let mut out = Vec::new();
    for (i, layer) in layers.iter().enumerate() {
        if i > 0 {
            out.push(Line::Entry(String::new()));
        }
        out.push(Line::Header(format!("* Layer: {}", layer.name)));
        for entry in &layer.entries {
            out.push(Line::Entry(format!("    {entry}")));
            for template in &entry.templates {
                out.push(Line::Template(format!("        {template}")));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        path::{Path, PathBuf},
        sync::Arc,
    };
    use strata_core::{
        application::ports::MockFilesystem,
        domain::{FilterRegistration, FilterSelector, LayerDecl, LayerName, NoteFilter},
    };

    fn service() -> LayerService {
        let mut builder = LayerRegistry::builder();
        builder.stage(LayerDecl::plain(
            LayerName::new("test1").unwrap(),
            "tests:dir1/",
            "/t/dir1",
        ));
        builder.stage(
            LayerDecl::plain(LayerName::new("test2").unwrap(), "tests:bundle/", "/t/bundle")
                .description("bundled"),
        );
        builder.add_filter(FilterRegistration::new(
            FilterSelector::parse("test1:actions").unwrap(),
            "test",
            "tests/test_script.rs",
            Arc::new(NoteFilter::default()),
        ));

        let mut fs = MockFilesystem::new();
        fs.expect_list_files().returning(|dir| {
            if dir == Path::new("/t/dir1") {
                Ok(vec![PathBuf::from("actions.pt"), PathBuf::from("view.pt")])
            } else {
                Ok(vec![])
            }
        });
        LayerService::new(Arc::new(builder.build()), Arc::new(fs))
    }

    #[test]
    fn empty_listing_says_so() {
        assert_eq!(lines(&[]), vec![Line::Entry(NO_LAYERS.to_owned())]);
    }

    #[test]
    fn layer_headers_and_entries() {
        let lines = lines(&service().list_layers(&[]));
        assert!(lines.contains(&Line::Header("* Layer: test1".into())));
        assert!(lines.contains(&Line::Header("* Layer: test2".into())));
        assert!(lines.contains(&Line::Entry("    tests:bundle/ - bundled".into())));
    }

    #[test]
    fn restricted_listing_omits_other_layers() {
        let lines = lines(&service().list_layers(&["test2".into()]));
        assert!(!lines.contains(&Line::Header("* Layer: test1".into())));
        assert!(lines.contains(&Line::Header("* Layer: test2".into())));
    }

    #[test]
    fn template_lines_carry_filters() {
        let lines = lines(&service().list_templates(&["test1".into()]).unwrap());
        assert!(lines.contains(&Line::Entry("    tests:dir1/".into())));
        assert!(lines.contains(&Line::Template(
            "        actions: .pt (tests/test_script.rs: test)".into()
        )));
        assert!(lines.contains(&Line::Template("        view: .pt".into())));
    }

    #[test]
    fn unknown_names_yield_nothing() {
        let lines = lines(&service().list_layers(&["nope".into()]));
        assert_eq!(lines, vec![Line::Entry(NO_LAYERS.to_owned())]);
    }
}
