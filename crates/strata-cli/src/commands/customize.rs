//! `strata CONFIG -c LAYER:TEMPLATE DEST_DIR`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::instrument;

use strata_core::application::LayerService;

use crate::{cli::OutputFormat, error::CliResult, output::OutputManager};

#[derive(Debug, Serialize)]
struct Customized<'a> {
    template: &'a str,
    path: &'a Path,
}

/// Copy the template named by `selector` into `dest`.
#[instrument(skip(service, output))]
pub fn execute(
    service: &LayerService,
    selector: &str,
    dest: &Path,
    force: bool,
    output: &OutputManager,
) -> CliResult<PathBuf> {
    let target = service.customize(selector, dest, force)?;

    if output.format() == OutputFormat::Json {
        output.json(&Customized {
            template: selector,
            path: &target,
        })?;
    } else {
        output.success(&format!("Customized {selector} at {}", target.display()))?;
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cli::GlobalArgs, config::AppConfig, error::CliError};
    use mockall::predicate::eq;
    use std::sync::Arc;
    use strata_core::{
        application::ports::MockFilesystem,
        domain::{LayerDecl, LayerName, LayerRegistry},
    };

    fn quiet_output() -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet: true,
            no_color: true,
            output_format: OutputFormat::Plain,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    fn service(fs: MockFilesystem) -> LayerService {
        let mut builder = LayerRegistry::builder();
        builder.stage(LayerDecl::plain(
            LayerName::new("test").unwrap(),
            "tests:dir1/",
            "/t/dir1",
        ));
        LayerService::new(Arc::new(builder.build()), Arc::new(fs))
    }

    #[test]
    fn copies_into_destination() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_file()
            .returning(|p| p == Path::new("/t/dir1/view.pt"));
        fs.expect_is_dir().with(eq(Path::new("/out"))).return_const(true);
        fs.expect_exists().return_const(false);
        fs.expect_copy_file()
            .with(eq(Path::new("/t/dir1/view.pt")), eq(Path::new("/out/view.pt")))
            .times(1)
            .returning(|_, _| Ok(()));

        let target = execute(&service(fs), "test:view.lt", Path::new("/out"), false, &quiet_output())
            .unwrap();
        assert_eq!(target, PathBuf::from("/out/view.pt"));
    }

    #[test]
    fn missing_destination_exits_not_found() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_file().return_const(true);
        fs.expect_is_dir().return_const(false);
        fs.expect_copy_file().never();

        let err = execute(
            &service(fs),
            "test:view.lt",
            Path::new("./blah-blah-blah"),
            false,
            &quiet_output(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Destination directory is not found.");
        assert!(matches!(err, CliError::Core(_)));
        assert_eq!(err.exit_code(), 3);
    }
}
