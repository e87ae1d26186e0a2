//! # Strata CLI
//!
//! Inspect the template layers of an application and copy templates out for
//! customization.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load CLI configuration (file + env + defaults).
//! 4. Build the [`OutputManager`].
//! 5. Without an action, print help; otherwise load the application
//!    configuration file and dispatch.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                 |
//! |------|-------------------------|
//! |  0   | Success                 |
//! |  1   | Internal / system error |
//! |  2   | User / input error      |
//! |  3   | Resource not found      |
//! |  4   | Configuration error     |

use std::{io::IsTerminal, process::ExitCode};

use clap::{CommandFactory, Parser};
use tracing::{debug, info, instrument};

use crate::{
    cli::{Action, Cli, normalize_args},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // Load .env before anything else, including tracing init.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here and exit 0.
            let _ = e.print();
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2));
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e:#}");
            return ExitCode::from(4);
        }
    };

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;
    let colored = output.supports_color() && std::io::stderr().is_terminal();

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    match run(cli, config, output) {
        Ok(()) => {
            info!("strata completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose, colored),
    }
}

/// Dispatch to the correct action handler.
#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let Some(action) = cli.action.selected() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let Some(config_file) = cli.config else {
        return Err(CliError::InvalidInput {
            message: "the CONFIG argument is required".into(),
            source: None,
        });
    };

    let service = commands::load_service(&config_file, &config)?;
    match action {
        Action::Layers(names) => commands::list::layers(&service, &names, &output),
        Action::Templates(names) => commands::list::templates(&service, &names, &output),
        Action::Customize { selector, dest } => {
            commands::customize::execute(&service, &selector, &dest, cli.force, &output)
                .map(|_| ())
        }
    }
}

/// Report a `CliError` and pick the exit code.
///
/// Lookup outcomes of `-c` are printed verbatim on stdout; the report with
/// hints goes to stderr.
fn handle_error(err: CliError, verbose: bool, colored: bool) -> ExitCode {
    err.log();

    if let Some(outcome) = err.outcome() {
        println!("{outcome}");
    }
    eprint!("{}", err.render(verbose, colored));

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_version_matches_cargo() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn help_mentions_every_action() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("--layers"));
        assert!(help.contains("--templates"));
        assert!(help.contains("--customize"));
    }
}
