//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::{ffi::OsString, path::PathBuf};

use clap::{Args, Parser};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "strata",
    bin_name = "strata",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Inspect and customize template layers",
    long_about = "Strata loads an application configuration file, builds its \
                  template layer registry, and lists layers and templates or \
                  copies a template out for local customization.",
    after_help = "EXAMPLES:\n\
        \x20 strata app.toml -l\n\
        \x20 strata app.toml -l page theme\n\
        \x20 strata app.toml -lt page\n\
        \x20 strata app.toml -c page:view.pt ./custom/page",
)]
pub struct Cli {
    /// Flags available on every invocation.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Application configuration file.
    #[arg(value_name = "CONFIG", help = "Application configuration file")]
    pub config: Option<PathBuf>,

    /// What to do; nothing selected prints this help.
    #[command(flatten)]
    pub action: ActionArgs,

    /// Overwrite an existing customized copy.
    #[arg(long = "force", requires = "customize", help = "Overwrite an existing copy")]
    pub force: bool,
}

/// Mutually exclusive actions.
#[derive(Debug, Args)]
#[group(id = "action", multiple = false)]
pub struct ActionArgs {
    /// List layers, optionally only the named ones.
    #[arg(
        short = 'l',
        long = "layers",
        value_name = "LAYERS",
        num_args = 0..,
        help = "List layers"
    )]
    pub layers: Option<Vec<String>>,

    /// List templates per layer, optionally only for the named layers.
    #[arg(
        long = "templates",
        value_name = "TEMPLATES",
        num_args = 0..,
        help = "List templates per layer (also -lt)"
    )]
    pub templates: Option<Vec<String>>,

    /// Copy `layer:template` into a destination directory.
    #[arg(
        short = 'c',
        long = "customize",
        value_names = ["LAYER:TEMPLATE", "DEST_DIR"],
        num_args = 2,
        help = "Customize a template"
    )]
    pub customize: Option<Vec<String>>,
}

/// A selected action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Layers(Vec<String>),
    Templates(Vec<String>),
    Customize { selector: String, dest: PathBuf },
}

impl ActionArgs {
    /// The chosen action, if any.
    pub fn selected(&self) -> Option<Action> {
        if let Some(names) = &self.layers {
            return Some(Action::Layers(names.clone()));
        }
        if let Some(names) = &self.templates {
            return Some(Action::Templates(names.clone()));
        }
        match self.customize.as_deref() {
            Some([selector, dest]) => Some(Action::Customize {
                selector: selector.clone(),
                dest: PathBuf::from(dest),
            }),
            _ => None,
        }
    }
}

/// Rewrite the single-dash `-lt` spelling to `--templates`.
///
/// clap only knows single-character short flags, so `-lt` would otherwise
/// parse as `-l -t`.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            if arg == "-lt" {
                OsString::from("--templates")
            } else {
                arg
            }
        })
        .collect()
}

// ── tests ─────────────────────────────────────────────────────────────────────
