//! Command-line interface for repeatkit.
//!
//! The binary renders templates from files or JSON on the command line and
//! prints the resulting markup. It drives the same views a host application
//! would, against an in-memory container.
//!
//! # Commands
//!
//! - `render` - render one template against a whole JSON state
//! - `list` - render a JSON array in list mode, optionally through a
//!   sequence of later states, showing how the container is reconciled
//! - `codec` - convert between JSON values and their attribute form
//!
//! # Examples
//!
//! ```bash
//! repeatkit render --json '{"name":"Ada"}' --template '<b>{{ name }}</b>'
//! repeatkit list --json '[1,2,3]' --tag li --limit 2 --page 1
//! repeatkit list --state before.json --next after.json --track-by id --trace
//! repeatkit codec encode '{"page":2}'
//! ```
//!
//! Defaults for `render` and `list` come from a `repeatkit.toml` file; see
//! [`crate::config`].

mod codec;
mod common;
mod list;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::RepeatConfig;

/// Settings derived from the global flags, shared by every command.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` means use `RUST_LOG` or `info`.
    pub log_level: Option<String>,

    /// Configuration file named with `--config`.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber. Logs go to stderr so that
    /// rendered markup on stdout stays clean.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load the configuration file for this invocation.
    pub async fn load_config(&self) -> Result<RepeatConfig> {
        RepeatConfig::load(self.config_path.as_deref()).await
    }
}

#[derive(Parser)]
#[command(
    name = "repeatkit",
    about = "Render templates and keyed lists from JSON state",
    version,
    long_about = "repeatkit renders HTML templates with data-if, data-show, data-class and data-each \
                  directives, and reconciles keyed lists with filtering, sorting and pagination."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to a configuration file (overrides REPEATKIT_CONFIG and ./repeatkit.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template against a JSON state
    Render(render::RenderCommand),

    /// Render a JSON array in list mode
    List(list::ListCommand),

    /// Convert values to and from attribute form
    Codec(codec::CodecCommand),
}

impl Cli {
    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Render(cmd) => cmd.execute(&config).await,
            Commands::List(cmd) => cmd.execute(&config).await,
            Commands::Codec(cmd) => cmd.execute(),
        }
    }
}
