//! repeatkit CLI entry point
//!
//! Parses the command line, runs the selected command and prints errors with
//! their suggestions:
//! - `render` - render a template against a JSON state
//! - `list` - render a JSON array in list mode
//! - `codec` - convert values to and from attribute form

use anyhow::Result;
use clap::Parser;
use repeatkit::cli;
use repeatkit::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
