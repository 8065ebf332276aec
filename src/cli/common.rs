//! Argument groups shared by `render` and `list`.

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

use crate::config::RepeatConfig;
use crate::expr::Helpers;
use crate::host::MemoryHost;

/// Where the JSON state comes from. Without either flag it is read from stdin.
#[derive(Args, Debug, Clone, Default)]
pub struct StateArgs {
    /// JSON file holding the state
    #[arg(long, value_name = "FILE", conflicts_with = "json")]
    pub state: Option<PathBuf>,

    /// State given inline as JSON text
    #[arg(long, value_name = "JSON")]
    pub json: Option<String>,
}

impl StateArgs {
    pub async fn load(&self) -> Result<Value> {
        if let Some(path) = &self.state {
            return read_json_file(path).await;
        }
        if let Some(text) = &self.json {
            return serde_json::from_str(text).context("Failed to parse --json state");
        }

        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read state from stdin")?;
        if text.trim().is_empty() {
            bail!("No state given: use --state, --json or pipe JSON on stdin");
        }
        serde_json::from_str(&text).context("Failed to parse state from stdin")
    }
}

/// Where the template comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct TemplateArgs {
    /// Template text
    #[arg(short, long, value_name = "TEXT", conflicts_with = "template_file")]
    pub template: Option<String>,

    /// File holding the template text
    #[arg(long, value_name = "FILE")]
    pub template_file: Option<PathBuf>,

    /// Name of a template from the configuration file's [templates] table
    #[arg(long, value_name = "ID")]
    pub template_id: Option<String>,

    /// Disable the built-in helper functions
    #[arg(long)]
    pub no_helpers: bool,
}

impl TemplateArgs {
    /// Template text from the flags, falling back to the configured template file.
    pub async fn text(&self, config: &RepeatConfig) -> Result<Option<String>> {
        if let Some(text) = &self.template {
            return Ok(Some(text.clone()));
        }
        let Some(path) = self.template_file.as_ref().or(config.template_file.as_ref()) else {
            return Ok(None);
        };
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read template file {}", path.display()))?;
        Ok(Some(text))
    }

    pub fn helpers(&self, config: &RepeatConfig) -> Helpers {
        if self.no_helpers || config.no_helpers {
            Helpers::new()
        } else {
            Helpers::builtin()
        }
    }
}

/// An empty in-memory container knowing the configured named templates.
pub fn container(config: &RepeatConfig) -> MemoryHost {
    config
        .templates
        .iter()
        .fold(MemoryHost::new(), |host, (id, text)| host.with_template(id.clone(), text.clone()))
}

pub async fn read_json_file(path: &Path) -> Result<Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read state file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))
}
