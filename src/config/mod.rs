//! Configuration for the `repeatkit` command-line front end.
//!
//! The CLI reads defaults for its subcommands from a TOML file. The file is
//! looked up in this order:
//!
//! 1. the `--config` flag
//! 2. the `REPEATKIT_CONFIG` environment variable
//! 3. `repeatkit.toml` in the working directory
//!
//! A file named explicitly (flag or environment) must exist. The working
//! directory file is optional and defaults apply when it is absent.
//!
//! ```toml
//! limit = 10
//! track-by = "id"
//! tag = "li"
//! transition-enter = 150
//! transition-exit = 150
//!
//! [templates]
//! row = "<li>{{ name }}</li>"
//! ```
//!
//! Command-line options always win over values from the file.

mod parser;

pub use parser::parse_config;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{CONFIG_ENV_VAR, CONFIG_FILE_NAME};
use crate::core::RepeatError;
use crate::view::ViewOptions;

/// Defaults for the `render` and `list` subcommands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RepeatConfig {
    /// Template file used when no template is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_file: Option<PathBuf>,

    /// Wrap each list element in this tag when no template is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_by: Option<String>,

    /// Page size for list mode; 0 disables pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_enter: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_exit: Option<u64>,

    /// Named templates, resolvable through `--template-id`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub templates: BTreeMap<String, String>,

    /// Disable the built-in helper functions (`upper`, `lower`, `len`, `json`, `default`).
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_helpers: bool,
}

impl RepeatConfig {
    /// Load the configuration, resolving its location as described in the
    /// module documentation.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path).await;
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return Self::load_from(Path::new(&path)).await;
        }

        let default_path = PathBuf::from(CONFIG_FILE_NAME);
        if fs::try_exists(&default_path).await.unwrap_or(false) {
            Self::load_from(&default_path).await
        } else {
            tracing::debug!("No {} in working directory, using defaults", CONFIG_FILE_NAME);
            Ok(Self::default())
        }
    }

    /// Load the configuration from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RepeatError::ConfigNotFound {
                    path: path.display().to_string(),
                }
                .into());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config from {}", path.display()));
            }
        };

        let config: Self = parse_config(&content, path)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// View options carrying the list-mode defaults from this file.
    pub fn list_options(&self) -> ViewOptions {
        let mut options = ViewOptions::new();
        if let Some(tag) = &self.tag {
            options = options.with_tag(tag.clone());
        }
        if let Some(track_by) = &self.track_by {
            options = options.with_track_by(track_by.clone());
        }
        if let Some(limit) = self.limit {
            options = options.with_limit(limit);
        }
        if self.transition_enter.is_some() || self.transition_exit.is_some() {
            options = options.with_transitions(
                self.transition_enter.unwrap_or(0),
                self.transition_exit.unwrap_or(0),
            );
        }
        options
    }
}
