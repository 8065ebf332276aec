//! Common test utilities for the repeatkit test suites.

// Not every suite uses every helper
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory to run the binary in, with helpers to write inputs.
pub struct TestProject {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        std::fs::create_dir_all(&project_dir)?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn path(&self) -> &Path {
        &self.project_dir
    }

    /// Write a file relative to the project directory.
    pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// The repeatkit binary, run in the project directory with a clean
    /// environment for configuration and colors.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("repeatkit").expect("binary is built");
        cmd.current_dir(&self.project_dir)
            .env_remove("REPEATKIT_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}
