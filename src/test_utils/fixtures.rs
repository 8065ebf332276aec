//! Test fixtures: sample states, templates and configuration files.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// A named JSON state.
#[derive(Clone, Debug)]
pub struct StateFixture {
    pub name: String,
    pub value: Value,
}

impl StateFixture {
    /// Three todo items keyed by `id`, one of them done.
    pub fn todos() -> Self {
        Self {
            name: "todos".to_string(),
            value: json!([
                { "id": 1, "title": "write", "done": true },
                { "id": 2, "title": "test", "done": false },
                { "id": 3, "title": "ship", "done": false },
            ]),
        }
    }

    /// `count` numbers starting at 1.
    pub fn numbers(count: u64) -> Self {
        Self {
            name: format!("numbers-{count}"),
            value: Value::from((1..=count).collect::<Vec<_>>()),
        }
    }

    /// A single-mode state with nested data.
    pub fn profile() -> Self {
        Self {
            name: "profile".to_string(),
            value: json!({
                "user": { "name": "Ada", "admin": true },
                "tags": ["math", "engines"],
                "visits": 3,
            }),
        }
    }

    /// Write the state as `<name>.json` into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.json", self.name));
        std::fs::write(&path, self.value.to_string())
            .with_context(|| format!("Failed to write state fixture {}", path.display()))?;
        Ok(path)
    }
}

/// Template text for the fixtures above.
pub struct TemplateFixture;

impl TemplateFixture {
    /// One `<li>` per todo, marked `done` through a class map.
    pub const TODO_ROW: &'static str = r#"<li data-class='{"done": done}'>{{ title }}</li>"#;

    /// A card exercising every directive.
    pub const PROFILE: &'static str = concat!(
        r#"<h1>{{ user.name }}</h1>"#,
        r#"<em data-if="user.admin">admin</em>"#,
        r#"<p data-show="visits > 5">regular</p>"#,
        r#"<ul data-each="tags"><li>{{ $index }}:{{ $item }}</li></ul>"#,
    );
}

/// Sample `repeatkit.toml` files.
pub struct ConfigFixture;

impl ConfigFixture {
    pub const LIST_DEFAULTS: &'static str = r#"
limit = 2
track-by = "id"

[templates]
row = "<li>{{ title }}</li>"
"#;

    /// Write `content` as `repeatkit.toml` into `dir`.
    pub fn write_to(dir: &Path, content: &str) -> Result<PathBuf> {
        let path = dir.join(crate::constants::CONFIG_FILE_NAME);
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config fixture {}", path.display()))?;
        Ok(path)
    }
}
