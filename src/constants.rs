//! Global constants used throughout the repeatkit codebase.
//!
//! Directive attribute names, the class names views add to the markup they
//! manage, and defaults shared by the views and the command-line front end.

/// Prefix of container attributes that mirror synced properties.
pub const ATTRIBUTE_PREFIX: &str = "data-";

/// Conditional inclusion directive.
pub const DIRECTIVE_IF: &str = "data-if";

/// Visibility directive toggling [`SHOW_CLASS`] and [`HIDE_CLASS`].
pub const DIRECTIVE_SHOW: &str = "data-show";

/// Class-map directive.
pub const DIRECTIVE_CLASS: &str = "data-class";

/// Repetition directive.
pub const DIRECTIVE_EACH: &str = "data-each";

pub const SHOW_CLASS: &str = "show";
pub const HIDE_CLASS: &str = "hide";

/// Added to inserted items while they transition in.
pub const ENTER_CLASS: &str = "repeat-enter";

/// Added to removed items while they transition out.
pub const EXIT_CLASS: &str = "repeat-exit";

/// Added to a single-mode container after its first render.
pub const PROCESSED_CLASS: &str = "repeat-processed";

/// Key prefix for list items rendered without a track-by expression.
pub const INDEX_KEY_PREFIX: &str = "$index=";

/// Name of the per-item index binding in list mode.
pub const INDEX_BINDING: &str = "index";

/// Name of the per-element binding introduced by `data-each`.
pub const ITEM_BINDING: &str = "item";

/// Default configuration file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "repeatkit.toml";

/// Environment variable overriding the configuration file path.
pub const CONFIG_ENV_VAR: &str = "REPEATKIT_CONFIG";
