//! TOML parsing with file context.

use std::path::Path;

use crate::core::RepeatError;

/// Parse TOML text read from `file` into any deserializable type.
///
/// Syntax errors and shape mismatches both come back as
/// [`RepeatError::ConfigParse`] naming the file.
///
/// ```
/// use repeatkit::config::parse_config;
/// use serde::Deserialize;
/// use std::path::Path;
///
/// #[derive(Deserialize)]
/// struct Limits {
///     limit: u64,
/// }
///
/// let parsed: Limits = parse_config("limit = 5", Path::new("repeatkit.toml")).unwrap();
/// assert_eq!(parsed.limit, 5);
/// ```
pub fn parse_config<T>(content: &str, file: &Path) -> Result<T, RepeatError>
where
    T: serde::de::DeserializeOwned,
{
    toml::from_str(content).map_err(|e| RepeatError::ConfigParse {
        file: file.display().to_string(),
        reason: e.message().to_string(),
    })
}
