//! Value codec for persisted attributes and display output.
//!
//! State values are plain [`serde_json::Value`]s. "Absent" (the result of a
//! missing lookup, or an unset property) is modelled as `None` throughout the
//! crate, which keeps it distinct from an explicit JSON `null`.
//!
//! Three string forms exist:
//!
//! - **attribute form** ([`encode`] / [`decode`]): what a synced property looks
//!   like when mirrored onto a container attribute. Numbers, booleans, arrays and
//!   objects are written as JSON text, plain strings verbatim, absent as `""`.
//! - **display form** ([`display`]): what `{{ expr }}` interpolation prints before
//!   HTML escaping.
//! - **canonical form** ([`canonical`]): an unambiguous text used as hashing input.
//!
//! # Examples
//!
//! ```
//! use repeatkit::codec::{decode, encode};
//! use serde_json::json;
//!
//! let value = json!({ "page": 2, "tags": ["a", "b"] });
//! let text = encode(Some(&value));
//! assert_eq!(decode(&text), Some(value));
//! assert_eq!(decode(""), None);
//! ```

use serde_json::{Number, Value};
use std::hash::{DefaultHasher, Hash, Hasher};

/// Separator placed between hashed parts. Occurrences inside a part are doubled.
const HASH_SEPARATOR: char = '#';

/// Encode a value into its attribute form.
///
/// Strings are written verbatim unless that text would decode to something else
/// (for example `"true"`, `"42"` or the empty string); those are written as a
/// quoted JSON string so that [`decode`] reproduces them exactly.
pub fn encode(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => {
            if decode_raw(s).as_ref().and_then(Value::as_str) == Some(s.as_str()) {
                s.clone()
            } else {
                Value::String(s.clone()).to_string()
            }
        }
        Some(other) => other.to_string(),
    }
}

/// Decode an attribute string back into a value.
///
/// The empty string and the literal `undefined` decode to absent. Text that
/// parses as JSON decodes to that JSON value; anything else is kept as a string.
pub fn decode(text: &str) -> Option<Value> {
    decode_raw(text)
}

fn decode_raw(text: &str) -> Option<Value> {
    if text.is_empty() || text == "undefined" {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(text.to_string())),
    }
}

/// Display form used by template interpolation.
///
/// Absent renders as an empty string, strings verbatim, numbers in their
/// natural form (integral floats without a fraction) and everything else as
/// JSON text.
pub fn display(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => format_number(n),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Canonical, non-display form used as hashing input.
///
/// Unlike [`display`] this keeps absent (`undefined`) and strings (quoted JSON)
/// distinguishable from every other value.
pub fn canonical(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Format a JSON number the way a dynamic-language runtime prints it.
pub fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Hash an ordered list of text parts into a single content hash.
///
/// Parts are joined with `#`, doubling any `#` inside a part, so that
/// `["a#", "b"]` and `["a", "#b"]` hash differently.
pub fn content_hash<I, S>(parts: I) -> u64
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for part in parts {
        joined.push(HASH_SEPARATOR);
        for ch in part.as_ref().chars() {
            if ch == HASH_SEPARATOR {
                joined.push(HASH_SEPARATOR);
            }
            joined.push(ch);
        }
    }

    let mut hasher = DefaultHasher::new();
    joined.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_scalars_and_structures() {
        for value in [
            json!(true),
            json!(false),
            json!(0),
            json!(-17),
            json!(2.5),
            json!("plain text"),
            json!([1, "two", null]),
            json!({ "a": { "b": [1, 2] } }),
        ] {
            let encoded = encode(Some(&value));
            assert_eq!(decode(&encoded), Some(value.clone()), "round trip of {encoded}");
        }
    }

    #[test]
    fn test_strings_that_look_like_literals_are_quoted() {
        for text in ["true", "42", "", "undefined", "null", "\"quoted\"", "[1]"] {
            let value = json!(text);
            let encoded = encode(Some(&value));
            assert_eq!(decode(&encoded), Some(value), "round trip of {text:?}");
        }
        assert_eq!(encode(Some(&json!("hello"))), "hello");
    }

    #[test]
    fn test_absent_encodes_to_empty() {
        assert_eq!(encode(None), "");
        assert_eq!(decode(""), None);
        assert_eq!(decode("undefined"), None);
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(display(None), "");
        assert_eq!(display(Some(&json!("a<b"))), "a<b");
        assert_eq!(display(Some(&json!(10.0))), "10");
        assert_eq!(display(Some(&json!(1.5))), "1.5");
        assert_eq!(display(Some(&json!(null))), "null");
        assert_eq!(display(Some(&json!({"k": [1]}))), r#"{"k":[1]}"#);
    }

    #[test]
    fn test_content_hash_separates_parts() {
        assert_ne!(content_hash(["a#", "b"]), content_hash(["a", "#b"]));
        assert_eq!(content_hash(["x", "y"]), content_hash(["x", "y"]));
        assert_ne!(canonical(None), canonical(Some(&json!("undefined"))));
    }
}
