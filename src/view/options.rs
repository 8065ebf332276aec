use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::expr::Helpers;

/// Options for attaching a view, mirroring the property names.
///
/// Every field is optional; unset fields leave the corresponding property at
/// its default (or at the value already present on the container). Options
/// deserialize from camelCase JSON or TOML, so a whole configuration can come
/// from a file:
///
/// ```
/// use repeatkit::view::ViewOptions;
///
/// let options: ViewOptions = serde_json::from_str(
///     r#"{ "state": [1, 2, 3], "tag": "li", "limit": 2, "transitionExit": 150 }"#,
/// ).unwrap();
/// assert_eq!(options.limit, Some(2));
/// assert_eq!(options.tag.as_deref(), Some("li"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Wrap each list element as `<tag>{{$self}}</tag>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Expression computing each list element's key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Items per page; 0 disables paging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Milliseconds the enter class stays on inserted items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_enter: Option<u64>,
    /// Milliseconds a commit that removes items waits for their exit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_exit: Option<u64>,
    /// Extra functions callable from template expressions.
    #[serde(skip)]
    pub helpers: Option<Helpers>,
}

impl ViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_template_id(mut self, id: impl Into<String>) -> Self {
        self.template_id = Some(id.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_track_by(mut self, expression: impl Into<String>) -> Self {
        self.track_by = Some(expression.into());
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_transitions(mut self, enter_ms: u64, exit_ms: u64) -> Self {
        self.transition_enter = Some(enter_ms);
        self.transition_exit = Some(exit_ms);
        self
    }

    pub fn with_helpers(mut self, helpers: Helpers) -> Self {
        self.helpers = Some(helpers);
        self
    }

    /// Split into property values (set fields only) and helpers.
    pub fn into_properties(self) -> (Map<String, Value>, Option<Helpers>) {
        let helpers = self.helpers.clone();
        let properties = match serde_json::to_value(&self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        (properties, helpers)
    }
}
