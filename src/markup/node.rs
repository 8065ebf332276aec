//! Markup tree nodes.

/// A node of a parsed markup fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Text as markup: entities stay encoded, except inside raw-text elements.
    Text(String),
    Comment(String),
    /// Already-rendered markup that later passes must leave untouched.
    Raw(String),
}

/// A single attribute; `value` is `None` for bare attributes like `disabled`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_deref().unwrap_or(""))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = Some(value.into());
        match self.attributes.iter_mut().find(|attr| attr.name.eq_ignore_ascii_case(name)) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn classes(&self) -> Vec<&str> {
        self.attribute("class").map(|c| c.split_whitespace().collect()).unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().contains(&class)
    }

    /// Add a class unless already present.
    pub fn add_class(&mut self, class: &str) {
        if class.is_empty() || self.has_class(class) {
            return;
        }
        let mut classes: Vec<String> = self.classes().into_iter().map(str::to_string).collect();
        classes.push(class.to_string());
        self.set_attribute("class", classes.join(" "));
    }

    /// Remove a class; the `class` attribute stays even when it becomes empty.
    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let classes: Vec<String> = self
            .classes()
            .into_iter()
            .filter(|c| *c != class)
            .map(str::to_string)
            .collect();
        self.set_attribute("class", classes.join(" "));
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }
}

/// Elements that never have children or a closing tag.
pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose text content is taken literally, with no entity decoding.
pub(crate) fn is_raw_text_element(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript"
    )
}
