//! View tree nodes
//!
//! A small owned mirror of the DOM subtree the renderer wants to create.
//! The presenter turns it into real elements; tests and the HTML preview
//! inspect it directly.

use serde::Serialize;

/// A node in the view tree
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ViewNode {
    Element(ViewElement),
    Text { text: String },
}

impl ViewNode {
    pub fn text(text: impl Into<String>) -> Self {
        ViewNode::Text { text: text.into() }
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        match self {
            ViewNode::Text { text } => text.clone(),
            ViewNode::Element(el) => el.text_content(),
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            ViewNode::Text { text } => escape_into(text, out),
            ViewNode::Element(el) => el.write_html(out),
        }
    }
}

impl From<ViewElement> for ViewNode {
    fn from(el: ViewElement) -> Self {
        ViewNode::Element(el)
    }
}

/// An element with an optional id and class
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ViewElement {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    pub children: Vec<ViewNode>,
}

impl ViewElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            class: None,
            children: Vec::new(),
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    pub fn push(&mut self, node: impl Into<ViewNode>) {
        self.children.push(node.into());
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(ViewNode::text(text));
    }

    /// Child elements, skipping text nodes
    pub fn elements(&self) -> impl Iterator<Item = &ViewElement> {
        self.children.iter().filter_map(|child| match child {
            ViewNode::Element(el) => Some(el),
            ViewNode::Text { .. } => None,
        })
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(ViewNode::text_content).collect()
    }

    /// Depth-first search for an element by id, including `self`
    pub fn find_by_id(&self, id: &str) -> Option<&ViewElement> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.elements().find_map(|el| el.find_by_id(id))
    }

    /// All elements (including `self`) carrying `class`, in document order
    pub fn find_by_class(&self, class: &str) -> Vec<&ViewElement> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a ViewElement>) {
        if self.class.as_deref() == Some(class) {
            found.push(self);
        }
        for el in self.elements() {
            el.collect_by_class(class, found);
        }
    }

    /// Serialize as HTML; text and attribute values are escaped
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.id {
            out.push_str(" id=\"");
            escape_into(id, out);
            out.push('"');
        }
        if let Some(class) = &self.class {
            out.push_str(" class=\"");
            escape_into(class, out);
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
