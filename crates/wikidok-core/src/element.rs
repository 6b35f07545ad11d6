//! Generic markup-element tree
//!
//! The HTML renderer produces a tree of elements rather than a string, so
//! callers can compose rendered fragments into larger documents before
//! serializing. `Display` serializes a tree with HTML escaping applied to
//! text content and attribute values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A child of an element: either a nested element or escaped literal text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Markup {
    Element(Element),
    Text(String),
}

/// One markup element: tag name, ordered attributes, ordered children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Markup>,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute, builder style
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a text child, builder style
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.children.push(Markup::Text(content.into()));
        self
    }

    /// Append a child
    pub fn push(&mut self, child: Markup) {
        self.children.push(child);
    }

    /// Whether the element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            write!(f, " {}=\"{}\"", name, escape_attribute(value))?;
        }
        if self.children.is_empty() {
            return write!(f, " />");
        }
        write!(f, ">")?;
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Markup::Element(element) => write!(f, "{}", element),
            Markup::Text(text) => f.write_str(&escape_text(text)),
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_nested_elements() {
        let mut p = Element::new("p");
        p.push(Markup::Text("see ".to_string()));
        p.push(Markup::Element(
            Element::new("a").attr("href", "x.html").text("X"),
        ));
        assert_eq!(p.to_string(), "<p>see <a href=\"x.html\">X</a></p>");
    }

    #[test]
    fn test_childless_element_self_closes() {
        assert_eq!(Element::new("hr").to_string(), "<hr />");
    }

    #[test]
    fn test_text_is_escaped() {
        let pre = Element::new("pre").text("a < b && c > d");
        assert_eq!(pre.to_string(), "<pre>a &lt; b &amp;&amp; c &gt; d</pre>");
    }

    #[test]
    fn test_attribute_quotes_escaped() {
        let a = Element::new("a").attr("title", "say \"hi\"");
        assert_eq!(a.to_string(), "<a title=\"say &quot;hi&quot;\" />");
    }

    #[test]
    fn test_serde_round_trip() {
        let element = Element::new("p")
            .attr("class", "body")
            .text("content");
        let json = serde_json::to_string(&element).unwrap();
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, element);
    }
}
