//! Owned parse tree.
//!
//! Nodes are either elements (tag name, ordered attributes, ordered children)
//! or text leaves. Comments, doctypes and processing instructions are not
//! represented. Trees compare structurally.

use serde::Serialize;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Whether `tag` is a void element (never has children or an end tag).
#[must_use]
pub fn is_void_tag(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// A node in the parse tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Element(_) => None,
        }
    }

    #[must_use]
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

/// A single attribute, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    name: String,
    attrs: Vec<Attribute>,
    children: Vec<Node>,
}

impl Element {
    /// Build an element. The tag name is lowercased.
    #[must_use]
    pub fn new(name: &str, attrs: Vec<Attribute>, children: Vec<Node>) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attrs,
            children,
        }
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    /// Value of attribute `name`, matched ASCII case-insensitively.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    #[must_use]
    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct element children, skipping text.
    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &Element> + '_ {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Text of all descendant text leaves, in document order.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => el.push_text(out),
            }
        }
    }

    /// Text of the direct text children only.
    #[must_use]
    pub fn own_text(&self) -> String {
        self.children.iter().filter_map(Node::as_text).collect()
    }

    /// All elements below this one, in document order.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        let mut iter = self.subtree();
        iter.next();
        iter
    }

    /// This element followed by its descendants.
    #[must_use]
    pub fn subtree(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Descendants with tag name `tag`.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |el| el.is(tag))
    }

    /// First descendant with tag name `tag`.
    #[must_use]
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.descendants().find(|el| el.is(tag))
    }

    /// Descendants carrying attribute `name`; with `value`, only those whose
    /// value is exactly `value`.
    pub fn find_by_attr<'a>(
        &'a self,
        name: &'a str,
        value: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants()
            .filter(move |el| attr_matches(el, name, value))
    }

    /// Descendants whose own text contains `needle`.
    pub fn find_by_text<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants()
            .filter(move |el| el.own_text().contains(needle))
    }

    /// Number of elements in this subtree, including this one.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.subtree().count()
    }
}

pub(crate) fn attr_matches(el: &Element, name: &str, value: Option<&str>) -> bool {
    match (el.attr(name), value) {
        (Some(actual), Some(wanted)) => actual == wanted,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Pre-order walk over elements.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let el = self.stack.pop()?;
        self.stack.extend(el.child_elements().rev());
        Some(el)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    fn el(name: &str, attrs: &[(&str, &str)], children: Vec<Node>) -> Node {
        let attrs = attrs
            .iter()
            .map(|(n, v)| Attribute {
                name: (*n).to_string(),
                value: (*v).to_string(),
            })
            .collect();
        Node::Element(Element::new(name, attrs, children))
    }

    fn sample() -> Element {
        let Node::Element(root) = el(
            "div",
            &[("id", "attendance")],
            vec![
                el("h2", &[], vec![text("2023 Attendance")]),
                el(
                    "table",
                    &[("class", "days")],
                    vec![el(
                        "tr",
                        &[],
                        vec![
                            el("td", &[], vec![text("Friday")]),
                            el("td", &[("data-count", "61,030")], vec![text("61,030")]),
                        ],
                    )],
                ),
                text(" total "),
            ],
        ) else {
            unreachable!()
        };
        root
    }

    #[test]
    fn test_tag_names_are_lowercased() {
        let el = Element::new("TABLE", vec![], vec![]);
        assert_eq!(el.name(), "table");
        assert!(el.is("Table"));
    }

    #[test]
    fn test_attr_lookup_is_case_insensitive() {
        let root = sample();
        assert_eq!(root.attr("ID"), Some("attendance"));
        assert!(!root.has_attr("class"));
    }

    #[test]
    fn test_descendants_are_in_document_order() {
        let root = sample();
        let names: Vec<_> = root.descendants().map(Element::name).collect();
        assert_eq!(names, ["h2", "table", "tr", "td", "td"]);
    }

    #[test]
    fn test_subtree_includes_self() {
        assert_eq!(sample().subtree().next().map(Element::name), Some("div"));
        assert_eq!(sample().element_count(), 6);
    }

    #[test]
    fn test_find_by_tag() {
        let root = sample();
        assert_eq!(root.find_all("td").count(), 2);
        assert_eq!(root.find("h2").map(Element::text).as_deref(), Some("2023 Attendance"));
        assert!(root.find("span").is_none());
    }

    #[test]
    fn test_find_by_attr() {
        let root = sample();
        assert_eq!(root.find_by_attr("class", None).count(), 1);
        assert_eq!(root.find_by_attr("data-count", Some("61,030")).count(), 1);
        assert_eq!(root.find_by_attr("data-count", Some("0")).count(), 0);
    }

    #[test]
    fn test_find_by_text_uses_own_text() {
        let root = sample();
        let hits: Vec<_> = root.find_by_text("Friday").map(Element::name).collect();
        assert_eq!(hits, ["td"]);
    }

    #[test]
    fn test_text_and_own_text() {
        let root = sample();
        assert_eq!(root.text(), "2023 AttendanceFriday61,030 total ");
        assert_eq!(root.own_text(), " total ");
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(sample(), sample());
        let other = Element::new("div", vec![], vec![]);
        assert_ne!(sample(), other);
    }

    #[test]
    fn test_void_tags() {
        assert!(is_void_tag("br"));
        assert!(is_void_tag("IMG"));
        assert!(!is_void_tag("td"));
    }

    #[test]
    fn test_serializes_with_node_kind() {
        let json = serde_json::to_value(Node::Text("x".into())).unwrap_or_default();
        assert_eq!(json, serde_json::json!({ "text": "x" }));
    }
}
