//! Parse tree handle built on `dom_query`.
//!
//! `dom_query` does the actual HTML5 tree construction (and its error
//! recovery). The resulting DOM is snapshotted into the owned [`Element`]
//! tree for traversal, and kept alongside it for CSS selection.

use std::fmt;

use dom_query::{Document, Matcher, NodeRef};
use tendril::StrTendril;
use url::Url;

use crate::error::{Error, Result};
use crate::table::Table;
use crate::tree::{Attribute, Element, Node};

/// A parsed HTML document.
///
/// Equality is structural: two trees are equal when their element/text
/// structure is, wherever they came from.
pub struct ParseTree {
    document: Document,
    root: Element,
    encoding: &'static str,
    base_url: Option<Url>,
}

impl ParseTree {
    pub(crate) fn new(
        document: Document,
        encoding: &'static str,
        keep_whitespace_text: bool,
    ) -> Self {
        let root = document
            .select("html")
            .nodes()
            .first()
            .map_or_else(
                || Element::new("html", Vec::new(), Vec::new()),
                |node| snapshot(node, keep_whitespace_text),
            );

        Self {
            document,
            root,
            encoding,
            base_url: None,
        }
    }

    /// Use `base` to resolve relative links. Unparseable bases are ignored.
    #[must_use]
    pub fn with_base_url(mut self, base: Option<&str>) -> Self {
        self.base_url = base.and_then(|b| match Url::parse(b) {
            Ok(url) => Some(url),
            Err(err) => {
                log::warn!("ignoring base URL {b:?}: {err}");
                None
            }
        });
        self
    }

    /// Name of this tree's type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The `<html>` element.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Encoding the source bytes were decoded with.
    #[must_use]
    pub fn encoding(&self) -> &'static str {
        self.encoding
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Elements named `tag`, root included.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.root.subtree().filter(move |el| el.is(tag))
    }

    #[must_use]
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.root.subtree().find(|el| el.is(tag))
    }

    /// Elements carrying attribute `name`, optionally with exactly `value`.
    pub fn find_by_attr<'a>(
        &'a self,
        name: &'a str,
        value: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.root
            .subtree()
            .filter(move |el| crate::tree::attr_matches(el, name, value))
    }

    /// Elements whose own text contains `needle`.
    pub fn find_by_text<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.root
            .subtree()
            .filter(move |el| el.own_text().contains(needle))
    }

    /// Elements matching CSS selector `css`, as owned snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selector`] if `css` is not a valid selector.
    pub fn select(&self, css: &str) -> Result<Vec<Element>> {
        let matcher = Matcher::new(css).map_err(|_| Error::Selector(css.to_string()))?;
        let selection = self.document.select_matcher(&matcher);
        Ok(selection
            .nodes()
            .iter()
            .filter(|node| node.is_element())
            .map(|node| snapshot(node, true))
            .collect())
    }

    /// All text in the document.
    #[must_use]
    pub fn text(&self) -> String {
        self.root.text()
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.root.element_count()
    }

    /// `href` targets of every element carrying one (`<a>`, `<area>`,
    /// `<link>` and so on) except `<base>`, in document order. Relative
    /// targets resolve against the first `<base href>`, itself resolved
    /// against the base URL. Targets that cannot be resolved are skipped.
    #[must_use]
    pub fn links(&self) -> Vec<Url> {
        let base = self.document_base();

        self.find_by_attr("href", None)
            .filter(|el| !el.is("base"))
            .filter_map(|el| el.attr("href"))
            .filter_map(|href| {
                resolve(base.as_ref(), href)
                    .map_err(|err| log::debug!("skipping link {href:?}: {err}"))
                    .ok()
            })
            .collect()
    }

    /// Base for relative links: the first `<base href>` when it resolves,
    /// otherwise the configured base URL.
    fn document_base(&self) -> Option<Url> {
        let declared = self.find("base").and_then(|el| el.attr("href"));
        match declared.map(|href| resolve(self.base_url.as_ref(), href)) {
            Some(Ok(url)) => Some(url),
            Some(Err(err)) => {
                log::debug!("ignoring <base href>: {err}");
                self.base_url.clone()
            }
            None => self.base_url.clone(),
        }
    }

    /// Every `<table>` in document order.
    #[must_use]
    pub fn tables(&self) -> Vec<Table> {
        self.find_all("table").map(Table::from_element).collect()
    }

    /// The tree as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }
}

impl PartialEq for ParseTree {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Eq for ParseTree {}

impl fmt::Debug for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseTree")
            .field("encoding", &self.encoding)
            .field("elements", &self.element_count())
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .finish_non_exhaustive()
    }
}

fn resolve(base: Option<&Url>, href: &str) -> std::result::Result<Url, url::ParseError> {
    match base {
        Some(base) => base.join(href.trim()),
        None => Url::parse(href.trim()),
    }
}

/// Copy an element node and everything below it into the owned tree.
fn snapshot(node: &NodeRef, keep_whitespace_text: bool) -> Element {
    let name: StrTendril = node.node_name().unwrap_or_default();
    let attrs = node
        .attrs()
        .iter()
        .map(|attr| Attribute {
            name: attr.name.local.to_string(),
            value: attr.value.to_string(),
        })
        .collect();

    let mut children = Vec::new();
    for child in node.children() {
        if child.is_element() {
            children.push(Node::Element(snapshot(&child, keep_whitespace_text)));
        } else if child.is_text() {
            let text: StrTendril = child.text();
            if keep_whitespace_text || !text.trim().is_empty() {
                children.push(Node::Text(text.to_string()));
            }
        }
    }

    Element::new(&name, attrs, children)
}
