//! Well-formedness scan for [`ParserMode::Strict`](crate::ParserMode::Strict).
//!
//! The HTML tree builder repairs everything it is given, so strict mode runs
//! this scan over the source first. Every non-void element has to be closed
//! explicitly and in nesting order. Comments, doctypes and the bodies of raw
//! text elements are skipped.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::tree::is_void_tag;

/// Comments, doctype/processing declarations, and start or end tags.
#[allow(clippy::expect_used)]
static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<!--.*?-->|<![^>]*>|<\?[^>]*>|<(/?)([A-Za-z][A-Za-z0-9:-]*)(?:[^>"']|"[^"]*"|'[^']*')*?(/?)>"#)
        .expect("valid regex")
});

/// Elements whose content is not markup.
const RAW_TEXT: &[&str] = &["script", "style", "textarea", "title", "xmp"];

/// Roots of foreign (SVG/MathML) content, where `/>` closes any element.
const FOREIGN_ROOTS: &[&str] = &["svg", "math"];

struct Open {
    name: String,
    line: usize,
}

/// Check that every element in `html` is properly closed.
///
/// # Errors
///
/// Returns [`Error::Parse`] describing the first stray end tag, mismatched
/// end tag, or element still open at end of input.
pub fn check(html: &str) -> Result<()> {
    // ASCII lowercasing keeps byte offsets aligned with `html`
    let lower = html.to_ascii_lowercase();
    let mut lines = LineCounter::default();
    let mut stack: Vec<Open> = Vec::new();
    let mut pos = 0;

    while let Some(caps) = MARKUP.captures_at(html, pos) {
        let Some(whole) = caps.get(0) else { break };
        pos = whole.end();

        let Some(name) = caps.get(2) else {
            continue; // comment or declaration
        };
        let name = name.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
        let line = lines.line_at(html, whole.start());

        if closing {
            if is_void_tag(&name) {
                continue;
            }
            match stack.pop() {
                Some(open) if open.name == name => {}
                Some(open) => {
                    return Err(Error::Parse {
                        line,
                        message: format!(
                            "</{name}> does not match <{}> opened on line {}",
                            open.name, open.line
                        ),
                    });
                }
                None => {
                    return Err(Error::Parse {
                        line,
                        message: format!("stray end tag </{name}>"),
                    });
                }
            }
        } else if is_void_tag(&name) || (self_closing && allows_self_closing(&stack, &name)) {
            continue;
        } else if RAW_TEXT.contains(&name.as_str()) {
            pos = match find_end_tag(html, &lower, pos, &name) {
                Some(end) => end,
                None => {
                    return Err(Error::Parse {
                        line,
                        message: format!("<{name}> is never closed"),
                    });
                }
            };
        } else {
            stack.push(Open { name, line });
        }
    }

    match stack.pop() {
        Some(open) => Err(Error::Parse {
            line: open.line,
            message: format!("<{}> is never closed", open.name),
        }),
        None => Ok(()),
    }
}

/// A trailing `/` only closes void elements and SVG/MathML content; on any
/// other HTML element the parser ignores it and leaves the element open.
fn allows_self_closing(stack: &[Open], name: &str) -> bool {
    FOREIGN_ROOTS.contains(&name)
        || stack
            .iter()
            .any(|open| FOREIGN_ROOTS.contains(&open.name.as_str()))
}

/// Byte offset just past the `</name>` that ends a raw text element.
///
/// `lower` is the ASCII-lowercased copy of `html`.
fn find_end_tag(html: &str, lower: &str, from: usize, name: &str) -> Option<usize> {
    let needle = format!("</{name}");
    let start = lower.get(from..)?.find(&needle)? + from;
    let close = html[start..].find('>')?;
    Some(start + close + 1)
}

/// 1-based line numbers for increasing byte offsets.
#[derive(Default)]
struct LineCounter {
    offset: usize,
    line: usize,
}

impl LineCounter {
    fn line_at(&mut self, html: &str, offset: usize) -> usize {
        self.line += html[self.offset..offset].bytes().filter(|&b| b == b'\n').count();
        self.offset = offset;
        self.line + 1
    }
}
