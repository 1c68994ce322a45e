//! # fair-attendance
//!
//! Loads the locally cached copy of the state fair attendance page and
//! parses it into a traversable HTML tree.
//!
//! ## Quick Start
//!
//! ```rust
//! use fair_attendance::{parse_html, ParserMode};
//!
//! let tree = parse_html("<div><p>unclosed", ParserMode::Lenient)?;
//! let p = tree.find("div").and_then(|div| div.find("p"));
//! assert_eq!(p.map(|p| p.text()).as_deref(), Some("unclosed"));
//! println!("{}", tree.type_name());
//! # Ok::<(), fair_attendance::Error>(())
//! ```
//!
//! Malformed markup is repaired by default. [`ParserMode::Strict`] rejects
//! markup with unclosed or misnested elements instead.

mod error;
mod loader;
mod options;
mod strict;

/// Parse tree handle and CSS selection.
pub mod dom;

/// Owned element/text tree.
pub mod tree;

/// Row view of tables.
pub mod table;

/// Charset sniffing and decoding.
pub mod encoding;

/// Stderr logger for the binary.
pub mod logging;

pub use dom::ParseTree;
pub use error::{Error, Result};
pub use loader::{load, load_with_options, parse_bytes, parse_html};
pub use options::{LoadOptions, ParserMode, DEFAULT_INPUT, DEFAULT_OUTPUT, SOURCE_URL};
pub use table::{Row, Table};
pub use tree::{Attribute, Element, Node};
