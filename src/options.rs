//! Configuration options for loading the attendance page.
//!
//! `LoadOptions` controls which file is read and how strictly its markup is
//! parsed. Fields are public; override the ones you need with struct-update
//! syntax.

use std::path::PathBuf;

/// Cached copy of the attendance page, read from the working directory.
pub const DEFAULT_INPUT: &str = "fair_raw.html";

/// Name reserved for the cleaned table export. Nothing writes to it.
pub const DEFAULT_OUTPUT: &str = "fair_clean.csv";

/// Page the cached copy was taken from. Never requested.
pub const SOURCE_URL: &str = "https://www.ncstatefair.org/2023/Newsroom/attendance.htm";

/// How the parser treats malformed markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParserMode {
    /// Repair malformed markup the way browsers do. Never fails.
    #[default]
    Lenient,
    /// Reject markup whose non-void elements are left unclosed or closed
    /// out of order.
    Strict,
}

/// Configuration options for [`load_with_options`](crate::load_with_options).
///
/// # Example
///
/// ```rust
/// use fair_attendance::{LoadOptions, ParserMode};
///
/// let options = LoadOptions {
///     input: "cache/page.html".into(),
///     mode: ParserMode::Strict,
///     ..LoadOptions::default()
/// };
/// assert_eq!(options.output.to_str(), Some("fair_clean.csv"));
/// ```
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// File containing the HTML to parse.
    ///
    /// Default: `fair_raw.html`
    pub input: PathBuf,

    /// Reserved export path.
    ///
    /// Default: `fair_clean.csv`
    pub output: PathBuf,

    /// URL of the page the input was saved from.
    ///
    /// Only used as the base for resolving relative links.
    ///
    /// Default: the attendance page URL
    pub source_url: Option<String>,

    /// Parser strictness.
    ///
    /// Default: `ParserMode::Lenient`
    pub mode: ParserMode,

    /// Keep text leaves that contain only whitespace.
    ///
    /// Default: `true`
    pub keep_whitespace_text: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            source_url: Some(SOURCE_URL.to_string()),
            mode: ParserMode::Lenient,
            keep_whitespace_text: true,
        }
    }
}

impl LoadOptions {
    /// Default options reading from `input`.
    #[must_use]
    pub fn for_path(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }
}
