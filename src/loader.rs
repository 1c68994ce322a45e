//! Reading and parsing the cached page.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use dom_query::Document;

use crate::dom::ParseTree;
use crate::encoding;
use crate::error::{Error, Result};
use crate::options::{LoadOptions, ParserMode};
use crate::strict;

/// Parse HTML text into a tree.
///
/// # Errors
///
/// Lenient parsing never fails. Strict parsing returns [`Error::Parse`] for
/// markup that is not properly closed.
pub fn parse_html(html: &str, mode: ParserMode) -> Result<ParseTree> {
    parse_decoded(html, "UTF-8", mode, true)
}

/// Parse raw page bytes, decoding them with the declared charset.
///
/// # Errors
///
/// Same as [`parse_html`].
pub fn parse_bytes(bytes: &[u8], mode: ParserMode) -> Result<ParseTree> {
    let page = encoding::decode(bytes);
    if page.had_errors {
        log::warn!("input is not valid {}; replaced undecodable bytes", page.encoding.name());
    }
    parse_decoded(&page.text, page.encoding.name(), mode, true)
}

fn parse_decoded(
    html: &str,
    encoding: &'static str,
    mode: ParserMode,
    keep_whitespace_text: bool,
) -> Result<ParseTree> {
    if mode == ParserMode::Strict {
        strict::check(html)?;
    }

    let tree = ParseTree::new(Document::from(html), encoding, keep_whitespace_text);
    log::debug!(
        "parsed {} chars into {} elements ({encoding})",
        html.len(),
        tree.element_count()
    );
    Ok(tree)
}

/// Load and leniently parse the HTML file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
pub fn load(path: impl AsRef<Path>) -> Result<ParseTree> {
    load_with_options(&LoadOptions::for_path(path.as_ref()))
}

/// Load and parse the file named by `options.input`.
///
/// The file is closed before parsing starts, whether or not reading
/// succeeded.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, and
/// [`Error::Parse`] in strict mode for malformed markup.
pub fn load_with_options(options: &LoadOptions) -> Result<ParseTree> {
    let bytes = read_document(&options.input)?;
    log::debug!("read {} bytes from {}", bytes.len(), options.input.display());

    let page = encoding::decode(&bytes);
    if page.had_errors {
        log::warn!(
            "{} is not valid {}; replaced undecodable bytes",
            options.input.display(),
            page.encoding.name()
        );
    }

    let tree = parse_decoded(
        &page.text,
        page.encoding.name(),
        options.mode,
        options.keep_whitespace_text,
    )?;
    Ok(tree.with_base_url(options.source_url.as_deref()))
}

fn read_document(path: &Path) -> Result<Vec<u8>> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_err)?;
    Ok(bytes)
}
