//! Row view of `<table>` elements.
//!
//! Cells are reduced to their whitespace-normalized text. No column naming
//! or value cleaning happens here.

#![allow(clippy::expect_used)]

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::tree::Element;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN regex"));

/// One `<tr>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub cells: Vec<String>,
    /// Every cell in the row is a `<th>`.
    pub header: bool,
}

/// Rows of a single table, nested tables excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub id: Option<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Collect the rows of `table`. Rows belonging to tables nested inside
    /// it are left to those tables.
    #[must_use]
    pub fn from_element(table: &Element) -> Self {
        let mut rows = Vec::new();
        collect_rows(table, &mut rows);
        Self {
            id: table.attr("id").map(str::to_string),
            rows,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row, in cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// Leading header rows.
    pub fn header_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().take_while(|r| r.header)
    }

    /// Rows after the leading header rows.
    pub fn body_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().skip_while(|r| r.header)
    }
}

fn collect_rows(parent: &Element, rows: &mut Vec<Row>) {
    for child in parent.child_elements() {
        if child.is("tr") {
            rows.push(row_of(child));
        } else if !child.is("table") {
            collect_rows(child, rows);
        }
    }
}

fn row_of(tr: &Element) -> Row {
    let cells: Vec<&Element> = tr
        .child_elements()
        .filter(|c| c.is("td") || c.is("th"))
        .collect();
    let header = !cells.is_empty() && cells.iter().all(|c| c.is("th"));

    Row {
        cells: cells.iter().map(|c| normalize_ws(&c.text())).collect(),
        header,
    }
}

/// Collapse whitespace runs to single spaces and trim.
#[must_use]
pub fn normalize_ws(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_html;
    use crate::options::ParserMode;

    fn tables_of(html: &str) -> Vec<Table> {
        parse_html(html, ParserMode::Lenient)
            .map(|tree| tree.tables())
            .unwrap_or_default()
    }

    #[test]
    fn test_rows_and_header_detection() {
        let tables = tables_of(
            r#"<table id="daily">
                 <thead><tr><th>Day</th><th>Attendance</th></tr></thead>
                 <tbody>
                   <tr><td>Thursday,
                        Oct. 12</td><td>51,102</td></tr>
                   <tr><td>Friday</td><td>61,030</td></tr>
                 </tbody>
               </table>"#,
        );

        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.id.as_deref(), Some("daily"));
        assert_eq!(table.width(), 2);
        assert_eq!(table.header_rows().count(), 1);
        let body: Vec<_> = table.body_rows().map(|r| r.cells.clone()).collect();
        assert_eq!(body, vec![vec!["Thursday, Oct. 12", "51,102"], vec!["Friday", "61,030"]]);
    }

    #[test]
    fn test_nested_tables_keep_their_own_rows() {
        let tables = tables_of(
            "<table><tr><td>outer<table><tr><td>inner</td></tr></table></td></tr></table>",
        );

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows.len(), 1);
        assert_eq!(tables[1].rows[0].cells, vec!["inner"]);
    }

    #[test]
    fn test_rows_without_tbody_are_found() {
        // the tree builder inserts the missing <tbody>
        let tables = tables_of("<table><tr><td>a</td></tr><tr><td>b</td></tr></table>");
        assert_eq!(tables[0].rows.len(), 2);
        assert!(!tables[0].rows[0].header);
    }

    #[test]
    fn test_empty_table() {
        let tables = tables_of("<table></table>");
        assert!(tables[0].is_empty());
        assert_eq!(tables[0].width(), 0);
    }

    #[test]
    fn test_normalize_ws() {
        assert_eq!(normalize_ws("  61,030 \n\t people "), "61,030 people");
    }
}
