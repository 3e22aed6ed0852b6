//! Table sub-converter
//!
//! A `<table>` is rendered as an Org table only when its structure maps onto
//! one without loss:
//!
//! - its element children are `tr` rows, or `thead`/`tbody`/`tfoot` sections
//!   holding only `tr` rows;
//! - every row holds at least one cell and only `th`/`td` cells;
//! - no cell spans more than one row or column;
//! - at most one row is a header row (a row inside `thead`, or a row made of
//!   `th` cells only), and it is the first row;
//! - there is at least one row.
//!
//! Anything else is reported back as non-conforming and the caller falls back
//! to its default block replacement.
//!
//! # Output
//!
//! ```text
//! | A | B |
//! |---+---|
//! | 1 | 2 |
//! ```
//!
//! Rows shorter than the widest row are padded with empty cells. Cell content
//! is converted by the engine like any other content, then flattened to one
//! line, and `|` becomes the Org entity `\vert{}`.

use log::debug;

use crate::dom::{Node, NodeKind};
use crate::error::Result;
use crate::node::NodeView;

/// Whether `node` should be handed to the table sub-converter
pub fn is_table(node: &Node) -> bool {
    node.tag() == Some("table")
}

/// Convert a table, or `None` when its structure does not conform
///
/// `convert_cell` converts the children of one cell.
pub fn convert_table<F>(table: &NodeView<'_>, mut convert_cell: F) -> Result<Option<String>>
where
    F: FnMut(&NodeView<'_>) -> Result<String>,
{
    let has_header = match check_structure(table.node) {
        Ok(has_header) => has_header,
        Err(reason) => {
            debug!("table left unformatted: {reason}");
            return Ok(None);
        }
    };

    let mut rows: Vec<Vec<String>> = Vec::new();
    for child in table.children() {
        match child.tag() {
            Some("tr") => rows.push(convert_row(&child, &mut convert_cell)?),
            Some("thead" | "tbody" | "tfoot") => {
                for row in child.children() {
                    if row.tag() == Some("tr") {
                        rows.push(convert_row(&row, &mut convert_cell)?);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(Some(render(&rows, has_header)))
}

fn convert_row<F>(row: &NodeView<'_>, convert_cell: &mut F) -> Result<Vec<String>>
where
    F: FnMut(&NodeView<'_>) -> Result<String>,
{
    let mut cells = Vec::new();
    for cell in row.children() {
        if cell.is_element() {
            cells.push(cell_text(&convert_cell(&cell)?));
        }
    }
    Ok(cells)
}

/// Flatten converted cell content onto one line
fn cell_text(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_newlines = false;
    for c in content.chars() {
        if c == '\n' || c == '\r' {
            if !in_newlines {
                out.push(' ');
            }
            in_newlines = true;
        } else {
            out.push(c);
            in_newlines = false;
        }
    }
    out.trim().replace('|', "\\vert{}")
}

fn render(rows: &[Vec<String>], has_header: bool) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or_default();
    let mut output = String::from("\n\n");

    for (index, row) in rows.iter().enumerate() {
        output.push('|');
        for column in 0..columns {
            output.push(' ');
            if let Some(cell) = row.get(column) {
                output.push_str(cell);
            }
            output.push_str(" |");
        }
        output.push('\n');

        if index == 0 && has_header {
            output.push('|');
            output.push_str(&vec!["---"; columns].join("+"));
            output.push_str("|\n");
        }
    }

    output.push('\n');
    output
}

/// Validate the table layout; returns whether the first row is a header
fn check_structure(table: &Node) -> std::result::Result<bool, String> {
    let mut header_rows = Vec::new();
    let mut row_count = 0usize;

    for child in significant_children(table)? {
        match child.tag() {
            Some("tr") => {
                check_row(child)?;
                if is_header_row(child, false) {
                    header_rows.push(row_count);
                }
                row_count += 1;
            }
            Some(section @ ("thead" | "tbody" | "tfoot")) => {
                for row in significant_children(child)? {
                    if row.tag() != Some("tr") {
                        return Err(format!("<{section}> contains a non-row element"));
                    }
                    check_row(row)?;
                    if is_header_row(row, section == "thead") {
                        header_rows.push(row_count);
                    }
                    row_count += 1;
                }
            }
            Some(tag) => return Err(format!("<table> contains <{tag}>")),
            None => {}
        }
    }

    if row_count == 0 {
        return Err("table has no rows".to_string());
    }
    match header_rows.as_slice() {
        [] => Ok(false),
        [0] => Ok(true),
        [_] => Err("header row is not the first row".to_string()),
        _ => Err(format!("table has {} header rows", header_rows.len())),
    }
}

fn check_row(row: &Node) -> std::result::Result<(), String> {
    let cells = significant_children(row)?;
    if cells.is_empty() {
        return Err("row has no cells".to_string());
    }
    for cell in cells {
        match cell.tag() {
            Some("th" | "td") => {
                for span in ["rowspan", "colspan"] {
                    let value = cell
                        .attr(span)
                        .and_then(|v| v.trim().parse::<u32>().ok())
                        .unwrap_or(1);
                    if value > 1 {
                        return Err(format!("cell has {span}={value}"));
                    }
                }
            }
            Some(tag) => return Err(format!("row contains <{tag}>")),
            None => return Err("row contains text outside cells".to_string()),
        }
    }
    Ok(())
}

fn is_header_row(row: &Node, in_thead: bool) -> bool {
    in_thead || row.element_children().all(|cell| cell.tag() == Some("th"))
}

/// Children other than whitespace-only text; fails on stray text
fn significant_children(node: &Node) -> std::result::Result<Vec<&Node>, String> {
    let mut out = Vec::new();
    for child in &node.children {
        match &child.kind {
            NodeKind::Text(text) if text.trim().is_empty() => {}
            NodeKind::Text(_) => {
                return Err(format!(
                    "<{}> contains text outside cells",
                    node.tag().unwrap_or_default()
                ));
            }
            _ => out.push(child),
        }
    }
    Ok(out)
}
