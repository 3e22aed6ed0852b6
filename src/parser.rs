//! HTML5 parser using html5ever
//!
//! Markup is parsed with html5ever, which implements the WHATWG parsing
//! algorithm, so malformed input (missing end tags, misnested inline elements)
//! is repaired the same way a browser would repair it.
//!
//! Two entry points are provided:
//!
//! - [`parse_html`] parses a complete document into an rcdom tree, used for
//!   metadata extraction.
//! - [`parse_fragment`] parses a markup fragment as the content of a `<body>`
//!   element and returns the owned tree the converter walks. A string that is
//!   already a whole document (`<!DOCTYPE ...>` or `<html ...>`) is parsed as
//!   such and its body is used.
//!
//! # Examples
//!
//! ```rust
//! use html2org::parser::parse_fragment;
//!
//! let root = parse_fragment("<h1>Hello", 512).expect("fragment parses");
//! assert_eq!(root.children[0].tag(), Some("h1"));
//! ```

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::dom::{Node, NodeKind};
use crate::error::{ConversionError, Result};

/// Prefix placing fragment markup inside an explicit body
const FRAGMENT_PREFIX: &str = "<!DOCTYPE html><html><head></head><body>";

/// Parse a complete HTML document into a DOM tree
///
/// html5ever never rejects input; malformed markup is repaired.
pub fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Parse a markup fragment into an owned tree rooted at a fragment node
///
/// # Errors
///
/// - `ConversionError::ResourceExhausted` if the markup nests deeper than
///   `max_depth`
/// - `ConversionError::Parse` if the parsed document has no body
pub fn parse_fragment(html: &str, max_depth: usize) -> Result<Node> {
    let dom = if is_whole_document(html) {
        parse_html(html)
    } else {
        let mut wrapped = String::with_capacity(FRAGMENT_PREFIX.len() + html.len());
        wrapped.push_str(FRAGMENT_PREFIX);
        wrapped.push_str(html);
        parse_html(&wrapped)
    };

    let body = find_element(&dom.document, "body")
        .ok_or_else(|| ConversionError::Parse("document has no body element".to_string()))?;

    // The owned copy must be taken while `dom` is alive
    let mut root = Node::from_handle(&body, max_depth)?;
    root.kind = NodeKind::Fragment;
    Ok(root)
}

fn is_whole_document(html: &str) -> bool {
    let head = html.trim_start();
    let head = &head.as_bytes()[..head.len().min(9)];
    head.len() >= 5
        && (head.eq_ignore_ascii_case(b"<!doctype")
            || head[..5].eq_ignore_ascii_case(b"<html"))
}

/// Find the first element named `tag` in document order
pub fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    let mut stack = vec![handle.clone()];
    while let Some(node) = stack.pop() {
        if let NodeData::Element { name, .. } = &node.data
            && &*name.local == tag
        {
            return Some(node);
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    None
}
