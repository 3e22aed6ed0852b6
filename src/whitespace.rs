//! Whitespace collapsing
//!
//! Runs over the converter's private copy of the tree before traversal and
//! reproduces how a browser renders inter-element whitespace:
//!
//! - runs of `[ \t\r\n]` become a single space;
//! - a leading space is dropped when the previous text already ended with
//!   one, or when nothing precedes it since the last block or `br` boundary;
//! - a trailing space before a block/`br` boundary, or at the very end, is
//!   dropped;
//! - void elements and `pre` protect the leading space of the text after them;
//! - text that ends up empty is removed.
//!
//! `pre` subtrees are left untouched.

use crate::dom::{Node, NodeKind};
use crate::node::{is_block_tag, is_void_tag};

/// What the walk sees, in visiting order
#[derive(Clone, Copy)]
enum Event {
    /// Index into the collected text slots
    Text(usize),
    /// Block element or `br`
    Boundary,
    /// Void element or `pre`
    Protect,
    Inline,
}

/// Collapse whitespace in all text below `root`
pub fn collapse_whitespace(root: &mut Node) {
    if root.tag() == Some("pre") {
        return;
    }

    let mut events = Vec::new();
    let mut texts: Vec<&mut String> = Vec::new();
    for child in root.children.iter_mut() {
        collect_events(child, &mut events, &mut texts);
    }

    let mut prev_text: Option<usize> = None;
    let mut keep_leading = false;

    for event in events {
        match event {
            Event::Text(index) => {
                let mut collapsed = collapse_runs(&texts[index]);
                let prev_ends_with_space =
                    prev_text.is_none_or(|prev| texts[prev].ends_with(' '));
                if prev_ends_with_space && !keep_leading && collapsed.starts_with(' ') {
                    collapsed.remove(0);
                }
                let is_empty = collapsed.is_empty();
                *texts[index] = collapsed;
                if !is_empty {
                    prev_text = Some(index);
                }
            }
            Event::Boundary => {
                if let Some(prev) = prev_text.take() {
                    strip_trailing_space(&mut texts[prev]);
                }
                keep_leading = false;
            }
            Event::Protect => {
                prev_text = None;
                keep_leading = true;
            }
            Event::Inline => {
                if prev_text.is_some() {
                    keep_leading = false;
                }
            }
        }
    }

    if let Some(prev) = prev_text {
        strip_trailing_space(&mut texts[prev]);
    }

    drop(texts);
    remove_empty_text(root);
}

/// Record events for `node`: elements on entry, and again on exit when they
/// have children
fn collect_events<'a>(
    node: &'a mut Node,
    events: &mut Vec<Event>,
    texts: &mut Vec<&'a mut String>,
) {
    let (event, is_pre) = match &mut node.kind {
        NodeKind::Text(text) => {
            events.push(Event::Text(texts.len()));
            texts.push(text);
            return;
        }
        NodeKind::Element { tag, .. } => {
            let tag = tag.as_str();
            let event = if is_block_tag(tag) || tag == "br" {
                Event::Boundary
            } else if is_void_tag(tag) || tag == "pre" {
                Event::Protect
            } else {
                Event::Inline
            };
            (event, tag == "pre")
        }
        NodeKind::Document | NodeKind::Fragment => (Event::Boundary, false),
    };

    events.push(event);
    if is_pre || node.children.is_empty() {
        return;
    }
    for child in node.children.iter_mut() {
        collect_events(child, events, texts);
    }
    events.push(event);
}

fn collapse_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if matches!(c, ' ' | '\t' | '\r' | '\n') {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

fn strip_trailing_space(text: &mut String) {
    if text.ends_with(' ') {
        text.pop();
    }
}

fn remove_empty_text(node: &mut Node) {
    if node.tag() == Some("pre") {
        return;
    }
    node.children
        .retain(|child| !matches!(&child.kind, NodeKind::Text(text) if text.is_empty()));
    for child in node.children.iter_mut() {
        remove_empty_text(child);
    }
}
