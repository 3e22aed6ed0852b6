//! Node model
//!
//! A [`NodeView`] is the read-only projection of one tree node that rules see
//! while it is being converted: its tag classification, whether it sits in a
//! code context, whether it is blank, and the whitespace that must be
//! re-attached around its replacement once the content has been trimmed.
//!
//! Views are built fresh for every visited node and borrow their parent's view,
//! so rules can look upwards (`li` inside `ol`) and sideways (next sibling)
//! without the engine ever mutating the tree.

use crate::dom::{Node, NodeKind};

/// Elements rendered as blocks, separated from their surroundings by a blank line
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "audio",
    "blockquote",
    "body",
    "canvas",
    "center",
    "dd",
    "dir",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "frameset",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "html",
    "isindex",
    "li",
    "main",
    "menu",
    "nav",
    "noframes",
    "noscript",
    "ol",
    "output",
    "p",
    "pre",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

/// Elements that never have content
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Elements that carry meaning even without text
const MEANINGFUL_WHEN_BLANK: &[&str] = &[
    "a", "table", "thead", "tbody", "tfoot", "th", "td", "iframe", "script", "audio", "video",
];

pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

pub fn is_void_tag(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_meaningful_when_blank_tag(tag: &str) -> bool {
    MEANINGFUL_WHEN_BLANK.contains(&tag)
}

/// Whitespace re-attached around an inline replacement
///
/// Each side is either empty or a single space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlankingWhitespace {
    pub leading: &'static str,
    pub trailing: &'static str,
}

impl FlankingWhitespace {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }
}

/// Read-only view of a node during conversion
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    pub node: &'a Node,
    pub parent: Option<&'a NodeView<'a>>,
    /// Position among the parent's children
    pub index: usize,
    pub is_block: bool,
    /// True inside `code`/`pre` up to the nearest block boundary
    pub is_code: bool,
    pub is_blank: bool,
    pub flanking: FlankingWhitespace,
}

impl<'a> NodeView<'a> {
    /// View of the conversion root, always treated as a block
    pub fn root(node: &'a Node) -> Self {
        let is_code = matches!(node.tag(), Some("code" | "pre"));
        Self {
            node,
            parent: None,
            index: 0,
            is_block: true,
            is_code,
            is_blank: false,
            flanking: FlankingWhitespace::default(),
        }
    }

    /// View of the `index`-th child of `parent`
    ///
    /// Returns `None` when the index is out of range.
    pub fn child(parent: &'a NodeView<'a>, index: usize) -> Option<Self> {
        let node = parent.node.children.get(index)?;
        let (is_block, is_blank) = match node.tag() {
            Some(tag) => (is_block_tag(tag), is_blank_element(node)),
            None => (false, false),
        };
        let is_code = match node.tag() {
            Some("code" | "pre") => true,
            _ if is_block => false,
            _ => parent.is_code,
        };

        let mut view = Self {
            node,
            parent: Some(parent),
            index,
            is_block,
            is_code,
            is_blank,
            flanking: FlankingWhitespace::default(),
        };
        view.flanking = flanking_whitespace(&view);
        Some(view)
    }

    /// Views of all children, in document order
    pub fn children(&'a self) -> impl Iterator<Item = NodeView<'a>> + 'a {
        (0..self.node.children.len()).filter_map(move |index| NodeView::child(self, index))
    }

    pub fn tag(&self) -> Option<&'a str> {
        self.node.tag()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn is_element(&self) -> bool {
        self.node.is_element()
    }

    pub fn is_text(&self) -> bool {
        matches!(self.node.kind, NodeKind::Text(_))
    }

    pub fn parent_tag(&self) -> Option<&'a str> {
        self.parent.and_then(|parent| parent.tag())
    }

    pub fn previous_sibling(&self) -> Option<&'a Node> {
        let parent = self.parent?;
        self.index
            .checked_sub(1)
            .and_then(|index| parent.node.children.get(index))
    }

    pub fn next_sibling(&self) -> Option<&'a Node> {
        self.parent?.node.children.get(self.index + 1)
    }

    pub fn previous_element_sibling(&self) -> Option<&'a Node> {
        let parent = self.parent?;
        parent.node.children[..self.index]
            .iter()
            .rev()
            .find(|node| node.is_element())
    }

    pub fn next_element_sibling(&self) -> Option<&'a Node> {
        let parent = self.parent?;
        parent
            .node
            .children
            .get(self.index + 1..)?
            .iter()
            .find(|node| node.is_element())
    }

    /// Position among the parent's element children
    pub fn element_index(&self) -> usize {
        self.parent
            .map(|parent| {
                parent.node.children[..self.index]
                    .iter()
                    .filter(|node| node.is_element())
                    .count()
            })
            .unwrap_or_default()
    }

    /// Element siblings (including this node) in document order
    pub fn element_siblings(&self) -> impl Iterator<Item = &'a Node> + 'a {
        self.parent
            .map(|parent| parent.node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter(|node| node.is_element())
    }

    pub fn text_content(&self) -> String {
        self.node.text_content()
    }

    pub fn outer_html(&self) -> String {
        self.node.outer_html()
    }
}

/// An element with no text and nothing that would be meaningful without it
fn is_blank_element(node: &Node) -> bool {
    let Some(tag) = node.tag() else {
        return false;
    };
    !is_void_tag(tag)
        && !is_meaningful_when_blank_tag(tag)
        && node.text_content().chars().all(|c| c.is_ascii_whitespace())
        && !has_descendant(node, |tag| {
            is_void_tag(tag) || is_meaningful_when_blank_tag(tag)
        })
}

fn has_descendant(node: &Node, matches: impl Fn(&str) -> bool + Copy) -> bool {
    node.children.iter().any(|child| {
        child.tag().is_some_and(matches) || has_descendant(child, matches)
    })
}

fn flanking_whitespace(view: &NodeView<'_>) -> FlankingWhitespace {
    if view.is_block || view.is_text() {
        return FlankingWhitespace::default();
    }

    let text = view.text_content();
    let has_leading = text.starts_with(|c: char| c.is_ascii_whitespace());
    let has_trailing = text.ends_with(|c: char| c.is_ascii_whitespace());
    let blank_with_spaces = view.is_blank && has_leading && has_trailing;

    let leading = if has_leading && !is_flanked_by_whitespace(view, Side::Left) {
        " "
    } else {
        ""
    };
    let trailing =
        if !blank_with_spaces && has_trailing && !is_flanked_by_whitespace(view, Side::Right) {
            " "
        } else {
            ""
        };

    FlankingWhitespace { leading, trailing }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Whether the adjacent sibling already supplies the space on `side`
fn is_flanked_by_whitespace(view: &NodeView<'_>, side: Side) -> bool {
    let sibling = match side {
        Side::Left => view.previous_sibling(),
        Side::Right => view.next_sibling(),
    };
    let Some(sibling) = sibling else {
        return false;
    };

    let provides_space = |text: &str| match side {
        Side::Left => text.ends_with(' '),
        Side::Right => text.starts_with(' '),
    };

    match &sibling.kind {
        NodeKind::Text(text) => provides_space(text),
        NodeKind::Element { tag, .. } if !is_block_tag(tag) => {
            provides_space(&sibling.text_content())
        }
        _ => false,
    }
}
