//! Owned markup tree
//!
//! The converter never walks the html5ever tree directly. Parsed documents (or
//! caller-supplied rcdom handles) are projected into a small owned tree of
//! [`Node`] values holding only what conversion needs: element tags,
//! attributes, children and text. Comments, doctypes and processing
//! instructions are dropped during projection.
//!
//! Trees can also be built by hand, which is how most unit tests describe
//! their input:
//!
//! ```rust
//! use html2org::dom::Node;
//!
//! let link = Node::element("a")
//!     .with_attr("href", "https://example.com")
//!     .with_child(Node::text("Example"));
//! assert_eq!(link.outer_html(), "<a href=\"https://example.com\">Example</a>");
//! ```

use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::{ConversionError, Result};
use crate::node::is_void_tag;

/// Elements whose text children are serialized without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// What a node is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Fragment,
    Element {
        /// Lowercase tag name
        tag: String,
        /// Attributes in source order
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

/// A node of the owned markup tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn document(children: Vec<Node>) -> Self {
        Self {
            kind: NodeKind::Document,
            children,
        }
    }

    pub fn fragment(children: Vec<Node>) -> Self {
        Self {
            kind: NodeKind::Fragment,
            children,
        }
    }

    /// Create an element; the tag name is lowercased
    pub fn element(tag: &str) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
                attrs: Vec::new(),
            },
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text(text.into()),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an existing value. No-op on non-elements.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        if let NodeKind::Element { attrs, .. } = &mut self.kind {
            let name = name.to_ascii_lowercase();
            match attrs.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => attrs.push((name, value.to_string())),
            }
        }
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    /// Whether this node can be the root of a conversion
    pub fn is_container(&self) -> bool {
        !self.is_text()
    }

    /// Element children in document order
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|child| child.is_element())
    }

    /// Concatenated text of this node and all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(text) => out.push_str(text),
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Deepest nesting level below this node (0 for a leaf)
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        max
    }

    /// Re-serialize this node as HTML
    ///
    /// Text and attribute values are escaped, raw-text elements keep their
    /// text verbatim and void elements get no end tag. Document and fragment
    /// nodes serialize their children only.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out, false);
        out
    }

    fn write_html(&self, out: &mut String, raw_text: bool) {
        match &self.kind {
            NodeKind::Text(text) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    out.push_str(&html_escape::encode_text(text));
                }
            }
            NodeKind::Document | NodeKind::Fragment => {
                for child in &self.children {
                    child.write_html(out, false);
                }
            }
            NodeKind::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&html_escape::encode_double_quoted_attribute(value));
                    out.push('"');
                }
                out.push('>');

                if is_void_tag(tag) {
                    return;
                }

                let raw = RAW_TEXT_ELEMENTS.contains(&tag.as_str());
                for child in &self.children {
                    child.write_html(out, raw);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    /// Project a parsed document into an owned tree
    pub fn from_dom(dom: &RcDom, max_depth: usize) -> Result<Node> {
        Node::from_handle(&dom.document, max_depth)
    }

    /// Project an rcdom node and its subtree into an owned tree
    ///
    /// # Errors
    ///
    /// - `ConversionError::InvalidInput` if the handle is a comment, doctype or
    ///   processing instruction
    /// - `ConversionError::ResourceExhausted` if the subtree nests deeper than
    ///   `max_depth`
    pub fn from_handle(handle: &Handle, max_depth: usize) -> Result<Node> {
        project(handle, 0, max_depth)?.ok_or_else(|| {
            ConversionError::InvalidInput(format!(
                "{} is not an element, document or text node",
                describe(&handle.data)
            ))
        })
    }
}

fn project(handle: &Handle, depth: usize, max_depth: usize) -> Result<Option<Node>> {
    if depth > max_depth {
        return Err(ConversionError::ResourceExhausted {
            depth,
            limit: max_depth,
        });
    }

    let kind = match &handle.data {
        NodeData::Document => NodeKind::Document,
        NodeData::Element { name, attrs, .. } => NodeKind::Element {
            tag: name.local.to_string(),
            attrs: attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect(),
        },
        NodeData::Text { contents } => NodeKind::Text(contents.borrow().to_string()),
        NodeData::Comment { .. }
        | NodeData::Doctype { .. }
        | NodeData::ProcessingInstruction { .. } => return Ok(None),
    };

    let mut children = Vec::new();
    for child in handle.children.borrow().iter() {
        if let Some(node) = project(child, depth + 1, max_depth)? {
            children.push(node);
        }
    }

    Ok(Some(Node { kind, children }))
}

fn describe(data: &NodeData) -> &'static str {
    match data {
        NodeData::Document => "document",
        NodeData::Element { .. } => "element",
        NodeData::Text { .. } => "text",
        NodeData::Comment { .. } => "comment",
        NodeData::Doctype { .. } => "doctype",
        NodeData::ProcessingInstruction { .. } => "processing instruction",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;

    #[test]
    fn test_builder_lowercases_tags_and_attributes() {
        let node = Node::element("DIV").with_attr("CLASS", "x");
        assert_eq!(node.tag(), Some("div"));
        assert_eq!(node.attr("class"), Some("x"));
        assert_eq!(node.attr("Class"), Some("x"));
    }

    #[test]
    fn test_with_attr_replaces_existing_value() {
        let node = Node::element("a")
            .with_attr("href", "/one")
            .with_attr("href", "/two");
        assert_eq!(node.attr("href"), Some("/two"));
        assert_eq!(node.outer_html(), "<a href=\"/two\"></a>");
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let node = Node::element("p")
            .with_child(Node::text("Hello "))
            .with_child(Node::element("b").with_child(Node::text("world")));
        assert_eq!(node.text_content(), "Hello world");
    }

    #[test]
    fn test_outer_html_escapes_text_and_attributes() {
        let node = Node::element("span")
            .with_attr("title", "a \"quoted\" <value>")
            .with_child(Node::text("1 < 2 & 3"));
        assert_eq!(
            node.outer_html(),
            "<span title=\"a &quot;quoted&quot; &lt;value&gt;\">1 &lt; 2 &amp; 3</span>"
        );
    }

    #[test]
    fn test_outer_html_void_and_raw_text_elements() {
        let img = Node::element("img").with_attr("src", "a.png");
        assert_eq!(img.outer_html(), "<img src=\"a.png\">");

        let script = Node::element("script").with_child(Node::text("if (a < b) {}"));
        assert_eq!(script.outer_html(), "<script>if (a < b) {}</script>");
    }

    #[test]
    fn test_depth() {
        let leaf = Node::text("x");
        assert_eq!(leaf.depth(), 0);

        let nested = Node::element("div")
            .with_child(Node::element("p").with_child(Node::text("x")));
        assert_eq!(nested.depth(), 2);
    }

    #[test]
    fn test_projection_drops_comments() {
        let dom = parse_html("<p>a<!-- hidden -->b</p>");
        let document = Node::from_dom(&dom, 64).expect("projection");
        let html = document.outer_html();
        assert!(html.contains("<p>ab</p>"), "got: {html}");
        assert!(!html.contains("hidden"));
    }

    #[test]
    fn test_projection_depth_limit() {
        let html = "<div>".repeat(40);
        let dom = parse_html(&html);
        let err = Node::from_dom(&dom, 10).expect_err("depth limit");
        assert!(matches!(
            err,
            ConversionError::ResourceExhausted { limit: 10, .. }
        ));
    }
}
