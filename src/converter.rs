//! Org converter - turns a markup tree into Org-mode text
//!
//! [`OrgConverter`] is the conversion engine. It owns a [`ConversionOptions`]
//! and a [`RuleSet`], both of which persist across calls until changed through
//! the registration methods ([`OrgConverter::add_rule`],
//! [`OrgConverter::keep`], [`OrgConverter::remove`],
//! [`OrgConverter::use_plugin`]).
//!
//! # Conversion Strategy
//!
//! 1. The input is parsed (strings) or projected (rcdom trees) into a private
//!    owned copy, and whitespace is collapsed on that copy.
//! 2. The children of the root are visited in document order. Text is escaped
//!    unless it sits in a code context. Elements are converted post-order:
//!    their children first, then the rule resolved for them.
//! 3. Tables are handed to the table sub-converter before rule resolution and
//!    fall back to the default replacement when their layout is irregular.
//! 4. Every partial result is appended with [`join`], which keeps at most one
//!    blank line between fragments.
//! 5. The accumulated output goes through [`post_process`], the only global
//!    trim.
//!
//! # Examples
//!
//! ```rust
//! use html2org::converter::OrgConverter;
//!
//! let converter = OrgConverter::new();
//! let org = converter
//!     .convert("<h2>Intro</h2><p>Some <em>emphasis</em> and <code>code</code>.</p>")
//!     .expect("conversion succeeds");
//! assert_eq!(org, "** Intro\n\nSome /emphasis/ and =code=.");
//! ```

use std::fmt;

use log::{debug, warn};
use markup5ever_rcdom::{Handle, RcDom};

use crate::dom::{Node, NodeKind};
use crate::error::{ConversionError, Result};
use crate::escape;
use crate::node::NodeView;
use crate::options::ConversionOptions;
use crate::org_rules::RuleTable;
use crate::parser::{find_element, parse_fragment};
use crate::rules::{Filter, Resolution, Rule, RuleSet};
use crate::table;
use crate::whitespace::collapse_whitespace;

/// Something the converter accepts
#[derive(Clone, Copy)]
pub enum Input<'a> {
    /// A markup fragment or a whole document
    Html(&'a str),
    /// An owned tree; its root is not converted, only its children
    Tree(&'a Node),
    /// A parsed document; its body is converted when it has one
    Dom(&'a RcDom),
    /// An rcdom element, document or fragment node
    Handle(&'a Handle),
}

impl fmt::Debug for Input<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Html(html) => f.debug_tuple("Html").field(html).finish(),
            Input::Tree(node) => f.debug_tuple("Tree").field(node).finish(),
            // rcdom trees have no Debug impl
            Input::Dom(_) => f.write_str("Dom(..)"),
            Input::Handle(_) => f.write_str("Handle(..)"),
        }
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(html: &'a str) -> Self {
        Input::Html(html)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(html: &'a String) -> Self {
        Input::Html(html.as_str())
    }
}

impl<'a> From<&'a Node> for Input<'a> {
    fn from(node: &'a Node) -> Self {
        Input::Tree(node)
    }
}

impl<'a> From<&'a RcDom> for Input<'a> {
    fn from(dom: &'a RcDom) -> Self {
        Input::Dom(dom)
    }
}

impl<'a> From<&'a Handle> for Input<'a> {
    fn from(handle: &'a Handle) -> Self {
        Input::Handle(handle)
    }
}

/// Per-call conversion state
///
/// Tracks the element nesting depth of the traversal and the number of
/// elements visited.
#[derive(Debug)]
pub struct ConversionContext {
    max_depth: usize,
    depth: usize,
    node_count: u32,
}

impl ConversionContext {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            depth: 0,
            node_count: 0,
        }
    }

    /// Descend into an element
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::ResourceExhausted` when the descent goes
    /// beyond the depth limit.
    pub fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        self.node_count = self.node_count.saturating_add(1);
        if self.depth > self.max_depth {
            warn!(
                "conversion aborted at depth {} (limit {})",
                self.depth, self.max_depth
            );
            return Err(ConversionError::ResourceExhausted {
                depth: self.depth,
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn node_count(&self) -> u32 {
        self.node_count
    }
}

/// Registers rules or filters on a converter
///
/// Any `Fn(&mut OrgConverter) -> Result<()>` is a plugin.
///
/// # Examples
///
/// ```rust
/// use html2org::converter::OrgConverter;
/// use html2org::rules::Rule;
///
/// let mut converter = OrgConverter::new();
/// converter
///     .use_plugin(&|c: &mut OrgConverter| -> html2org::Result<()> {
///         c.add_rule("mark", Rule::new("mark", |content, _, _| format!("*{content}*")));
///         Ok(())
///     })
///     .expect("plugin applies");
/// assert_eq!(converter.convert("<mark>hi</mark>").unwrap(), "*hi*");
/// ```
pub trait Plugin {
    /// Name used in error messages
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn apply(&self, converter: &mut OrgConverter) -> Result<()>;
}

impl<F> Plugin for F
where
    F: Fn(&mut OrgConverter) -> Result<()>,
{
    fn apply(&self, converter: &mut OrgConverter) -> Result<()> {
        self(converter)
    }
}

/// HTML to Org-mode conversion engine
#[derive(Debug, Clone)]
pub struct OrgConverter {
    options: ConversionOptions,
    rules: RuleSet,
}

impl OrgConverter {
    /// Create a converter with the default options and the standard rule table
    pub fn new() -> Self {
        Self::with_options(ConversionOptions::default())
    }

    pub fn with_options(options: ConversionOptions) -> Self {
        Self {
            options,
            rules: RuleSet::new(RuleTable::standard()),
        }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Register a rule under `key`
    ///
    /// A rule registered again under an existing key replaces the old one and
    /// takes precedence over every other custom rule.
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    /// Emit matching elements as their original markup
    ///
    /// Keep filters only apply to elements the standard rule table does not
    /// handle.
    pub fn keep(&mut self, filter: impl Into<Filter>) -> &mut Self {
        self.rules.keep(filter.into());
        self
    }

    /// Drop matching elements and everything inside them
    pub fn remove(&mut self, filter: impl Into<Filter>) -> &mut Self {
        self.rules.remove(filter.into());
        self
    }

    /// Apply a plugin to this converter
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::Plugin` naming the plugin when it fails.
    pub fn use_plugin<P>(&mut self, plugin: &P) -> Result<&mut Self>
    where
        P: Plugin + ?Sized,
    {
        debug!("applying plugin '{}'", plugin.name());
        plugin.apply(self).map_err(|e| match e {
            ConversionError::Plugin { .. } => e,
            other => ConversionError::Plugin {
                name: plugin.name().to_string(),
                message: other.to_string(),
            },
        })?;
        Ok(self)
    }

    /// Apply plugins in order, stopping at the first failure
    pub fn use_plugins(&mut self, plugins: &[&dyn Plugin]) -> Result<&mut Self> {
        for plugin in plugins {
            self.use_plugin(*plugin)?;
        }
        Ok(self)
    }

    /// Convert markup or a tree to Org-mode text
    ///
    /// An empty string converts to an empty string without parsing.
    ///
    /// # Errors
    ///
    /// - `ConversionError::InvalidInput` if the input is a text, comment or
    ///   doctype node
    /// - `ConversionError::ResourceExhausted` if the input nests deeper than
    ///   `max_depth`
    /// - `ConversionError::Parse` if a markup string yields no body
    pub fn convert<'a>(&self, input: impl Into<Input<'a>>) -> Result<String> {
        let mut root = match input.into() {
            Input::Html("") => return Ok(String::new()),
            Input::Html(html) => parse_fragment(html, self.options.max_depth)?,
            Input::Tree(node) => {
                if !node.is_container() {
                    return Err(ConversionError::InvalidInput(
                        "a text node cannot be converted".to_string(),
                    ));
                }
                let depth = node.depth();
                if depth > self.options.max_depth {
                    return Err(ConversionError::ResourceExhausted {
                        depth,
                        limit: self.options.max_depth,
                    });
                }
                node.clone()
            }
            Input::Dom(dom) => match find_element(&dom.document, "body") {
                Some(body) => Node::from_handle(&body, self.options.max_depth)?,
                None => Node::from_dom(dom, self.options.max_depth)?,
            },
            Input::Handle(handle) => {
                let node = Node::from_handle(handle, self.options.max_depth)?;
                if !node.is_container() {
                    return Err(ConversionError::InvalidInput(
                        "a text node cannot be converted".to_string(),
                    ));
                }
                node
            }
        };

        collapse_whitespace(&mut root);

        let mut ctx = ConversionContext::new(self.options.max_depth);
        let view = NodeView::root(&root);
        let output = self.process_children(&view, &mut ctx)?;
        debug!("converted {} elements", ctx.node_count());
        Ok(post_process(&output))
    }

    /// Convert an optional input, rejecting a missing one
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::InvalidInput` for `None`, otherwise as
    /// [`OrgConverter::convert`].
    pub fn convert_optional(&self, input: Option<Input<'_>>) -> Result<String> {
        match input {
            Some(input) => self.convert(input),
            None => Err(ConversionError::InvalidInput(
                "no input to convert".to_string(),
            )),
        }
    }

    /// Escape Org markup in `text` the way text nodes are escaped
    pub fn escape(&self, text: &str) -> String {
        escape::escape(text)
    }

    fn process_children(&self, parent: &NodeView<'_>, ctx: &mut ConversionContext) -> Result<String> {
        let mut output = String::new();
        for index in 0..parent.node.children.len() {
            let Some(child) = NodeView::child(parent, index) else {
                continue;
            };
            let replacement = match &child.node.kind {
                NodeKind::Text(text) if child.is_code => text.clone(),
                NodeKind::Text(text) => escape::escape(text),
                NodeKind::Element { .. } => self.replacement_for_node(&child, ctx)?,
                NodeKind::Document | NodeKind::Fragment => self.process_children(&child, ctx)?,
            };
            join_into(&mut output, &replacement);
        }
        Ok(output)
    }

    fn replacement_for_node(&self, node: &NodeView<'_>, ctx: &mut ConversionContext) -> Result<String> {
        ctx.enter()?;
        let result = self.replace(node, ctx);
        ctx.exit();
        result
    }

    fn replace(&self, node: &NodeView<'_>, ctx: &mut ConversionContext) -> Result<String> {
        let flanking = node.flanking;
        let options = &self.options;

        let replaced = match self.rules.resolve(node) {
            // Removed subtrees are never converted, only their flanking space survives
            Resolution::Remove => {
                return Ok(format!("{}{}", flanking.leading, flanking.trailing));
            }
            _ if table::is_table(node.node) => {
                match table::convert_table(node, |cell| self.process_children(cell, ctx))? {
                    Some(converted) => converted,
                    None => {
                        let content = self.process_children(node, ctx)?;
                        options.default_replacement.apply(&content, node, options)
                    }
                }
            }
            Resolution::Custom(_, rule) => {
                let content = self.content_of(node, ctx)?;
                rule.replacement.apply(&content, node, options)
            }
            Resolution::Keep => {
                let content = self.content_of(node, ctx)?;
                options.keep_replacement.apply(&content, node, options)
            }
            Resolution::Blank => {
                let content = self.content_of(node, ctx)?;
                options.blank_replacement.apply(&content, node, options)
            }
            Resolution::Standard(rule) => {
                let content = self.content_of(node, ctx)?;
                rule.replacement(&content, node, options)
            }
            Resolution::Default => {
                let content = self.content_of(node, ctx)?;
                options.default_replacement.apply(&content, node, options)
            }
        };

        Ok(format!("{}{}{}", flanking.leading, replaced, flanking.trailing))
    }

    /// Converted children, trimmed when the flanking whitespace moves outside
    fn content_of(&self, node: &NodeView<'_>, ctx: &mut ConversionContext) -> Result<String> {
        let content = self.process_children(node, ctx)?;
        if node.flanking.is_empty() {
            return Ok(content);
        }
        Ok(content
            .trim_matches(|c: char| c.is_ascii_whitespace())
            .to_string())
    }
}

impl Default for OrgConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Join two fragments, keeping at most two newlines between them
///
/// The newlines at the end of `output` and at the start of `replacement` are
/// replaced by the larger of the two runs, capped at two.
///
/// # Examples
///
/// ```rust
/// use html2org::converter::join;
///
/// assert_eq!(join("a\n", "\n\n\nb"), "a\n\nb");
/// assert_eq!(join("a", "b"), "ab");
/// assert_eq!(join("a\n", "b"), "a\nb");
/// ```
pub fn join(output: &str, replacement: &str) -> String {
    let mut joined = output.to_string();
    join_into(&mut joined, replacement);
    joined
}

/// In-place form of [`join`]
pub fn join_into(output: &mut String, replacement: &str) {
    let kept = output.trim_end_matches('\n').len();
    let trailing = output.len() - kept;
    output.truncate(kept);

    let body = replacement.trim_start_matches('\n');
    let leading = replacement.len() - body.len();

    let newlines = trailing.max(leading).min(2);
    output.extend(std::iter::repeat_n('\n', newlines));
    output.push_str(body);
}

/// Final trim of the accumulated output
///
/// Leading newlines, tabs and carriage returns are removed, as is all
/// trailing whitespace.
pub fn post_process(output: &str) -> String {
    output
        .trim_start_matches(['\n', '\t', '\r'])
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{CodeBlockStyle, RubyStyle};
    use crate::parser::parse_html;

    fn convert(html: &str) -> String {
        OrgConverter::new().convert(html).expect("conversion succeeds")
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(convert(""), "");
    }

    #[test]
    fn test_whitespace_only_input() {
        assert_eq!(convert("   \n  "), "");
    }

    #[test]
    fn test_heading_and_paragraph() {
        assert_eq!(
            convert("<h1>Title</h1><p>Body text.</p>"),
            "* Title\n\nBody text."
        );
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(convert("<h3>Deep</h3>"), "*** Deep");
    }

    #[test]
    fn test_paragraphs_are_separated_by_one_blank_line() {
        assert_eq!(convert("<p>a</p><p>b</p><p>c</p>"), "a\n\nb\n\nc");
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(
            convert("<p><strong>bold</strong> <em>it</em> <u>under</u> <del>gone</del></p>"),
            "*bold* /it/ _under_ +gone+"
        );
    }

    #[test]
    fn test_flanking_whitespace_is_moved_outside_delimiters() {
        assert_eq!(convert("<p>a<em> b </em>c</p>"), "a /b/ c");
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(convert("<p>2 * 3 = snake_case</p>"), r"2 \* 3 = snake\_case");
    }

    #[test]
    fn test_code_text_is_not_escaped() {
        assert_eq!(convert("<p><code>a_b*c</code></p>"), "=a_b*c=");
    }

    #[test]
    fn test_inline_code_alternate_delimiter() {
        assert_eq!(convert("<code>a = b</code>"), "~a = b~");
    }

    #[test]
    fn test_link() {
        assert_eq!(
            convert(r#"<a href="https://example.com/a%20b">Example</a>"#),
            "[[https://example.com/a b][Example]]"
        );
    }

    #[test]
    fn test_link_without_text() {
        assert_eq!(
            convert(r#"<a href="https://example.com"></a>"#),
            "[[https://example.com]]"
        );
    }

    #[test]
    fn test_anchor_without_href_keeps_content() {
        assert_eq!(convert("<a name=\"x\">text</a>"), "text");
    }

    #[test]
    fn test_image() {
        assert_eq!(convert(r#"<img src="/cat.png" alt="cat">"#), "[[/cat.png]]");
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(convert("<ul><li>one</li><li>two</li></ul>"), "- one\n- two");
    }

    #[test]
    fn test_ordered_list_honors_start() {
        assert_eq!(
            convert(r#"<ol start="3"><li>c</li><li>d</li></ol>"#),
            "3. c\n4. d"
        );
    }

    #[test]
    fn test_ordered_list_start_overflow_falls_back_to_position() {
        assert_eq!(
            convert(r#"<ol start="9223372036854775807"><li>a</li><li>b</li></ol>"#),
            "9223372036854775807. a\n2. b"
        );
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(
            convert("<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>"),
            "- a\n  - b\n- c"
        );
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            convert("<blockquote><p>quoted</p></blockquote>"),
            "#+BEGIN_QUOTE\nquoted\n#+END_QUOTE"
        );
    }

    #[test]
    fn test_code_block_with_language() {
        assert_eq!(
            convert("<pre><code class=\"language-rust\">fn main() {}\n</code></pre>"),
            "#+BEGIN_SRC rust\nfn main() {}\n#+END_SRC"
        );
    }

    #[test]
    fn test_code_block_colon_style() {
        let mut options = ConversionOptions::default();
        options.code_block_style = CodeBlockStyle::Colon;
        let converter = OrgConverter::with_options(options);
        assert_eq!(
            converter.convert("<pre>a\n\nb</pre>").unwrap(),
            ": a\n:\n: b"
        );
    }

    #[test]
    fn test_line_break() {
        assert_eq!(convert("<p>a<br>b</p>"), "a\\\\\nb");
    }

    #[test]
    fn test_block_inside_inline_has_no_double_blank_line() {
        let org = convert("<em><p><br></p></em>");
        assert!(!org.contains("\n\n\n"), "{org:?}");
        assert!(org.starts_with('/') && org.ends_with('/'), "{org:?}");
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(convert("<p>a</p><hr><p>b</p>"), "a\n\n-----\n\nb");
    }

    #[test]
    fn test_unknown_block_uses_default_replacement() {
        assert_eq!(convert("<section>x</section><section>y</section>"), "x\n\ny");
    }

    #[test]
    fn test_unknown_inline_passes_content_through() {
        assert_eq!(convert("<p>a <span>b</span> c</p>"), "a b c");
    }

    #[test]
    fn test_blank_block_collapses() {
        assert_eq!(convert("<p>a</p><div>  </div><p>b</p>"), "a\n\nb");
    }

    #[test]
    fn test_table() {
        assert_eq!(
            convert("<table><tr><th>A</th><th>B</th></tr><tr><td><em>1</em></td><td>2|3</td></tr></table>"),
            "| A | B |\n|---+---|\n| /1/ | 2\\vert{}3 |"
        );
    }

    #[test]
    fn test_irregular_table_falls_back() {
        assert_eq!(
            convert("<table><tr><td colspan=\"2\">wide</td></tr></table>"),
            "wide"
        );
    }

    #[test]
    fn test_ruby_is_stripped_by_default() {
        assert_eq!(
            convert("<ruby>漢<rp>(</rp><rt>kan</rt><rp>)</rp></ruby>"),
            "漢"
        );
    }

    #[test]
    fn test_ruby_force_parenthesis() {
        let mut options = ConversionOptions::default();
        options.ruby = RubyStyle::ForceAddParenthesis;
        let converter = OrgConverter::with_options(options);
        assert_eq!(
            converter.convert("<ruby>漢<rt>kan</rt></ruby>").unwrap(),
            "漢(kan)"
        );
    }

    #[test]
    fn test_remove_filter_drops_subtree() {
        let mut converter = OrgConverter::new();
        converter.remove("aside");
        assert_eq!(
            converter
                .convert("<p>keep</p><aside><p>drop <b>me</b></p></aside>")
                .unwrap(),
            "keep"
        );
    }

    #[test]
    fn test_remove_filter_applies_to_tables() {
        let mut converter = OrgConverter::new();
        converter.remove("table");
        assert_eq!(
            converter
                .convert("<p>a</p><table><tr><td>x</td></tr></table>")
                .unwrap(),
            "a"
        );
    }

    #[test]
    fn test_removed_inline_element_keeps_flanking_whitespace() {
        let mut converter = OrgConverter::new();
        converter.remove("span");
        assert_eq!(
            converter
                .convert("<p>Hello<span> ad </span>world</p>")
                .unwrap(),
            "Hello  world"
        );
    }

    #[test]
    fn test_removed_element_children_are_not_converted() {
        let mut converter = OrgConverter::new();
        converter.remove("span");
        converter.add_rule(
            "mark",
            Rule::new("mark", |_, _, _| panic!("removed subtree was converted")),
        );
        assert_eq!(
            converter.convert("<p>a <span><mark>x</mark></span> b</p>").unwrap(),
            "a  b"
        );
    }

    #[test]
    fn test_keep_filter_emits_markup() {
        let mut converter = OrgConverter::new();
        converter.keep(["kbd", "figure"]);
        assert_eq!(
            converter.convert("<p>Press <kbd>Ctrl</kbd></p>").unwrap(),
            "Press <kbd>Ctrl</kbd>"
        );
        assert_eq!(
            converter.convert("<figure>x</figure>").unwrap(),
            "<figure>x</figure>"
        );
    }

    #[test]
    fn test_keep_filter_does_not_override_standard_rules() {
        let mut converter = OrgConverter::new();
        converter.keep("em");
        assert_eq!(converter.convert("<em>x</em>").unwrap(), "/x/");
    }

    #[test]
    fn test_custom_rule_overrides_standard() {
        let mut converter = OrgConverter::new();
        converter.add_rule(
            "strong",
            Rule::new(["strong", "b"], |content, _, _| format!("!{content}!")),
        );
        assert_eq!(converter.convert("<b>x</b>").unwrap(), "!x!");
    }

    #[test]
    fn test_custom_rule_sees_trimmed_content() {
        let mut converter = OrgConverter::new();
        converter.add_rule(
            "mark",
            Rule::new("mark", |content, _, _| format!("[{content}]")),
        );
        assert_eq!(converter.convert("<p>a<mark> b </mark>c</p>").unwrap(), "a [b] c");
    }

    #[test]
    fn test_plugin_failure_is_wrapped() {
        let mut converter = OrgConverter::new();
        let failing = |_: &mut OrgConverter| -> Result<()> {
            Err(ConversionError::Internal("boom".to_string()))
        };
        let err = converter.use_plugin(&failing).unwrap_err();
        match err {
            ConversionError::Plugin { message, .. } => assert!(message.contains("boom")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_use_plugins_in_order() {
        let mut converter = OrgConverter::new();
        let first = |c: &mut OrgConverter| -> Result<()> {
            c.add_rule("x", Rule::new("span", |_, _, _| "1".to_string()));
            Ok(())
        };
        let second = |c: &mut OrgConverter| -> Result<()> {
            c.add_rule("x", Rule::new("span", |_, _, _| "2".to_string()));
            Ok(())
        };
        let plugins: [&dyn Plugin; 2] = [&first, &second];
        converter.use_plugins(&plugins).unwrap();
        assert_eq!(converter.convert("<span>s</span>").unwrap(), "2");
    }

    #[test]
    fn test_tree_input_converts_children_only() {
        let tree = Node::element("p").with_child(Node::text("inside"));
        assert_eq!(OrgConverter::new().convert(&tree).unwrap(), "inside");
    }

    #[test]
    fn test_tree_input_is_not_mutated() {
        let tree = Node::fragment(vec![Node::element("p").with_child(Node::text("  a   b  "))]);
        let before = tree.clone();
        assert_eq!(OrgConverter::new().convert(&tree).unwrap(), "a b");
        assert_eq!(tree, before);
    }

    #[test]
    fn test_text_root_is_invalid() {
        let err = OrgConverter::new().convert(&Node::text("x")).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_input_is_invalid() {
        let err = OrgConverter::new().convert_optional(None).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidInput(_)));
        assert_eq!(
            OrgConverter::new()
                .convert_optional(Some(Input::Html("<p>x</p>")))
                .unwrap(),
            "x"
        );
    }

    #[test]
    fn test_dom_input_uses_body() {
        let dom = parse_html("<html><head><title>T</title></head><body><p>B</p></body></html>");
        assert_eq!(OrgConverter::new().convert(&dom).unwrap(), "B");
    }

    #[test]
    fn test_handle_input() {
        let dom = parse_html("<div><p>x</p></div>");
        let div = find_element(&dom.document, "div").expect("div");
        assert_eq!(OrgConverter::new().convert(&div).unwrap(), "x");

        let p = find_element(&div, "p").expect("p");
        let text = p.children.borrow()[0].clone();
        let err = OrgConverter::new().convert(&text).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidInput(_)));
    }

    #[test]
    fn test_input_debug() {
        let dom = parse_html("<p>x</p>");
        assert_eq!(format!("{:?}", Input::Dom(&dom)), "Dom(..)");
        assert_eq!(format!("{:?}", Input::Handle(&dom.document)), "Handle(..)");
        assert_eq!(format!("{:?}", Input::Html("<p>")), r#"Html("<p>")"#);
    }

    #[test]
    fn test_whole_document_string_uses_body() {
        assert_eq!(
            convert("<!DOCTYPE html><html><head><title>T</title></head><body><p>B</p></body></html>"),
            "B"
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut options = ConversionOptions::default();
        options.max_depth = 4;
        let converter = OrgConverter::with_options(options);
        let html = format!("{}x{}", "<div>".repeat(10), "</div>".repeat(10));
        let err = converter.convert(html.as_str()).unwrap_err();
        assert!(matches!(err, ConversionError::ResourceExhausted { .. }));
    }

    #[test]
    fn test_context_tracks_depth() {
        let mut ctx = ConversionContext::new(2);
        ctx.enter().unwrap();
        ctx.enter().unwrap();
        assert_eq!(ctx.depth(), 2);
        assert!(ctx.enter().is_err());
        ctx.exit();
        ctx.exit();
        ctx.exit();
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.node_count(), 3);
    }

    #[test]
    fn test_join() {
        assert_eq!(join("", ""), "");
        assert_eq!(join("a", "b"), "ab");
        assert_eq!(join("a\n\n\n", "b"), "a\n\nb");
        assert_eq!(join("a\n", "\nb"), "a\nb");
        assert_eq!(join("a\n", "\n\nb"), "a\n\nb");
        assert_eq!(join("", "\n\nb"), "\n\nb");
    }

    #[test]
    fn test_post_process() {
        assert_eq!(post_process("\n\t\r\nbody \n\n "), "body");
        assert_eq!(post_process("  indented"), "  indented");
    }

    #[test]
    fn test_converter_is_reusable() {
        let converter = OrgConverter::new();
        let first = converter.convert("<p>x</p>").unwrap();
        let second = converter.convert("<p>x</p>").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_escape_method() {
        assert_eq!(OrgConverter::new().escape("a_b"), r"a\_b");
    }
}
