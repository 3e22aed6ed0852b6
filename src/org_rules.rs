//! Standard Org-mode rule table
//!
//! The built-in conversions are a closed set, so they are an enum rather than
//! a list of boxed closures: [`OrgRule`] names each conversion, knows which
//! elements it claims and renders them. [`RuleTable::standard`] returns the
//! one shared, immutable table every converter starts from.
//!
//! | rule | elements | output |
//! |------|----------|--------|
//! | paragraph | `p` | content on its own paragraph |
//! | line break | `br` | `\\` and a newline |
//! | heading | `h1`-`h6` | `*`, `**`, ... then the title |
//! | blockquote | `blockquote` | `#+BEGIN_QUOTE` block |
//! | list, list item | `ul`, `ol`, `li` | `- item`, `1. item` |
//! | code block | `pre` | `#+BEGIN_SRC lang` / `#+BEGIN_EXAMPLE` block or `: ` lines |
//! | horizontal rule | `hr` | `-----` |
//! | link | `a[href]` | `[[url][text]]` |
//! | image | `img[src]` | `[[src]]` |
//! | emphasis, strong, underline, strike | `em i`, `strong b`, `u ins`, `del s strike` | `/x/`, `*x*`, `_x_`, `+x+` |
//! | inline code | `code` outside `pre` | `=x=` |
//! | ruby | `ruby`, `rt`, `rp` | per [`RubyStyle`] |

use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use crate::dom::Node;
use crate::node::NodeView;
use crate::options::{CodeBlockStyle, ConversionOptions, RubyStyle};

/// A built-in conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgRule {
    Paragraph,
    LineBreak,
    Heading,
    Blockquote,
    List,
    ListItem,
    CodeBlock,
    HorizontalRule,
    Link,
    Image,
    Emphasis,
    Strong,
    Underline,
    Strikethrough,
    InlineCode,
    Ruby,
    RubyText,
    RubyParenthesis,
}

impl OrgRule {
    /// Every rule, in matching order
    pub const ALL: [OrgRule; 18] = [
        OrgRule::Paragraph,
        OrgRule::LineBreak,
        OrgRule::Heading,
        OrgRule::Blockquote,
        OrgRule::List,
        OrgRule::ListItem,
        OrgRule::CodeBlock,
        OrgRule::HorizontalRule,
        OrgRule::Link,
        OrgRule::Image,
        OrgRule::Emphasis,
        OrgRule::Strong,
        OrgRule::Underline,
        OrgRule::Strikethrough,
        OrgRule::InlineCode,
        OrgRule::Ruby,
        OrgRule::RubyText,
        OrgRule::RubyParenthesis,
    ];

    /// Whether this rule claims `node`
    pub fn matches(self, node: &NodeView<'_>) -> bool {
        let Some(tag) = node.tag() else {
            return false;
        };
        match self {
            OrgRule::Paragraph => tag == "p",
            OrgRule::LineBreak => tag == "br",
            OrgRule::Heading => heading_level(tag).is_some(),
            OrgRule::Blockquote => tag == "blockquote",
            OrgRule::List => matches!(tag, "ul" | "ol"),
            OrgRule::ListItem => tag == "li",
            OrgRule::CodeBlock => tag == "pre",
            OrgRule::HorizontalRule => tag == "hr",
            OrgRule::Link => tag == "a" && node.attr("href").is_some_and(|href| !href.is_empty()),
            OrgRule::Image => tag == "img" && node.attr("src").is_some_and(|src| !src.is_empty()),
            OrgRule::Emphasis => matches!(tag, "em" | "i"),
            OrgRule::Strong => matches!(tag, "strong" | "b"),
            OrgRule::Underline => matches!(tag, "u" | "ins"),
            OrgRule::Strikethrough => matches!(tag, "del" | "s" | "strike"),
            OrgRule::InlineCode => tag == "code" && node.parent_tag() != Some("pre"),
            OrgRule::Ruby => tag == "ruby",
            OrgRule::RubyText => tag == "rt",
            OrgRule::RubyParenthesis => tag == "rp",
        }
    }

    /// Render `node` whose children converted to `content`
    pub fn replacement(
        self,
        content: &str,
        node: &NodeView<'_>,
        options: &ConversionOptions,
    ) -> String {
        match self {
            OrgRule::Paragraph => format!("\n\n{}\n\n", content.trim_matches('\n')),
            OrgRule::LineBreak => "\\\\\n".to_string(),
            OrgRule::Heading => {
                let level = node.tag().and_then(heading_level).unwrap_or(1);
                let marker = options.heading_marker.to_string().repeat(level);
                let title = content.replace('\n', " ");
                format!("\n\n{marker} {}\n\n", title.trim())
            }
            OrgRule::Blockquote => format!(
                "\n\n#+BEGIN_QUOTE\n{}\n#+END_QUOTE\n\n",
                content.trim_matches('\n')
            ),
            OrgRule::List => {
                let nested_last = node.parent_tag() == Some("li")
                    && node.next_element_sibling().is_none();
                if nested_last {
                    format!("\n{content}")
                } else {
                    format!("\n\n{}\n\n", content.trim_matches('\n'))
                }
            }
            OrgRule::ListItem => list_item(content, node, options),
            OrgRule::CodeBlock => code_block(node.node, options),
            OrgRule::HorizontalRule => format!("\n\n{}\n\n", options.hr),
            OrgRule::Link => {
                let href = node.attr("href").unwrap_or_default();
                let url = link_target(href, options);
                let text = options.square_brackets_in_link.apply(content);
                if text.is_empty() || text == url {
                    format!("[[{url}]]")
                } else {
                    format!("[[{url}][{text}]]")
                }
            }
            OrgRule::Image => {
                let src = node.attr("src").unwrap_or_default();
                format!("[[{}]]", link_target(src, options))
            }
            OrgRule::Emphasis => delimit(content, options.italic_delimiter),
            OrgRule::Strong => delimit(content, options.bold_delimiter),
            OrgRule::Underline => delimit(content, options.underline_delimiter),
            OrgRule::Strikethrough => delimit(content, options.strike_delimiter),
            OrgRule::InlineCode => inline_code(content, options),
            OrgRule::Ruby => content.to_string(),
            OrgRule::RubyText => ruby_text(content, node, options.ruby),
            OrgRule::RubyParenthesis => ruby_parenthesis(content, node, options.ruby),
        }
    }
}

/// Ordered table of built-in rules
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<OrgRule>,
}

impl RuleTable {
    /// The shared standard table
    pub fn standard() -> Arc<RuleTable> {
        static STANDARD: OnceLock<Arc<RuleTable>> = OnceLock::new();
        STANDARD
            .get_or_init(|| {
                Arc::new(RuleTable {
                    rules: OrgRule::ALL.to_vec(),
                })
            })
            .clone()
    }

    pub fn rules(&self) -> &[OrgRule] {
        &self.rules
    }

    /// First rule in table order that claims `node`
    pub fn find(&self, node: &NodeView<'_>) -> Option<OrgRule> {
        self.rules.iter().copied().find(|rule| rule.matches(node))
    }
}

fn heading_level(tag: &str) -> Option<usize> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn delimit(content: &str, delimiter: char) -> String {
    if content.trim().is_empty() {
        return String::new();
    }
    format!("{delimiter}{content}{delimiter}")
}

/// URI-decode a link target when enabled, then apply the bracket policy
fn link_target(raw: &str, options: &ConversionOptions) -> String {
    let target = if options.decode_uri {
        decode_uri(raw)
    } else {
        Cow::Borrowed(raw)
    };
    options.square_brackets_in_link.apply(&target)
}

/// Percent-decode `raw`, keeping it unchanged when it does not decode to UTF-8
pub(crate) fn decode_uri(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

fn list_item(content: &str, node: &NodeView<'_>, options: &ConversionOptions) -> String {
    let prefix = match node.parent {
        Some(parent) if parent.tag() == Some("ol") => {
            let index = node.element_index();
            let number = parent
                .attr("start")
                .and_then(|start| start.trim().parse::<i64>().ok())
                .and_then(|start| start.checked_add(index as i64))
                .unwrap_or(index as i64 + 1);
            format!("{number}{} ", options.ordered_list_marker.as_char())
        }
        _ => format!("{} ", options.unordered_list_marker.as_char()),
    };

    let indent = " ".repeat(options.list_indent_size);
    let body = content.trim_matches('\n');
    let mut out = prefix;
    for (i, line) in body.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&indent);
            }
        }
        out.push_str(line);
    }
    if node.next_sibling().is_some() {
        out.push('\n');
    }
    out
}

/// Language named by a `language-*` or `lang-*` class
fn code_language(node: &Node) -> Option<&str> {
    node.attr("class")?.split_whitespace().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .filter(|lang| !lang.is_empty())
    })
}

fn code_block(pre: &Node, options: &ConversionOptions) -> String {
    let language = code_language(pre).or_else(|| {
        pre.element_children()
            .find(|child| child.tag() == Some("code"))
            .and_then(code_language)
    });
    let text = pre.text_content();
    let code = text.strip_suffix('\n').unwrap_or(&text);

    match options.code_block_style {
        CodeBlockStyle::BeginEnd => {
            let body = code
                .split('\n')
                .map(|line| {
                    if needs_comma(line) {
                        Cow::Owned(format!(",{line}"))
                    } else {
                        Cow::Borrowed(line)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            match language {
                Some(lang) => format!("\n\n#+BEGIN_SRC {lang}\n{body}\n#+END_SRC\n\n"),
                None => format!("\n\n#+BEGIN_EXAMPLE\n{body}\n#+END_EXAMPLE\n\n"),
            }
        }
        CodeBlockStyle::Colon => {
            let body = code
                .split('\n')
                .map(|line| {
                    if line.is_empty() {
                        ":".to_string()
                    } else {
                        format!(": {line}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("\n\n{body}\n\n")
        }
    }
}

/// Lines Org would read as a heading or keyword inside a block
fn needs_comma(line: &str) -> bool {
    let unescaped = line.trim_start_matches(',');
    unescaped.starts_with('*') || unescaped.starts_with("#+")
}

fn inline_code(content: &str, options: &ConversionOptions) -> String {
    if content.is_empty() {
        return String::new();
    }
    let text = content.replace("\r\n", " ").replace(['\r', '\n'], " ");
    let mut delimiter = options.code_delimiter;
    if text.contains(delimiter.as_char()) {
        delimiter = delimiter.alternate();
    }
    let d = delimiter.as_char();
    format!("{d}{text}{d}")
}

fn ruby_text(content: &str, node: &NodeView<'_>, style: RubyStyle) -> String {
    match style {
        RubyStyle::ForceAddParenthesis => format!("({})", content.trim()),
        RubyStyle::KeepIfWrappedByRp => {
            let is_rp = |sibling: Option<&Node>| sibling.and_then(Node::tag) == Some("rp");
            if is_rp(node.previous_element_sibling()) && is_rp(node.next_element_sibling()) {
                content.to_string()
            } else {
                String::new()
            }
        }
        RubyStyle::RemoveRuby => String::new(),
    }
}

fn ruby_parenthesis(content: &str, node: &NodeView<'_>, style: RubyStyle) -> String {
    match style {
        RubyStyle::KeepIfWrappedByRp => {
            let is_rt = |sibling: Option<&Node>| sibling.and_then(Node::tag) == Some("rt");
            if is_rt(node.previous_element_sibling()) || is_rt(node.next_element_sibling()) {
                content.to_string()
            } else {
                String::new()
            }
        }
        RubyStyle::ForceAddParenthesis | RubyStyle::RemoveRuby => String::new(),
    }
}
