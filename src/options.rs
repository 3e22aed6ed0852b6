//! Conversion options
//!
//! A [`ConversionOptions`] value is built once per converter by merging the
//! caller's overrides onto the documented defaults and is never changed while
//! a conversion runs.
//!
//! Overrides can be written with struct update syntax:
//!
//! ```rust
//! use html2org::options::{ConversionOptions, UnorderedListMarker};
//!
//! let options = ConversionOptions {
//!     unordered_list_marker: UnorderedListMarker::Plus,
//!     list_indent_size: 4,
//!     ..Default::default()
//! };
//! assert_eq!(options.heading_marker, '*');
//! ```
//!
//! or taken from a partial settings record, in which case every field that is
//! absent keeps its default. Both the engine names (`unorderedListMarker`) and
//! the settings-store names (`ulBulletChar`) are accepted.

use serde::{Deserialize, Serialize};

use crate::rules::Replacement;

/// Default limit on markup nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Bullet used for unordered list items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnorderedListMarker {
    #[default]
    #[serde(rename = "-")]
    Dash,
    #[serde(rename = "+")]
    Plus,
}

impl UnorderedListMarker {
    pub fn as_char(self) -> char {
        match self {
            UnorderedListMarker::Dash => '-',
            UnorderedListMarker::Plus => '+',
        }
    }
}

/// Punctuation following the number of an ordered list item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderedListMarker {
    #[default]
    #[serde(rename = ".")]
    Period,
    #[serde(rename = ")")]
    Paren,
}

impl OrderedListMarker {
    pub fn as_char(self) -> char {
        match self {
            OrderedListMarker::Period => '.',
            OrderedListMarker::Paren => ')',
        }
    }
}

/// Org verbatim (`=`) or code (`~`) markup for inline code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CodeDelimiter {
    #[default]
    #[serde(rename = "=")]
    Verbatim,
    #[serde(rename = "~")]
    Code,
}

impl CodeDelimiter {
    pub fn as_char(self) -> char {
        match self {
            CodeDelimiter::Verbatim => '=',
            CodeDelimiter::Code => '~',
        }
    }

    /// The other delimiter, used when the content contains this one
    pub fn alternate(self) -> Self {
        match self {
            CodeDelimiter::Verbatim => CodeDelimiter::Code,
            CodeDelimiter::Code => CodeDelimiter::Verbatim,
        }
    }
}

/// How `<pre>` blocks are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeBlockStyle {
    /// `#+BEGIN_SRC` / `#+END_SRC`
    #[default]
    BeginEnd,
    /// Every line prefixed with `: `
    Colon,
}

/// Link output style. Only inlined links are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkStyle {
    #[default]
    Inlined,
    /// Reserved, currently rendered the same as `Inlined`
    Referenced,
}

/// Reference link flavour, reserved for `LinkStyle::Referenced`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkReferenceStyle {
    #[default]
    Full,
    Collapsed,
    Shortcut,
}

/// Treatment of `[` and `]` inside link text and targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SquareBracketsInLink {
    Keep,
    Omit,
    ReplaceWithSpaces,
    #[default]
    ReplaceWithRoundBrackets,
}

impl SquareBracketsInLink {
    /// Rewrite square brackets in `text` according to the policy
    pub fn apply(self, text: &str) -> String {
        match self {
            SquareBracketsInLink::Keep => text.to_string(),
            SquareBracketsInLink::Omit => text.replace(['[', ']'], ""),
            SquareBracketsInLink::ReplaceWithSpaces => text.replace(['[', ']'], " "),
            SquareBracketsInLink::ReplaceWithRoundBrackets => {
                text.replace('[', "(").replace(']', ")")
            }
        }
    }
}

/// Handling of `<ruby>` annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RubyStyle {
    /// `base(annotation)`, ignoring `<rp>`
    ForceAddParenthesis,
    /// Keep the annotation only when `<rp>` already wraps it
    KeepIfWrappedByRp,
    /// Drop annotations entirely
    #[default]
    RemoveRuby,
}

/// Conversion options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionOptions {
    /// Character repeated once per heading level
    pub heading_marker: char,
    /// Horizontal rule text
    pub hr: String,
    /// Spaces used to indent nested list content
    pub list_indent_size: usize,
    #[serde(alias = "ulBulletChar")]
    pub unordered_list_marker: UnorderedListMarker,
    #[serde(alias = "olBulletChar")]
    pub ordered_list_marker: OrderedListMarker,
    pub code_block_style: CodeBlockStyle,
    pub italic_delimiter: char,
    pub bold_delimiter: char,
    pub underline_delimiter: char,
    pub strike_delimiter: char,
    #[serde(alias = "codeChar")]
    pub code_delimiter: CodeDelimiter,
    pub link_style: LinkStyle,
    pub link_reference_style: LinkReferenceStyle,
    pub square_brackets_in_link: SquareBracketsInLink,
    /// URI-decode link and image targets
    pub decode_uri: bool,
    #[serde(alias = "rubyHandleMethod")]
    pub ruby: RubyStyle,
    /// Deepest element nesting accepted before failing with `ResourceExhausted`
    pub max_depth: usize,
    /// Output for blank nodes
    #[serde(skip, default = "Replacement::blank")]
    pub blank_replacement: Replacement,
    /// Output for nodes matched by a keep filter
    #[serde(skip, default = "Replacement::keep")]
    pub keep_replacement: Replacement,
    /// Output for nodes no rule claims
    #[serde(skip, default = "Replacement::default_block")]
    pub default_replacement: Replacement,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            heading_marker: '*',
            hr: "-----".to_string(),
            list_indent_size: 2,
            unordered_list_marker: UnorderedListMarker::Dash,
            ordered_list_marker: OrderedListMarker::Period,
            code_block_style: CodeBlockStyle::BeginEnd,
            italic_delimiter: '/',
            bold_delimiter: '*',
            underline_delimiter: '_',
            strike_delimiter: '+',
            code_delimiter: CodeDelimiter::Verbatim,
            link_style: LinkStyle::Inlined,
            link_reference_style: LinkReferenceStyle::Full,
            square_brackets_in_link: SquareBracketsInLink::ReplaceWithRoundBrackets,
            decode_uri: true,
            ruby: RubyStyle::RemoveRuby,
            max_depth: DEFAULT_MAX_DEPTH,
            blank_replacement: Replacement::blank(),
            keep_replacement: Replacement::keep(),
            default_replacement: Replacement::default_block(),
        }
    }
}
