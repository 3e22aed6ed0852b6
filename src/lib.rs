//! html2org - HTML to Org-mode conversion engine
//!
//! This library converts HTML fragments and documents into Org-mode text
//! through a rule-driven tree rewriter. Every element resolves to exactly one
//! replacement, and the same input with the same options always produces the
//! same output.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `parser`: HTML5 parsing using html5ever
//! - `dom`: owned markup tree the converter walks
//! - `whitespace`: browser-style whitespace collapsing
//! - `node`: per-node view (block, code context, blank, flanking whitespace)
//! - `rules`: rule registry with keep and remove filters
//! - `org_rules`: standard Org-mode rule table
//! - `table`: table sub-converter
//! - `escape`: ordered escaping of Org markup in text
//! - `converter`: the conversion engine
//! - `options`: conversion options
//! - `metadata`: page metadata extraction
//! - `document`: Org document assembly and export helpers
//!
//! # Examples
//!
//! ```rust
//! use html2org::OrgConverter;
//!
//! let org = OrgConverter::new()
//!     .convert("<ul><li>one</li><li><a href=\"https://example.com\">two</a></li></ul>")
//!     .expect("conversion succeeds");
//! assert_eq!(org, "- one\n- [[https://example.com][two]]");
//! ```

// Module declarations
pub mod converter;
pub mod document;
pub mod dom;
pub mod error;
pub mod escape;
pub mod metadata;
pub mod node;
pub mod options;
pub mod org_rules;
pub mod parser;
pub mod rules;
pub mod table;
pub mod whitespace;

// Re-export main types for convenience
pub use converter::{Input, OrgConverter, Plugin, join, post_process};
pub use document::OrgDocument;
pub use error::{ConversionError, Result};
pub use options::ConversionOptions;
pub use parser::parse_html;
pub use rules::{Filter, Rule};
