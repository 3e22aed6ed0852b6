//! Org document assembly
//!
//! Wraps a converted page body in the headers and sections of a standalone
//! Org file:
//!
//! ```text
//! #+TITLE: Page title
//! #+DATE: 2024-05-01T12:00:00Z
//! #+AUTHOR: Ada
//! #+KEYWORDS: rust, org
//! #+SOURCE_URL: https://example.com/post
//!
//! * Abstract
//!
//! Page description
//!
//! * Content
//!
//! Converted body
//! ```
//!
//! Also provides the single-link and file-name helpers used when exporting.

use crate::metadata::PageMetadata;
use crate::org_rules::decode_uri;

/// Characters that are not allowed in exported file names
const UNSAFE_FILE_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Characters escaped in the description of a single link
const LINK_TEXT_SPECIALS: &[char] = &['\\', '`', '*', '_', '[', ']', '<', '>'];

/// A complete Org file built from page metadata and a converted body
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrgDocument {
    pub title: String,
    /// Timestamp supplied by the caller
    pub date: Option<String>,
    pub author: Option<String>,
    pub keywords: Vec<String>,
    pub source_url: Option<String>,
    /// Rendered as an `* Abstract` section
    pub description: Option<String>,
    /// Converted Org body
    pub content: String,
}

impl OrgDocument {
    /// Start a document from extracted page metadata
    pub fn from_metadata(metadata: &PageMetadata, content: impl Into<String>) -> Self {
        Self {
            title: metadata.title.clone().unwrap_or_default(),
            date: None,
            author: metadata.author.clone(),
            keywords: metadata.keywords.clone(),
            source_url: metadata.url.clone(),
            description: metadata.description.clone(),
            content: content.into(),
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Render the document
    ///
    /// Headers with no value are left out and every header value is flattened
    /// to one line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use html2org::document::OrgDocument;
    ///
    /// let doc = OrgDocument {
    ///     title: "Notes".to_string(),
    ///     content: "Body".to_string(),
    ///     ..Default::default()
    /// };
    /// assert_eq!(doc.render(), "#+TITLE: Notes\n\n* Content\n\nBody\n");
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();

        let keywords = self.keywords.join(", ");
        let headers = [
            ("TITLE", Some(self.title.as_str())),
            ("DATE", self.date.as_deref()),
            ("AUTHOR", self.author.as_deref()),
            ("KEYWORDS", Some(keywords.as_str())),
            ("SOURCE_URL", self.source_url.as_deref()),
        ];
        for (name, value) in headers {
            let value = value.map(single_line).unwrap_or_default();
            if !value.is_empty() {
                out.push_str(&format!("#+{name}: {value}\n"));
            }
        }
        if !out.is_empty() {
            out.push('\n');
        }

        if let Some(description) = self.description.as_deref().map(str::trim) {
            if !description.is_empty() {
                out.push_str("* Abstract\n\n");
                out.push_str(description);
                out.push_str("\n\n");
            }
        }

        out.push_str("* Content\n\n");
        let content = self.content.trim_end();
        if !content.is_empty() {
            out.push_str(content);
            out.push('\n');
        }
        out
    }

    /// File name for the exported document
    pub fn file_name(&self) -> String {
        let stem = safe_file_name(&single_line(&self.title));
        if stem.is_empty() {
            "untitled.org".to_string()
        } else {
            format!("{stem}.org")
        }
    }
}

/// Collapse all whitespace runs, newlines included, to single spaces
fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Org link to `url` described by `text`
///
/// Markup characters in the description are backslash-escaped, and the URL
/// is percent-decoded when `decode` is set (an undecodable URL is kept).
///
/// # Examples
///
/// ```rust
/// use html2org::document::org_link;
///
/// assert_eq!(
///     org_link("https://example.com/a%20b", "my_page [draft]", true),
///     "[[https://example.com/a b][my\\_page \\[draft\\]]]"
/// );
/// ```
pub fn org_link(url: &str, text: &str, decode: bool) -> String {
    let url = if decode {
        decode_uri(url).into_owned()
    } else {
        url.to_string()
    };

    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if LINK_TEXT_SPECIALS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    format!("[[{url}][{escaped}]]")
}

/// `title` with characters unsafe in file names replaced by `_`, trimmed
///
/// # Examples
///
/// ```rust
/// use html2org::document::safe_file_name;
///
/// assert_eq!(safe_file_name(" What? A/B: test "), "What_ A_B_ test");
/// ```
pub fn safe_file_name(title: &str) -> String {
    title
        .replace(UNSAFE_FILE_NAME_CHARS, "_")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_document() -> OrgDocument {
        OrgDocument {
            title: "A\nTitle".to_string(),
            date: Some("2024-05-01T12:00:00Z".to_string()),
            author: Some("Ada".to_string()),
            keywords: vec!["rust".to_string(), "org".to_string()],
            source_url: Some("https://example.com/post".to_string()),
            description: Some("Summary.".to_string()),
            content: "Body\n\nMore\n".to_string(),
        }
    }

    #[test]
    fn test_render_full_document() {
        assert_eq!(
            full_document().render(),
            "#+TITLE: A Title\n\
             #+DATE: 2024-05-01T12:00:00Z\n\
             #+AUTHOR: Ada\n\
             #+KEYWORDS: rust, org\n\
             #+SOURCE_URL: https://example.com/post\n\
             \n\
             * Abstract\n\
             \n\
             Summary.\n\
             \n\
             * Content\n\
             \n\
             Body\n\
             \n\
             More\n"
        );
    }

    #[test]
    fn test_render_omits_empty_fields() {
        let doc = OrgDocument {
            author: Some("  ".to_string()),
            description: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(doc.render(), "* Content\n\n");
    }

    #[test]
    fn test_from_metadata() {
        let metadata = PageMetadata {
            title: Some("T".to_string()),
            author: None,
            description: Some("D".to_string()),
            keywords: Vec::new(),
            url: Some("https://example.com".to_string()),
        };
        let doc = OrgDocument::from_metadata(&metadata, "x").with_date("2024-01-01");
        assert_eq!(
            doc.render(),
            "#+TITLE: T\n#+DATE: 2024-01-01\n#+SOURCE_URL: https://example.com\n\n* Abstract\n\nD\n\n* Content\n\nx\n"
        );
    }

    #[test]
    fn test_file_name() {
        assert_eq!(full_document().file_name(), "A Title.org");
        assert_eq!(OrgDocument::default().file_name(), "untitled.org");
    }

    #[test]
    fn test_org_link_escapes_text() {
        assert_eq!(
            org_link("https://x.org", r"a\b`c*d_e<f>", false),
            r"[[https://x.org][a\\b\`c\*d\_e\<f\>]]"
        );
    }

    #[test]
    fn test_org_link_keeps_undecodable_url() {
        assert_eq!(org_link("https://x.org/%FF", "t", true), "[[https://x.org/%FF][t]]");
    }

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name(r#"a<b>c:d"e/f\g|h?i*j"#), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(safe_file_name("  plain  "), "plain");
    }
}
