//! Page metadata extraction for Org document headers
//!
//! Reads the `<head>` of a parsed document and collects what an exported Org
//! file records about its source page:
//!
//! - title from `<title>`, falling back to `og:title` / `twitter:title`
//! - author from `<meta name="author">`
//! - description from `<meta name="description">`, falling back to
//!   `og:description`
//! - keywords from `<meta name="keywords">`, split on commas
//! - source URL from `<link rel="canonical">`, then `og:url`, then the base URL
//!
//! # URL Resolution
//!
//! A relative source URL is resolved against the base URL given to the
//! extractor. Without a usable base URL it is kept as written.
//!
//! # Examples
//!
//! ```rust
//! use html2org::metadata::MetadataExtractor;
//! use html2org::parser::parse_html;
//!
//! let dom = parse_html(
//!     r#"<html><head><title>Example</title><link rel="canonical" href="/post"></head></html>"#,
//! );
//! let extractor = MetadataExtractor::new(Some("https://example.com/a/b".to_string()));
//! let metadata = extractor.extract(&dom);
//!
//! assert_eq!(metadata.title.as_deref(), Some("Example"));
//! assert_eq!(metadata.url.as_deref(), Some("https://example.com/post"));
//! ```

use markup5ever_rcdom::{Handle, NodeData, RcDom};
use url::Url;

/// Metadata of the page a conversion came from
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    /// Canonical address of the page
    pub url: Option<String>,
}

impl PageMetadata {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Metadata extractor with URL resolution
pub struct MetadataExtractor {
    base_url: Option<String>,
}

/// Values seen while walking the document, before fallbacks are applied
#[derive(Default)]
struct Collected {
    title: Option<String>,
    og_title: Option<String>,
    author: Option<String>,
    description: Option<String>,
    og_description: Option<String>,
    keywords: Option<String>,
    canonical: Option<String>,
    og_url: Option<String>,
}

impl MetadataExtractor {
    /// Create a new metadata extractor
    ///
    /// # Arguments
    ///
    /// * `base_url` - Address the document was loaded from, used to resolve a
    ///   relative source URL and as the source URL of last resort
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }

    /// Extract metadata from a parsed document
    ///
    /// Empty values are treated as absent. The first occurrence of each tag
    /// wins.
    pub fn extract(&self, dom: &RcDom) -> PageMetadata {
        let collected = collect(&dom.document);

        let url = collected
            .canonical
            .or(collected.og_url)
            .map(|url| self.resolve_url(&url))
            .or_else(|| self.base_url.clone().filter(|url| !url.trim().is_empty()));

        PageMetadata {
            title: collected.title.or(collected.og_title),
            author: collected.author,
            description: collected.description.or(collected.og_description),
            keywords: collected
                .keywords
                .map(|keywords| {
                    keywords
                        .split(',')
                        .map(str::trim)
                        .filter(|keyword| !keyword.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            url,
        }
    }

    /// Resolve `url` against the base URL
    ///
    /// Absolute URLs, URLs that fail to resolve and any URL when no valid
    /// base is configured are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use html2org::metadata::MetadataExtractor;
    ///
    /// let extractor = MetadataExtractor::new(Some("https://example.com/page/sub".to_string()));
    /// assert_eq!(extractor.resolve_url("/logo.png"), "https://example.com/logo.png");
    /// assert_eq!(extractor.resolve_url("img.png"), "https://example.com/page/img.png");
    /// assert_eq!(extractor.resolve_url("https://other.org/x"), "https://other.org/x");
    /// ```
    pub fn resolve_url(&self, url: &str) -> String {
        if url.is_empty() || Url::parse(url).is_ok() {
            return url.to_string();
        }
        self.base_url
            .as_deref()
            .and_then(|base| Url::parse(base).ok())
            .and_then(|base| base.join(url).ok())
            .map_or_else(|| url.to_string(), String::from)
    }
}

/// Walk the document once, recording the first value of each source
fn collect(document: &Handle) -> Collected {
    let mut collected = Collected::default();
    let mut stack = vec![document.clone()];

    while let Some(node) = stack.pop() {
        if let NodeData::Element { name, attrs, .. } = &node.data {
            let attrs = attrs.borrow();
            let attr = |key: &str| {
                attrs
                    .iter()
                    .find(|a| &*a.name.local == key)
                    .map(|a| a.value.trim().to_string())
                    .filter(|value| !value.is_empty())
            };

            match &*name.local {
                "title" => set_once(&mut collected.title, Some(text_of(&node))),
                "meta" => {
                    let key = attr("property")
                        .or_else(|| attr("name"))
                        .map(|key| key.to_ascii_lowercase());
                    let content = attr("content");
                    let slot = match key.as_deref() {
                        Some("og:title" | "twitter:title") => &mut collected.og_title,
                        Some("author") => &mut collected.author,
                        Some("description") => &mut collected.description,
                        Some("og:description" | "twitter:description") => {
                            &mut collected.og_description
                        }
                        Some("keywords") => &mut collected.keywords,
                        Some("og:url") => &mut collected.og_url,
                        _ => continue,
                    };
                    set_once(slot, content);
                }
                "link" => {
                    let is_canonical = attr("rel").is_some_and(|rel| {
                        rel.split_ascii_whitespace()
                            .any(|token| token.eq_ignore_ascii_case("canonical"))
                    });
                    if is_canonical {
                        set_once(&mut collected.canonical, attr("href"));
                    }
                }
                _ => {}
            }
        }

        // Reverse so the stack pops children in document order
        for child in node.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
    }

    collected
}

fn set_once(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value.filter(|value| !value.is_empty());
    }
}

/// Whitespace-normalized text below `node`
fn text_of(node: &Handle) -> String {
    let mut text = String::new();
    let mut stack = vec![node.clone()];
    while let Some(node) = stack.pop() {
        if let NodeData::Text { contents } = &node.data {
            text.push_str(&contents.borrow());
            text.push(' ');
        }
        for child in node.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;

    fn extract(head: &str, base_url: Option<&str>) -> PageMetadata {
        let dom = parse_html(&format!("<html><head>{head}</head><body></body></html>"));
        MetadataExtractor::new(base_url.map(str::to_string)).extract(&dom)
    }

    #[test]
    fn test_extract_title_from_title_tag() {
        let metadata = extract("<title>  Test   Page </title>", None);
        assert_eq!(metadata.title.as_deref(), Some("Test Page"));
    }

    #[test]
    fn test_og_title_is_a_fallback() {
        let metadata = extract(r#"<meta property="og:title" content="OG">"#, None);
        assert_eq!(metadata.title.as_deref(), Some("OG"));

        let metadata = extract(
            r#"<title>Real</title><meta property="og:title" content="OG">"#,
            None,
        );
        assert_eq!(metadata.title.as_deref(), Some("Real"));
    }

    #[test]
    fn test_extract_author_and_description() {
        let metadata = extract(
            r#"<meta name="author" content="Ada"><meta name="description" content="About it">"#,
            None,
        );
        assert_eq!(metadata.author.as_deref(), Some("Ada"));
        assert_eq!(metadata.description.as_deref(), Some("About it"));
    }

    #[test]
    fn test_og_description_fallback() {
        let metadata = extract(r#"<meta property="og:description" content="OG desc">"#, None);
        assert_eq!(metadata.description.as_deref(), Some("OG desc"));
    }

    #[test]
    fn test_keywords_are_split() {
        let metadata = extract(r#"<meta name="keywords" content="rust, org-mode, ,html">"#, None);
        assert_eq!(metadata.keywords, vec!["rust", "org-mode", "html"]);
    }

    #[test]
    fn test_canonical_beats_og_url() {
        let metadata = extract(
            r#"<meta property="og:url" content="https://og.example/x"><link rel="canonical" href="https://example.com/c">"#,
            None,
        );
        assert_eq!(metadata.url.as_deref(), Some("https://example.com/c"));
    }

    #[test]
    fn test_relative_canonical_is_resolved() {
        let metadata = extract(
            r#"<link rel="canonical" href="../other">"#,
            Some("https://example.com/a/b/c"),
        );
        assert_eq!(metadata.url.as_deref(), Some("https://example.com/a/other"));
    }

    #[test]
    fn test_url_fallback_to_base_url() {
        let metadata = extract("<title>x</title>", Some("https://example.com/page"));
        assert_eq!(metadata.url.as_deref(), Some("https://example.com/page"));
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let metadata = extract(
            r#"<meta name="author" content="  "><meta name="author" content="Second">"#,
            None,
        );
        assert_eq!(metadata.author.as_deref(), Some("Second"));
    }

    #[test]
    fn test_resolve_without_base() {
        let extractor = MetadataExtractor::new(None);
        assert_eq!(extractor.resolve_url("/x"), "/x");
    }

    #[test]
    fn test_resolve_with_malformed_base() {
        let extractor = MetadataExtractor::new(Some("not a url".to_string()));
        assert_eq!(extractor.resolve_url("x.png"), "x.png");
    }

    #[test]
    fn test_document_without_head() {
        let metadata = MetadataExtractor::new(None).extract(&parse_html("<p>only body</p>"));
        assert_eq!(metadata, PageMetadata::new());
    }
}
