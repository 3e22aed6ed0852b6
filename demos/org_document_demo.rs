//! Exporting a whole page as an Org document
//!
//! Run with: cargo run --example org_document_demo

use html2org::document::OrgDocument;
use html2org::metadata::MetadataExtractor;
use html2org::{OrgConverter, parse_html};

fn main() {
    println!("=== Org Document Export ===\n");

    let html = r#"<!DOCTYPE html>
<html>
<head>
    <title>Getting Started</title>
    <meta name="author" content="Docs Team">
    <meta name="description" content="A short tour of the project.">
    <meta name="keywords" content="tutorial, org">
    <link rel="canonical" href="/docs/start">
</head>
<body>
    <h1>Getting Started</h1>
    <p>Read the <a href="/docs/install">install guide</a> first.</p>
    <h2>Next steps</h2>
    <ul><li>Write notes</li><li>Export them</li></ul>
</body>
</html>"#;

    let dom = parse_html(html);
    let metadata =
        MetadataExtractor::new(Some("https://example.com/".to_string())).extract(&dom);

    println!("Extracted metadata:");
    println!("  title:       {:?}", metadata.title);
    println!("  author:      {:?}", metadata.author);
    println!("  description: {:?}", metadata.description);
    println!("  keywords:    {:?}", metadata.keywords);
    println!("  url:         {:?}", metadata.url);
    println!();

    let body = OrgConverter::new()
        .convert(&dom)
        .expect("Conversion failed");
    let document = OrgDocument::from_metadata(&metadata, body).with_date("2024-01-01");

    println!("File name: {}\n", document.file_name());
    println!("{}", "=".repeat(80));
    print!("{}", document.render());
    println!("{}", "=".repeat(80));
}
