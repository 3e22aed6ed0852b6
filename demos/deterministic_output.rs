/// Example demonstrating deterministic Org output
///
/// The converter produces identical output for identical HTML input, and the
/// output never carries more than one blank line in a row.
///
/// Run with: cargo run --example deterministic_output
use html2org::{OrgConverter, parse_html};

fn main() {
    println!("=== Deterministic Org Output Example ===\n");

    let html = r#"
        <html>
        <head><title>Test Page</title></head>
        <body>
            <h1>Main Title</h1>
            <p>This is a paragraph with <strong>bold</strong> and <em>italic</em> text.</p>
            <p>Here's a <a href="https://example.com">link</a> and an image: <img src="image.png" alt="Test Image"/></p>
            <ul>
                <li>First item</li>
                <li>Second item with <code>inline code</code></li>
                <li>Third item
                    <ul>
                        <li>Nested item 1</li>
                        <li>Nested item 2</li>
                    </ul>
                </li>
            </ul>
            <pre><code class="language-rust">fn main() {
    println!("Hello, world!");
}
</code></pre>
        </body>
        </html>
    "#;

    println!("Converting HTML to Org 5 times...\n");

    let mut results = Vec::new();
    for i in 1..=5 {
        let dom = parse_html(html);
        let converter = OrgConverter::new();
        let org = converter.convert(&dom).expect("Failed to convert");

        println!("Conversion {}: {} bytes", i, org.len());
        results.push(org);
    }

    println!("\nVerifying deterministic output...");
    let first = &results[0];
    let all_identical = results.iter().all(|r| r == first);

    if all_identical {
        println!("✓ SUCCESS: All 5 conversions produced identical output!");
        println!("\nOrg output:\n{}", "=".repeat(80));
        println!("{}", first);
        println!("{}", "=".repeat(80));
    } else {
        println!("✗ FAILURE: Conversions produced different output!");
        for (i, result) in results.iter().enumerate() {
            if result != first {
                println!("\nConversion {} differs from first:", i + 1);
                println!("Length: {} vs {}", result.len(), first.len());
            }
        }
    }

    println!("\n=== Normalization Features ===\n");

    let converter = OrgConverter::new();

    let crlf = converter
        .convert("<p>Line 1</p>\r\n<p>Line 2</p>\r\n")
        .expect("Failed to convert");
    println!("1. CRLF in markup: contains \\r: {}", crlf.contains('\r'));

    let blanks = converter
        .convert("<div><p>Para 1</p></div><section><p>Para 2</p></section>")
        .expect("Failed to convert");
    println!(
        "2. Nested blocks: contains \\n\\n\\n: {}",
        blanks.contains("\n\n\n")
    );

    println!(
        "3. Output trimmed: {}",
        blanks.trim_end() == blanks && !blanks.starts_with('\n')
    );

    let code = converter
        .convert("<p>Text with  spaces</p><pre><code>code  with  spaces</code></pre>")
        .expect("Failed to convert");
    println!(
        "4. Whitespace: collapsed in text: {}, preserved in code: {}",
        code.contains("Text with spaces"),
        code.contains("code  with  spaces")
    );
}
