//! Basic conversion example demonstrating the Org converter
//!
//! Run with: cargo run --example basic_conversion

use html2org::{OrgConverter, Rule, parse_html};

fn main() {
    println!("=== html2org - Basic Examples ===\n");

    // Example 1: Headings, paragraphs and emphasis
    example_1();

    // Example 2: Lists and code blocks
    example_2();

    // Example 3: Tables
    example_3();

    // Example 4: Removing and keeping elements
    example_4();

    // Example 5: A custom rule
    example_5();
}

fn show(title: &str, html: &str, converter: &OrgConverter) {
    println!("{}", title);
    println!("Input HTML:");
    println!("{}\n", html);

    let org = converter.convert(html).expect("Conversion failed");

    println!("Output Org:");
    println!("{}", org);
    println!("---\n");
}

fn example_1() {
    show(
        "Example 1: Headings, paragraphs and emphasis",
        "<h1>Welcome</h1><p>This is <strong>bold</strong>, <em>italic</em> and <code>code</code>.</p>",
        &OrgConverter::new(),
    );
}

fn example_2() {
    show(
        "Example 2: Lists and code blocks",
        "<ol><li>Install</li><li>Run<ul><li>debug</li><li>release</li></ul></li></ol>\
         <pre><code class=\"language-sh\">cargo run --release</code></pre>",
        &OrgConverter::new(),
    );
}

fn example_3() {
    show(
        "Example 3: Tables",
        "<table><thead><tr><th>Crate</th><th>Role</th></tr></thead>\
         <tbody><tr><td>html5ever</td><td>parsing</td></tr>\
         <tr><td>regex</td><td>escaping</td></tr></tbody></table>",
        &OrgConverter::new(),
    );
}

fn example_4() {
    let mut converter = OrgConverter::new();
    converter.remove(["script", "style"]).keep("kbd");
    show(
        "Example 4: Removing and keeping elements",
        "<p>Press <kbd>C-c</kbd> to quit.</p><script>track()</script>",
        &converter,
    );
}

fn example_5() {
    let mut converter = OrgConverter::new();
    converter.add_rule(
        "mark",
        Rule::new("mark", |content, _, _| format!("+{content}+")),
    );

    println!("Example 5: A custom rule on a parsed document");
    let html = "<html><body><p>Old <mark>news</mark></p></body></html>";
    println!("Input HTML:");
    println!("{}\n", html);

    let dom = parse_html(html);
    let org = converter.convert(&dom).expect("Conversion failed");

    println!("Output Org:");
    println!("{}", org);
    println!("---\n");
}
