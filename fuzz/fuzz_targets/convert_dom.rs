#![no_main]

use html2org::metadata::MetadataExtractor;
use html2org::{OrgConverter, parse_html};
use libfuzzer_sys::fuzz_target;
use markup5ever_rcdom::RcDom;

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let dom: RcDom = parse_html(&html);

    let _ = MetadataExtractor::new(Some("https://example.com/".to_string())).extract(&dom);
    let _ = OrgConverter::new().convert(&dom);
});
