#![no_main]

use html2org::{ConversionError, OrgConverter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(html) = std::str::from_utf8(data) else {
        return;
    };

    let mut converter = OrgConverter::new();
    converter.remove(["script", "style"]).keep("kbd");

    match converter.convert(html) {
        Ok(org) => {
            assert!(!org.contains("\n\n\n"));
            assert_eq!(org.trim_end(), org);
        }
        // Deep nesting, or a frameset document with no body
        Err(ConversionError::ResourceExhausted { .. } | ConversionError::Parse(_)) => {}
        Err(e) => panic!("unexpected conversion error: {e}"),
    }
});
