//! Escaping of literal Org syntax in text
//!
//! Text outside a code context passes through an ordered list of
//! substitutions so that characters Org would read as markup come out
//! literally. The order is part of the output contract: the backslash step
//! runs first so that backslashes added by later steps are not doubled, and
//! the leading-marker steps see the text as rewritten by the steps before
//! them.
//!
//! Patterns anchored with `^` only match at the very start of the text node,
//! not at every line start.
//!
//! | step | pattern | replacement |
//! |------|---------|-------------|
//! | 1 | `\` | `\\` |
//! | 2 | `*` | `\*` |
//! | 3 | leading `-` | `\-` |
//! | 4 | leading `+ ` | `\+ ` |
//! | 5 | leading run of `=` | `\` + run |
//! | 6 | leading `#`×1-6 + space | `\` + hashes + space |
//! | 7 | `` ` `` | `` \` `` |
//! | 8 | leading `~~~` | `\~~~` |
//! | 9 | leading `>` | `\>` |
//! | 10 | `_` | `\_` |
//! | 11 | leading `N. ` | `N\. ` |

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Ordered (pattern, replacement) pairs
const ESCAPE_STEPS: &[(&str, &str)] = &[
    (r"\\", r"\\"),
    (r"\*", r"\*"),
    (r"^-", r"\-"),
    (r"^\+ ", r"\+ "),
    (r"^(=+)", r"\${1}"),
    (r"^(#{1,6}) ", r"\${1} "),
    (r"`", r"\`"),
    (r"^~~~", r"\~~~"),
    (r"^>", r"\>"),
    (r"_", r"\_"),
    (r"^([0-9]+)\. ", r"${1}\. "),
];

fn escape_pipeline() -> &'static [(Regex, &'static str)] {
    static PIPELINE: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PIPELINE.get_or_init(|| {
        ESCAPE_STEPS
            .iter()
            .map(|(pattern, replacement)| {
                let regex = Regex::new(pattern).expect("escape patterns are valid regexes");
                (regex, *replacement)
            })
            .collect()
    })
}

/// Escape Org markup characters in `text`
///
/// # Examples
///
/// ```rust
/// use html2org::escape::escape;
///
/// assert_eq!(escape("2 * 3"), "2 \\* 3");
/// assert_eq!(escape("- not a list"), "\\- not a list");
/// assert_eq!(escape("snake_case"), "snake\\_case");
/// ```
pub fn escape(text: &str) -> String {
    let mut out = text.to_string();
    for (regex, replacement) in escape_pipeline() {
        let replaced = match regex.replace_all(&out, *replacement) {
            Cow::Owned(replaced) => Some(replaced),
            Cow::Borrowed(_) => None,
        };
        if let Some(replaced) = replaced {
            out = replaced;
        }
    }
    out
}
