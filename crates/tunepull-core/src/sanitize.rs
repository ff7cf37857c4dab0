//! Filename-safe track names.
//!
//! Characters that Windows and most filesystems reject in a filename are
//! swapped for their full-width forms, so the title stays readable instead
//! of collapsing into underscores.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Illegal character and its full-width replacement.
pub const CHAR_MAP: [(char, char); 9] = [
    (':', '：'),
    ('?', '？'),
    ('*', '＊'),
    ('"', '＂'),
    ('<', '＜'),
    ('>', '＞'),
    ('|', '｜'),
    ('/', '／'),
    ('\\', '＼'),
];

static ILLEGAL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    let class: String = CHAR_MAP
        .iter()
        .map(|(c, _)| regex::escape(&c.to_string()))
        .collect();
    Regex::new(&format!("[{class}]")).expect("illegal character class is a valid regex")
});

fn full_width(c: char) -> Option<char> {
    CHAR_MAP
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

/// Replaces every illegal character in `name` with its full-width counterpart.
///
/// One pass over the input; replacements are never rescanned. Borrows when
/// nothing needed replacing.
pub fn sanitize_name(name: &str) -> Cow<'_, str> {
    ILLEGAL_CHARS.replace_all(name, |caps: &Captures| {
        let matched = &caps[0];
        matched
            .chars()
            .next()
            .and_then(full_width)
            .map(String::from)
            .unwrap_or_else(|| matched.to_string())
    })
}
