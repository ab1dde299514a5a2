// src/elements.rs
//
// Fixed element-name sets. Names are matched ASCII case-insensitively.

/// Elements that never take children and never get a closing tag.
const VOID: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"command", b"embed", b"hr", b"img", b"input", b"keygen",
    b"link", b"meta", b"param", b"source", b"track", b"wbr",
];

/// Elements whose content is scanned as opaque text up to the matching end tag.
const RAW_TEXT: &[&[u8]] = &[b"script", b"style"];

pub fn is_void(name: &str) -> bool {
    matches_ignore_ascii_case(name.as_bytes(), VOID)
}

pub(crate) fn is_raw_text(name: &[u8]) -> bool {
    matches_ignore_ascii_case(name, RAW_TEXT)
}

fn matches_ignore_ascii_case(name: &[u8], set: &[&[u8]]) -> bool {
    set.iter().any(|&s| name.eq_ignore_ascii_case(s))
}
