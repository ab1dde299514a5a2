// src/tokenizer.rs
//
// Byte-level HTML scanner.
//
// - Yields borrowed events; no tree building, no entity decoding.
// - Tag ends are found quote-aware, so '>' inside an attribute value does not close the tag.
// - <script>/<style> content is one opaque text event up to the matching end tag.
// - '&name;' and '&#123;' / '&#x7b;' are separate reference events; a bare '&' is text.
// - '<' that cannot start markup is text.
// - Markup still open at end of input (no '>', no '-->') is dropped.
// - A start tag whose quoted value never closes is text, so scanning goes on.
// - UTF-8 safe: every split point is an ASCII byte, so all slices are valid &str.

use log::debug;
use memchr::{memchr, memchr2, memmem};

use crate::elements::is_raw_text;

/// How an attribute value was quoted in the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
    Unquoted,
}

impl Quote {
    pub fn as_str(self) -> &'static str {
        match self {
            Quote::Double => "\"",
            Quote::Single => "'",
            Quote::Unquoted => "",
        }
    }
}

/// A start-tag attribute. `value` is the raw source text between the quotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
    pub quote: Quote,
}

impl<'a> Attribute<'a> {
    pub fn bare(name: &'a str) -> Self {
        Self {
            name,
            value: None,
            quote: Quote::Unquoted,
        }
    }

    pub fn quoted(name: &'a str, value: &'a str, quote: Quote) -> Self {
        Self {
            name,
            value: Some(value),
            quote,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartTag<'a> {
    /// Name as written in the source.
    pub name: &'a str,
    pub attributes: Vec<Attribute<'a>>,
    /// Written as `<name ... />`.
    pub self_closing: bool,
}

/// One lexical event. Payloads exclude their delimiters
/// (`Comment` holds what is between `<!--` and `-->`, and so on).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event<'a> {
    StartTag(StartTag<'a>),
    EndTag(&'a str),
    Text(&'a str),
    Comment(&'a str),
    Declaration(&'a str),
    ProcessingInstruction(&'a str),
    EntityRef(&'a str),
    CharRef(&'a str),
}

enum Markup<'a> {
    Event(Event<'a>, usize),
    Unterminated,
    Literal,
}

pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    /// Set right after a raw-text start tag; holds its name.
    raw_text: Option<&'a [u8]>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            raw_text: None,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    /// Does position `i` start something other than text?
    fn starts_markup(&self, i: usize) -> bool {
        let s = self.bytes();
        match s[i] {
            b'&' => scan_reference(self.src, i).is_some(),
            b'<' => match s.get(i + 1).copied() {
                Some(b'!') | Some(b'?') => true,
                Some(b'/') => s.get(i + 2).is_some_and(u8::is_ascii_alphabetic),
                Some(b) => b.is_ascii_alphabetic(),
                None => false,
            },
            _ => false,
        }
    }

    /// End of the text run starting at `from`.
    fn text_end(&self, from: usize) -> usize {
        let s = self.bytes();
        let mut j = from;
        while let Some(off) = memchr2(b'<', b'&', &s[j..]) {
            let k = j + off;
            if k > from && self.starts_markup(k) {
                return k;
            }
            j = k + 1;
        }
        s.len()
    }

    fn scan_markup(&self, i: usize) -> Markup<'a> {
        let src = self.src;
        let s = self.bytes();
        let rest = &s[i..];

        if rest.starts_with(b"<!--") {
            return match memmem::find(&s[i + 4..], b"-->") {
                Some(off) => {
                    let end = i + 4 + off;
                    Markup::Event(Event::Comment(&src[i + 4..end]), end + 3)
                }
                None => Markup::Unterminated,
            };
        }
        if rest.starts_with(b"<![CDATA[") {
            return match memmem::find(&s[i + 9..], b"]]>") {
                Some(off) => {
                    let end = i + 9 + off;
                    Markup::Event(Event::Declaration(&src[i + 2..end + 2]), end + 3)
                }
                None => Markup::Unterminated,
            };
        }

        match rest.get(1).copied() {
            Some(b'!') => match memchr(b'>', &s[i + 2..]) {
                Some(off) => {
                    let end = i + 2 + off;
                    Markup::Event(Event::Declaration(&src[i + 2..end]), end + 1)
                }
                None => Markup::Unterminated,
            },
            Some(b'?') => match memchr(b'>', &s[i + 2..]) {
                Some(off) => {
                    let end = i + 2 + off;
                    Markup::Event(Event::ProcessingInstruction(&src[i + 2..end]), end + 1)
                }
                None => Markup::Unterminated,
            },
            Some(b'/') if rest.get(2).is_some_and(u8::is_ascii_alphabetic) => {
                match memchr(b'>', &s[i + 2..]) {
                    Some(off) => {
                        let name_end = scan_name(s, i + 2);
                        Markup::Event(Event::EndTag(&src[i + 2..name_end]), i + 2 + off + 1)
                    }
                    None => Markup::Unterminated,
                }
            }
            Some(b) if b.is_ascii_alphabetic() => match find_tag_end(s, i) {
                Some(end) => Markup::Event(Event::StartTag(parse_start_tag(src, i, end)), end + 1),
                // an open quote swallowed every '>'; keep the '<' as text
                None if memchr(b'>', &s[i..]).is_some() => Markup::Literal,
                None => Markup::Unterminated,
            },
            _ => Markup::Literal,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        let s = self.bytes();
        let n = s.len();
        if self.pos >= n {
            return None;
        }

        if let Some(name) = self.raw_text.take() {
            let end = find_raw_text_end(s, self.pos, name).unwrap_or(n);
            if end > self.pos {
                let text = &self.src[self.pos..end];
                self.pos = end;
                return Some(Event::Text(text));
            }
        }

        let i = self.pos;
        match s[i] {
            b'<' => match self.scan_markup(i) {
                Markup::Event(event, end) => {
                    if let Event::StartTag(tag) = &event {
                        if !tag.self_closing && is_raw_text(tag.name.as_bytes()) {
                            self.raw_text = Some(tag.name.as_bytes());
                        }
                    }
                    self.pos = end;
                    return Some(event);
                }
                Markup::Unterminated => {
                    debug!("dropping unterminated markup at byte {i}");
                    self.pos = n;
                    return None;
                }
                Markup::Literal => {}
            },
            b'&' => {
                if let Some((event, end)) = scan_reference(self.src, i) {
                    self.pos = end;
                    return Some(event);
                }
            }
            _ => {}
        }

        let end = self.text_end(i);
        self.pos = end;
        Some(Event::Text(&self.src[i..end]))
    }
}

/* ============================ Scanning helpers =========================== */

#[inline]
fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

#[inline]
fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' || b == 0x0c
}

fn scan_name(s: &[u8], mut i: usize) -> usize {
    while i < s.len() && is_name_char(s[i]) {
        i += 1;
    }
    i
}

/// Find the '>' for a tag starting at `i` (s[i] == '<'), being quote-aware.
/// A quote opens a value only as the first non-space byte after '=', the same
/// rule `parse_attributes` follows; `alt=don't` has no quoted value.
/// `None` when the tag or one of its quoted values never closes.
fn find_tag_end(s: &[u8], mut i: usize) -> Option<usize> {
    let n = s.len();
    i += 1;
    let mut after_eq = false;
    while i < n {
        let b = s[i];
        if b == b'>' {
            return Some(i);
        }
        if after_eq && (b == b'"' || b == b'\'') {
            let close = memchr(b, &s[i + 1..])?;
            i += close + 2;
            after_eq = false;
            continue;
        }
        if b == b'=' {
            after_eq = true;
        } else if !is_ws(b) {
            after_eq = false;
        }
        i += 1;
    }
    None
}

/// Position of the `</name` that ends raw-text content, if any.
fn find_raw_text_end(s: &[u8], from: usize, name: &[u8]) -> Option<usize> {
    let finder = memmem::Finder::new(b"</");
    let mut j = from;
    while let Some(off) = finder.find(&s[j..]) {
        let k = j + off;
        let after = k + 2 + name.len();
        if after <= s.len()
            && s[k + 2..after].eq_ignore_ascii_case(name)
            && s.get(after).map_or(true, |&b| b == b'>' || b == b'/' || is_ws(b))
        {
            return Some(k);
        }
        j = k + 2;
    }
    None
}

/// Parse `<name attr...>` spanning `start..=end` (s[end] == '>').
fn parse_start_tag(src: &str, start: usize, end: usize) -> StartTag<'_> {
    let s = src.as_bytes();
    let name_end = scan_name(s, start + 1);

    // self-closing? check before '>'
    let mut j = end;
    while j > name_end && is_ws(s[j - 1]) {
        j -= 1;
    }
    let self_closing = j > name_end && s[j - 1] == b'/';
    let attrs_end = if self_closing { j - 1 } else { end };

    StartTag {
        name: &src[start + 1..name_end],
        attributes: parse_attributes(src, name_end, attrs_end),
        self_closing,
    }
}

/// Attribute scanner over `src[i..end]`: [name] ( '=' [value] )?
/// Values may be quoted or unquoted and are kept raw.
fn parse_attributes(src: &str, mut i: usize, end: usize) -> Vec<Attribute<'_>> {
    let s = src.as_bytes();
    let mut attrs = Vec::new();

    while i < end {
        // skip whitespace and slashes
        while i < end && (is_ws(s[i]) || s[i] == b'/') {
            i += 1;
        }
        if i >= end {
            break;
        }

        // attribute name; a leading '=' belongs to the name
        let name_start = i;
        i += 1;
        while i < end && !is_ws(s[i]) && s[i] != b'/' && s[i] != b'=' {
            i += 1;
        }
        let name = &src[name_start..i];

        let mut k = i;
        while k < end && is_ws(s[k]) {
            k += 1;
        }
        if k >= end || s[k] != b'=' {
            attrs.push(Attribute::bare(name));
            continue;
        }

        // "= value"
        i = k + 1;
        while i < end && is_ws(s[i]) {
            i += 1;
        }
        if i < end && (s[i] == b'"' || s[i] == b'\'') {
            let (q, quote) = if s[i] == b'"' {
                (b'"', Quote::Double)
            } else {
                (b'\'', Quote::Single)
            };
            let value_start = i + 1;
            let value_end = memchr(q, &s[value_start..end]).map_or(end, |off| value_start + off);
            attrs.push(Attribute::quoted(name, &src[value_start..value_end], quote));
            i = (value_end + 1).min(end);
        } else {
            let value_start = i;
            while i < end && !is_ws(s[i]) {
                i += 1;
            }
            attrs.push(Attribute::quoted(name, &src[value_start..i], Quote::Unquoted));
        }
    }
    attrs
}

/// `&name;` or `&#digits;` / `&#xhex;` at `i`, with the index just past ';'.
fn scan_reference(src: &str, i: usize) -> Option<(Event<'_>, usize)> {
    let s = src.as_bytes();
    if s.get(i + 1) == Some(&b'#') {
        let mut j = i + 2;
        let hex = matches!(s.get(j).copied(), Some(b'x') | Some(b'X'));
        if hex {
            j += 1;
        }
        let digits_start = j;
        while j < s.len()
            && (s[j].is_ascii_digit() || (hex && s[j].is_ascii_hexdigit()))
        {
            j += 1;
        }
        if j == digits_start || s.get(j) != Some(&b';') {
            return None;
        }
        return Some((Event::CharRef(&src[i + 2..j]), j + 1));
    }

    if !s.get(i + 1).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    let mut j = i + 2;
    while j < s.len() && (s[j].is_ascii_alphanumeric() || s[j] == b'.' || s[j] == b'-') {
        j += 1;
    }
    if s.get(j) != Some(&b';') {
        return None;
    }
    Some((Event::EntityRef(&src[i + 1..j]), j + 1))
}
