// src/summary.rs
//
// Post summaries.
//
// An author can end the summary explicitly with a cut comment such as
// `<!-- cut -->`; otherwise the body is truncated by word count and the
// marker is turned into an ellipsis.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Match, Regex};

use crate::streamer::Streamer;
use crate::truncate::{truncate, DEFAULT_MARKER};

/// Default summary length in words.
pub const DEFAULT_SUMMARY_WORDS: usize = 180;

/// Single-line HTML comments; the ones mentioning `cut` are separators.
fn comment_regex() -> &'static Regex {
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    COMMENT.get_or_init(|| Regex::new(r"<!--(.*?)-->").expect("Invalid comment regex"))
}

fn is_cut_separator(caps: &Captures<'_>) -> bool {
    caps[1].contains("cut")
}

fn find_cut_separator(html: &str) -> Option<Match<'_>> {
    comment_regex()
        .captures_iter(html)
        .find(is_cut_separator)
        .and_then(|caps| caps.get(0))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryOptions {
    /// `None` keeps the whole body.
    pub max_words: Option<usize>,
    pub marker: String,
    /// Replaces the marker and any whitespace right before it.
    pub ellipsis: String,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_words: Some(DEFAULT_SUMMARY_WORDS),
            marker: DEFAULT_MARKER.to_owned(),
            ellipsis: "...".to_owned(),
        }
    }
}

/// Body with every cut separator removed.
pub fn strip_cut_separator(html: &str) -> Cow<'_, str> {
    comment_regex().replace_all(html, |caps: &Captures<'_>| {
        if is_cut_separator(caps) {
            String::new()
        } else {
            caps[0].to_owned()
        }
    })
}

/// Summary of a rendered post body.
///
/// With a cut separator the summary is everything before the first one, with
/// open elements closed. Without one, the body is truncated to
/// `options.max_words` and finished with [`finish_marker`].
pub fn summarize(html: &str, options: &SummaryOptions) -> String {
    if let Some(cut) = find_cut_separator(html) {
        let mut streamer = Streamer::new();
        streamer.process(&html[..cut.start()]);
        streamer.close_open_tags();
        return streamer.output().to_owned();
    }
    let truncated = truncate(html, options.max_words, &options.marker);
    finish_marker(&truncated, &options.marker, &options.ellipsis)
}

/// Replace each `marker`, together with the whitespace right before it, by
/// `ellipsis`.
pub fn finish_marker(truncated: &str, marker: &str, ellipsis: &str) -> String {
    if marker.is_empty() {
        return truncated.to_owned();
    }
    let mut out = String::with_capacity(truncated.len());
    let mut rest = truncated;
    while let Some(pos) = rest.find(marker) {
        out.push_str(rest[..pos].trim_end());
        out.push_str(ellipsis);
        rest = &rest[pos + marker.len()..];
    }
    out.push_str(rest);
    out
}
