// src/truncate.rs
//
// Word-bounded truncation.
//
// Words are runs of word characters joined by interior hyphens ("one-two" is
// one word, "it's" is two). Only text events are counted; entity and
// character references never are. Once the budget runs out the marker is
// written, every open element is closed and the stream halts.

use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::streamer::{Flow, Output, Policy, Streamer};
use crate::tokenizer::StartTag;

/// Placeholder written where truncation happened.
pub const DEFAULT_MARKER: &str = "__TRUNCATION_MARKER_";

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+(?:-\w+)*").expect("Invalid word regex"))
}

/// Number of words in `text`.
pub fn count_words(text: &str) -> usize {
    word_regex().find_iter(text).count()
}

/// The shortest prefix of `text` holding its first `n` words.
/// Anything after the `n`th word, whitespace included, is cut.
pub fn word_prefix(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match word_regex().find_iter(text).nth(n - 1) {
        Some(word) => &text[..word.end()],
        None => text,
    }
}

/// Policy that stops the stream after `max_words` words.
///
/// `None` means unlimited, in which case the output equals plain
/// re-serialization.
#[derive(Clone, Debug)]
pub struct WordTruncator {
    max_words: Option<usize>,
    marker: String,
    remaining: Option<usize>,
    /// Set once text used up the last word of the budget; the next tag then
    /// ends the stream.
    exhausted: bool,
}

impl WordTruncator {
    pub fn new(max_words: Option<usize>) -> Self {
        Self {
            max_words,
            marker: DEFAULT_MARKER.to_owned(),
            remaining: max_words,
            exhausted: false,
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn max_words(&self) -> Option<usize> {
        self.max_words
    }

    fn stop(&self, out: &mut Output) -> Flow {
        debug!(
            "word budget of {:?} reached, closing {} open element(s)",
            self.max_words,
            out.stack().len()
        );
        out.write(&self.marker);
        out.close_open_tags();
        Flow::Halt
    }
}

impl Default for WordTruncator {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Policy for WordTruncator {
    fn reset(&mut self) {
        self.remaining = self.max_words;
        self.exhausted = false;
    }

    fn on_text(&mut self, out: &mut Output, text: &str) -> Flow {
        let Some(remaining) = self.remaining else {
            out.write(text);
            return Flow::Continue;
        };

        let words = count_words(text);
        if words <= remaining {
            out.write(text);
            self.remaining = Some(remaining - words);
            if words > 0 && words == remaining {
                self.exhausted = true;
            }
            return Flow::Continue;
        }

        out.write(word_prefix(text, remaining));
        self.remaining = Some(0);
        self.stop(out)
    }

    fn on_start_tag(&mut self, out: &mut Output, tag: &StartTag<'_>) -> Flow {
        if self.exhausted {
            return self.stop(out);
        }
        out.start_tag(tag, &*self);
        Flow::Continue
    }

    fn on_end_tag(&mut self, out: &mut Output, name: &str) -> Flow {
        if self.exhausted {
            return self.stop(out);
        }
        out.end_tag(name);
        Flow::Continue
    }
}

/// Truncate `html` to at most `max_words` words, closing whatever is open at
/// the cut and appending `marker` there.
pub fn truncate(html: &str, max_words: Option<usize>, marker: &str) -> String {
    Streamer::with_policy(WordTruncator::new(max_words).with_marker(marker)).process(html)
}
