// src/lib.rs
//
// truncahtml — streaming HTML re-serializer
//
// - Scans HTML once and re-emits every event essentially unchanged
//   (attribute order and quoting kept, malformed nesting passed through).
// - Tracks open, non-void elements on an explicit stack.
// - Word truncation stops mid-stream, writes a marker and closes every open
//   element, so summaries stay well-formed.
// - Local href/src values can be made absolute against a base domain.
// - Every entry point is total: any string in, some deterministic string out.

pub mod absolutify;
pub mod elements;
pub mod streamer;
pub mod summary;
pub mod tokenizer;
pub mod truncate;

pub use absolutify::{absolutify, UrlAbsolutifier};
pub use streamer::{Flow, Output, Policy, Streamer, Verbatim};
pub use summary::{finish_marker, strip_cut_separator, summarize, SummaryOptions};
pub use truncate::{truncate, WordTruncator, DEFAULT_MARKER};

/// Re-serialize `html` without changing it.
pub fn reserialize(html: &str) -> String {
    Streamer::new().process(html)
}
