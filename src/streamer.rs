// src/streamer.rs
//
// Event-driven re-serialization.
//
// A `Streamer` feeds tokenizer events to a `Policy`. The policy decides what
// each start tag, end tag and text run turns into and may stop the stream by
// returning `Flow::Halt`; everything else is echoed in its bracketed form.
// The default hooks re-emit the input essentially unchanged, so a policy only
// overrides the hooks it cares about.

use log::{trace, warn};

use crate::elements::is_void;
use crate::tokenizer::{Attribute, Event, StartTag, Tokenizer};

/// Whether the driver keeps feeding events after a hook returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// The output buffer together with the stack of open, non-void elements.
///
/// Stack entries are lowercased tag names, most recently opened last.
#[derive(Debug, Default)]
pub struct Output {
    buf: String,
    stack: Vec<String>,
}

impl Output {
    pub fn write(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn stack(&self) -> &[String] {
        &self.stack
    }

    /// Write a start tag, attributes formatted by `policy`. Opens an element
    /// unless the tag is void or self-closing.
    pub fn start_tag<P: Policy + ?Sized>(&mut self, tag: &StartTag<'_>, policy: &P) {
        self.buf.push('<');
        self.buf.push_str(tag.name);
        policy.format_attributes(&tag.attributes, &mut self.buf);
        if tag.self_closing {
            self.buf.push_str(" />");
            return;
        }
        self.buf.push('>');
        if !is_void(tag.name) {
            self.stack.push(tag.name.to_ascii_lowercase());
        }
    }

    /// Write an end tag. The stack is popped only when `name` matches its top.
    pub fn end_tag(&mut self, name: &str) {
        self.buf.push_str("</");
        self.buf.push_str(name);
        self.buf.push('>');
        if is_void(name) {
            return;
        }
        match self.stack.last() {
            Some(top) if top.eq_ignore_ascii_case(name) => {
                self.stack.pop();
            }
            top => warn!("unexpected end tag </{name}>, innermost open element is {top:?}"),
        }
    }

    /// Write closing tags for every open element, innermost first.
    /// The stack is left as is; nothing may be streamed afterwards.
    pub fn close_open_tags(&mut self) {
        for name in self.stack.iter().rev() {
            self.buf.push_str("</");
            self.buf.push_str(name);
            self.buf.push('>');
        }
    }

    fn reset(&mut self) {
        self.buf.clear();
        self.stack.clear();
    }
}

/// Per-event hooks. The defaults re-serialize faithfully.
pub trait Policy {
    /// Called at the start of every `process` call.
    fn reset(&mut self) {}

    fn on_text(&mut self, out: &mut Output, text: &str) -> Flow {
        out.write(text);
        Flow::Continue
    }

    fn on_start_tag(&mut self, out: &mut Output, tag: &StartTag<'_>) -> Flow {
        out.start_tag(tag, &*self);
        Flow::Continue
    }

    fn on_end_tag(&mut self, out: &mut Output, name: &str) -> Flow {
        out.end_tag(name);
        Flow::Continue
    }

    fn format_attributes(&self, attributes: &[Attribute<'_>], buf: &mut String) {
        for attribute in attributes {
            write_attribute(attribute, buf);
        }
    }
}

/// ` name` or ` name=<q>value<q>`, keeping the source quoting.
pub fn write_attribute(attribute: &Attribute<'_>, buf: &mut String) {
    buf.push(' ');
    buf.push_str(attribute.name);
    if let Some(value) = attribute.value {
        let quote = attribute.quote.as_str();
        buf.push('=');
        buf.push_str(quote);
        buf.push_str(value);
        buf.push_str(quote);
    }
}

/// Plain re-serialization.
#[derive(Clone, Copy, Debug, Default)]
pub struct Verbatim;

impl Policy for Verbatim {}

/// Drives one policy over the events of an HTML string.
///
/// Each `process` call starts from an empty buffer and stack. Both are kept
/// afterwards for inspection until the next call.
#[derive(Debug, Default)]
pub struct Streamer<P = Verbatim> {
    policy: P,
    out: Output,
}

impl Streamer<Verbatim> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: Policy> Streamer<P> {
    pub fn with_policy(policy: P) -> Self {
        Self {
            policy,
            out: Output::default(),
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Re-serialize `html` through the policy and return the result.
    pub fn process(&mut self, html: &str) -> String {
        self.out.reset();
        self.policy.reset();
        for event in Tokenizer::new(html) {
            trace!("{event:?}");
            if self.dispatch(event) == Flow::Halt {
                break;
            }
        }
        self.out.buf.clone()
    }

    fn dispatch(&mut self, event: Event<'_>) -> Flow {
        let out = &mut self.out;
        let (open, body, close) = match event {
            Event::StartTag(tag) => return self.policy.on_start_tag(out, &tag),
            Event::EndTag(name) => return self.policy.on_end_tag(out, name),
            Event::Text(text) => return self.policy.on_text(out, text),
            Event::Comment(data) => ("<!--", data, "-->"),
            Event::Declaration(decl) => ("<!", decl, ">"),
            Event::ProcessingInstruction(data) => ("<?", data, ">"),
            Event::EntityRef(name) => ("&", name, ";"),
            Event::CharRef(code) => ("&#", code, ";"),
        };
        out.write(open);
        out.write(body);
        out.write(close);
        Flow::Continue
    }

    /// Open elements left by the last `process` call.
    pub fn stack(&self) -> &[String] {
        self.out.stack()
    }

    /// Output of the last `process` call, including any closing tags
    /// appended since by [`Streamer::close_open_tags`].
    pub fn output(&self) -> &str {
        self.out.as_str()
    }

    pub fn close_open_tags(&mut self) {
        self.out.close_open_tags();
    }
}
