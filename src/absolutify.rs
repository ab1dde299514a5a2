// src/absolutify.rs
//
// Rewrites local `href`/`src` values against a base domain, e.g. for feeds
// whose readers resolve nothing relative to the site.

use std::borrow::Cow;

use crate::streamer::{write_attribute, Policy, Streamer};
use crate::tokenizer::Attribute;

const URL_ATTRIBUTES: &[&str] = &["href", "src"];

/// Policy that only changes attribute formatting; structure is untouched.
#[derive(Clone, Debug)]
pub struct UrlAbsolutifier {
    base: String,
}

impl UrlAbsolutifier {
    /// `domain` gets `http://` unless it already has an http(s) scheme, and
    /// exactly one trailing slash.
    pub fn new(domain: &str) -> Self {
        let domain = domain.trim();
        let mut base = if has_http_scheme(domain) {
            domain.to_owned()
        } else {
            format!("http://{domain}")
        };
        let trimmed = base.trim_end_matches('/').len();
        base.truncate(trimmed);
        base.push('/');
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute form of a local URL. Root-relative (`/x`), dot-relative
    /// (`./x`, `../x`) and fragment (`#x`) values are rewritten; anything else,
    /// including protocol-relative `//host/x`, is returned unchanged.
    pub fn absolutize<'v>(&self, value: &'v str) -> Cow<'v, str> {
        if value.starts_with("//") {
            return Cow::Borrowed(value);
        }
        let rest = if let Some(rest) = value.strip_prefix("./") {
            rest
        } else if let Some(rest) = value.strip_prefix('/') {
            rest
        } else if value.starts_with('.') || value.starts_with('#') {
            value
        } else {
            return Cow::Borrowed(value);
        };
        Cow::Owned(format!("{}{rest}", self.base))
    }
}

fn has_http_scheme(domain: &str) -> bool {
    let lower = domain.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl Policy for UrlAbsolutifier {
    fn format_attributes(&self, attributes: &[Attribute<'_>], buf: &mut String) {
        for attribute in attributes {
            let is_url = URL_ATTRIBUTES
                .iter()
                .any(|name| attribute.name.eq_ignore_ascii_case(name));
            match attribute.value {
                Some(value) if is_url => {
                    let value = self.absolutize(value);
                    write_attribute(
                        &Attribute {
                            value: Some(value.as_ref()),
                            ..*attribute
                        },
                        buf,
                    );
                }
                _ => write_attribute(attribute, buf),
            }
        }
    }
}

/// Re-serialize `html` with local links made absolute against `base_domain`.
pub fn absolutify(html: &str, base_domain: &str) -> String {
    Streamer::with_policy(UrlAbsolutifier::new(base_domain)).process(html)
}
