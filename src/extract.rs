//! Inline link extraction: `[text](target)`.
//!
//! A lexical scan, not a markdown parser. Nested brackets, escaped
//! parentheses and reference-style links do not match.

use regex::{CaptureMatches, Regex};
use std::sync::LazyLock;

static INLINE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Target prefixes that never become links.
pub const EXTERNAL_PREFIXES: &[&str] = &["http://", "https://", "#", "mailto:"];

/// One `[text](target)` occurrence, borrowed from the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLink<'a> {
    pub text: &'a str,
    pub target: &'a str,
    /// 1-based line of the opening bracket
    pub line: usize,
}

pub fn is_external(target: &str) -> bool {
    EXTERNAL_PREFIXES.iter().any(|p| target.starts_with(p))
}

/// Lazily yield the internal links of `content`.
pub fn extract_links(content: &str) -> Links<'_> {
    Links {
        content,
        captures: INLINE_LINK.captures_iter(content),
        line: 1,
        offset: 0,
    }
}

pub struct Links<'a> {
    content: &'a str,
    captures: CaptureMatches<'static, 'a>,
    line: usize,
    offset: usize,
}

impl<'a> Iterator for Links<'a> {
    type Item = RawLink<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for caps in self.captures.by_ref() {
            let (Some(whole), Some(text), Some(target)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };

            // Matches arrive in order, so the line count only moves forward.
            let start = whole.start();
            self.line += self.content[self.offset..start].matches('\n').count();
            self.offset = start;

            if is_external(target.as_str()) {
                continue;
            }

            return Some(RawLink {
                text: text.as_str(),
                target: target.as_str(),
                line: self.line,
            });
        }
        None
    }
}
