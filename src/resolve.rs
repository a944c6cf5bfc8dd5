//! Lexical link resolution.
//!
//! A target is joined onto the source document's directory and `.`/`..`
//! segments are folded without touching the filesystem. Existence is then
//! looked up in the document set captured by the loader.

use crate::extract::RawLink;
use serde::Serialize;

/// A directed reference from one document to a target path.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Link {
    source: String,
    target_raw: String,
    text: String,
    line: usize,
    resolved_path: Option<String>,
    exists: bool,
}

impl Link {
    /// Resolve `raw`, found in the document at `source`, using `known` to test
    /// whether a root-relative path is a loaded document.
    pub fn resolve(source: &str, raw: &RawLink<'_>, known: impl Fn(&str) -> bool) -> Self {
        let source_dir = source.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        let resolved_path = normalize(source_dir, raw.target).filter(|p| known(p.as_str()));

        Link {
            source: source.to_string(),
            target_raw: raw.target.to_string(),
            text: raw.text.to_string(),
            line: raw.line,
            exists: resolved_path.is_some(),
            resolved_path,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The target exactly as written in the markup
    pub fn target_raw(&self) -> &str {
        &self.target_raw
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Root-relative path of the target; `None` unless the target exists
    pub fn resolved_path(&self) -> Option<&str> {
        self.resolved_path.as_deref()
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Best identifier for the target: the resolved path, else the raw string
    pub fn target(&self) -> &str {
        self.resolved_path.as_deref().unwrap_or(&self.target_raw)
    }
}

/// Join `target` onto `source_dir` and fold `.`/`..` segments.
///
/// Returns `None` when the path part of the target is empty or climbs above
/// the root. A leading `/` anchors the target at the root. Any `#fragment` or
/// `?query` suffix is ignored.
pub fn normalize(source_dir: &str, target: &str) -> Option<String> {
    let path = target
        .split(|c| c == '#' || c == '?')
        .next()
        .unwrap_or("")
        .trim();
    if path.is_empty() {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    if !path.starts_with('/') {
        segments.extend(source_dir.split('/').filter(|s| !s.is_empty()));
    }

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            name => segments.push(name),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
