//! Report presentation.
//!
//! Truncation, entry-point exemption and colouring happen here and never feed
//! back into [`Report`].

use crate::config::{Config, ReportConfig};
use crate::error::{Error, Result};
use crate::report::{Report, ReportStatus, Suggestion};
use crate::resolve::Link;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::fmt::{self, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
    Yaml,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// What a caller shows for one report.
#[derive(Serialize, Debug)]
pub struct ReportView<'a> {
    pub status: ReportStatus,
    pub documents: usize,
    pub total_links: usize,
    pub working_links: usize,
    pub broken_links: &'a [Link],
    /// Orphans after the entry-point policy
    pub orphans: Vec<&'a str>,
    pub unreadable: &'a [String],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

impl<'a> ReportView<'a> {
    pub fn new(report: &'a Report, config: &'a Config, with_suggestions: bool) -> Self {
        let orphans: Vec<&str> = report
            .orphans_excluding(|p| config.is_entry_point(p))
            .collect();
        let suggestions = if with_suggestions {
            report.suggestions(orphans.len())
        } else {
            Vec::new()
        };

        Self {
            status: report.status(),
            documents: report.documents(),
            total_links: report.total_links(),
            working_links: report.working_links(),
            broken_links: report.broken_links(),
            orphans,
            unreadable: report.unreadable(),
            suggestions,
        }
    }
}

/// Render for a file: every broken link and orphan, no colour codes.
pub fn render_full(view: &ReportView<'_>, format: Format, limits: &ReportConfig) -> Result<String> {
    let limits = ReportConfig {
        broken_limit: usize::MAX,
        orphan_limit: usize::MAX,
        ..limits.clone()
    };
    render(view, format, &limits, false)
}

pub fn render(view: &ReportView<'_>, format: Format, limits: &ReportConfig, color: bool) -> Result<String> {
    match format {
        Format::Text => render_text(view, limits, color),
        Format::Json => Ok(serde_json::to_string_pretty(view)? + "\n"),
        Format::Yaml => Ok(serde_yaml::to_string(view)?),
    }
}

/// Styling that can be switched off for files and tests.
#[derive(Clone, Copy)]
struct Painter {
    color: bool,
}

impl Painter {
    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        self.paint(text, |s| s.green().bold())
    }

    fn value(&self, text: &str) -> String {
        self.paint(text, |s| s.cyan())
    }

    fn warn(&self, text: &str) -> String {
        self.paint(text, |s| s.yellow().bold())
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, |s| s.dimmed())
    }
}

pub fn render_text(view: &ReportView<'_>, limits: &ReportConfig, color: bool) -> Result<String> {
    let p = Painter { color };
    let mut out = String::new();

    writeln!(out, "{}", p.heading("Link Report"))?;
    writeln!(out, "  Documents:      {}", p.value(&view.documents.to_string()))?;
    writeln!(out, "  Total links:    {}", p.value(&view.total_links.to_string()))?;
    writeln!(out, "  Working links:  {}", p.value(&view.working_links.to_string()))?;
    writeln!(out, "  Broken links:   {}", p.value(&view.broken_links.len().to_string()))?;
    writeln!(out)?;

    let status = match view.status {
        ReportStatus::NoLinks => p.dim("No internal links found."),
        ReportStatus::AllWorking => p.heading("All links resolve."),
        ReportStatus::SomeBroken => p.warn(&format!(
            "{} broken link{} found.",
            view.broken_links.len(),
            if view.broken_links.len() == 1 { "" } else { "s" }
        )),
    };
    writeln!(out, "{}", status)?;

    if !view.broken_links.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", p.warn("Broken links"))?;
        for link in view.broken_links.iter().take(limits.broken_limit) {
            writeln!(out, "  From: {}:{}", link.source(), link.line())?;
            writeln!(out, "  To:   {}", p.value(link.target_raw()))?;
            writeln!(out, "  Text: {}", truncate(link.text(), limits.text_width))?;
            writeln!(out)?;
        }
        more(&mut out, p, view.broken_links.len(), limits.broken_limit)?;
    }

    if !view.orphans.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", p.heading("Documents without incoming links"))?;
        for orphan in view.orphans.iter().take(limits.orphan_limit) {
            writeln!(out, "  - {}", orphan)?;
        }
        more(&mut out, p, view.orphans.len(), limits.orphan_limit)?;
    }

    if !view.unreadable.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", p.warn("Unreadable documents (skipped)"))?;
        for path in view.unreadable {
            writeln!(out, "  - {}", path)?;
        }
    }

    if !view.suggestions.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", p.heading("Suggestions"))?;
        for (i, suggestion) in view.suggestions.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, suggestion)?;
        }
    }

    Ok(out)
}

/// One line per link: `source:line -> target [status]`.
pub fn render_links<'a>(links: impl IntoIterator<Item = &'a Link>, color: bool) -> Result<String> {
    let p = Painter { color };
    let mut out = String::new();
    for link in links {
        let status = if link.exists() {
            p.heading("ok")
        } else {
            p.warn("broken")
        };
        writeln!(
            out,
            "{}:{} -> {} [{}]",
            link.source(),
            link.line(),
            p.value(link.target()),
            status
        )?;
    }
    Ok(out)
}

fn more(out: &mut String, p: Painter, total: usize, shown: usize) -> fmt::Result {
    if total > shown {
        writeln!(out, "  {}", p.dim(&format!("... and {} more", total - shown)))?;
    }
    Ok(())
}

/// Cut `text` to `width` characters, marking the cut with `...`.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width).collect();
        format!("{}...", cut)
    }
}
