//! Link graph aggregation.
//!
//! [`LinkGraph`] holds everything one pass produced; [`Report`] is the derived
//! summary: totals, broken links and orphan documents.

use crate::resolve::Link;
use ahash::AHashSet;
use serde::Serialize;
use std::fmt;

/// All documents and links from a single traversal.
#[derive(Debug, Default, Clone)]
pub struct LinkGraph {
    documents: Vec<String>,
    links: Vec<Link>,
    unreadable: Vec<String>,
}

impl LinkGraph {
    pub fn new(documents: Vec<String>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Record a document whose text could not be read. It stays in the
    /// document set; it just contributes no links.
    pub fn mark_unreadable(&mut self, path: impl Into<String>) {
        self.unreadable.push(path.into());
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn unreadable(&self) -> &[String] {
        &self.unreadable
    }

    pub fn report(&self) -> Report {
        Report::build(&self.documents, &self.links, &self.unreadable)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Report {
    documents: usize,
    total_links: usize,
    working_links: usize,
    broken_links: Vec<Link>,
    pub(crate) orphans: Vec<String>,
    unreadable: Vec<String>,
}

/// The three outcomes a caller must be able to tell apart.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    NoLinks,
    AllWorking,
    SomeBroken,
}

impl ReportStatus {
    /// Process exit status for a finished run: 2 when broken links should
    /// fail it, otherwise 0.
    pub fn exit_code(self, fail_on_broken: bool) -> i32 {
        match self {
            ReportStatus::SomeBroken if fail_on_broken => 2,
            _ => 0,
        }
    }
}

impl Report {
    pub fn build(documents: &[String], links: &[Link], unreadable: &[String]) -> Self {
        let mut broken_links: Vec<Link> = links.iter().filter(|l| !l.exists()).cloned().collect();
        broken_links.sort_by(|a, b| {
            (a.source(), a.line(), a.target_raw()).cmp(&(b.source(), b.line(), b.target_raw()))
        });

        let targeted: AHashSet<&str> = links.iter().filter_map(|l| l.resolved_path()).collect();
        let mut orphans: Vec<String> = documents
            .iter()
            .filter(|d| !targeted.contains(d.as_str()))
            .cloned()
            .collect();
        orphans.sort();
        orphans.dedup();

        let mut unreadable = unreadable.to_vec();
        unreadable.sort();

        Report {
            documents: documents.len(),
            total_links: links.len(),
            working_links: links.len() - broken_links.len(),
            broken_links,
            orphans,
            unreadable,
        }
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn total_links(&self) -> usize {
        self.total_links
    }

    pub fn working_links(&self) -> usize {
        self.working_links
    }

    /// Sorted by source, then line
    pub fn broken_links(&self) -> &[Link] {
        &self.broken_links
    }

    /// Documents no existing link points at, sorted
    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    pub fn unreadable(&self) -> &[String] {
        &self.unreadable
    }

    pub fn status(&self) -> ReportStatus {
        if self.total_links == 0 {
            ReportStatus::NoLinks
        } else if self.broken_links.is_empty() {
            ReportStatus::AllWorking
        } else {
            ReportStatus::SomeBroken
        }
    }

    /// Orphans minus the documents `exempt` accepts, e.g. a manifest that is
    /// the intended entry point.
    pub fn orphans_excluding<'a>(
        &'a self,
        exempt: impl Fn(&str) -> bool + 'a,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.orphans
            .iter()
            .map(String::as_str)
            .filter(move |o: &&str| !exempt(*o))
    }

    pub fn suggestions(&self, orphan_count: usize) -> Vec<Suggestion> {
        let mut out = Vec::new();
        if self.documents > 1 && self.total_links < SPARSE_LINK_THRESHOLD {
            out.push(Suggestion::AddCrossReferences);
        }
        if !self.broken_links.is_empty() {
            out.push(Suggestion::FixBrokenLinks(self.broken_links.len()));
        }
        if orphan_count > 0 {
            out.push(Suggestion::LinkOrphans(orphan_count));
        }
        out
    }
}

/// Below this many links a knowledge base is considered sparsely connected.
pub const SPARSE_LINK_THRESHOLD: usize = 10;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    AddCrossReferences,
    FixBrokenLinks(usize),
    LinkOrphans(usize),
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::AddCrossReferences => write!(f, "Add more cross references between documents"),
            Suggestion::FixBrokenLinks(n) => write!(f, "Fix {} broken link{}", n, plural(*n)),
            Suggestion::LinkOrphans(n) => {
                write!(f, "Link {} orphan document{} from an index or related note", n, plural(*n))
            }
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::RawLink;

    fn link(source: &str, target: &str, known: &[&str]) -> Link {
        let raw = RawLink { text: "t", target, line: 1 };
        Link::resolve(source, &raw, |p| known.contains(&p))
    }

    fn docs(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_counts_are_consistent() {
        let known = ["a.md", "b.md"];
        let links = vec![
            link("a.md", "b.md", &known),
            link("a.md", "missing.md", &known),
            link("b.md", "../out.md", &known),
        ];
        let report = Report::build(&docs(&known), &links, &[]);

        assert_eq!(report.total_links(), 3);
        assert_eq!(report.broken_links().len(), 2);
        assert_eq!(report.working_links() + report.broken_links().len(), report.total_links());
        assert_eq!(report.status(), ReportStatus::SomeBroken);
    }

    #[test]
    fn test_orphans_are_untargeted_documents() {
        let known = ["a.md", "b.md", "c.md"];
        let links = vec![link("a.md", "b.md", &known), link("b.md", "nope.md", &known)];
        let report = Report::build(&docs(&known), &links, &[]);
        assert_eq!(report.orphans(), vec!["a.md", "c.md"]);
    }

    #[test]
    fn test_broken_link_does_not_rescue_orphan() {
        // `c.md` is named by a link but is not a loaded document.
        let links = vec![link("a.md", "c.md", &["a.md"])];
        let report = Report::build(&docs(&["a.md"]), &links, &[]);
        assert_eq!(report.orphans(), vec!["a.md"]);
        assert_eq!(report.broken_links()[0].target(), "c.md");
    }

    #[test]
    fn test_self_link_removes_orphan_status() {
        let links = vec![link("a.md", "a.md", &["a.md"])];
        let report = Report::build(&docs(&["a.md"]), &links, &[]);
        assert_eq!(report.total_links(), 1);
        assert!(report.broken_links().is_empty());
        assert!(report.orphans().is_empty());
        assert_eq!(report.status(), ReportStatus::AllWorking);
    }

    #[test]
    fn test_empty_graph() {
        let report = LinkGraph::default().report();
        assert_eq!(report.total_links(), 0);
        assert!(report.broken_links().is_empty());
        assert!(report.orphans().is_empty());
        assert_eq!(report.status(), ReportStatus::NoLinks);
        assert!(report.suggestions(0).is_empty());
    }

    #[test]
    fn test_broken_links_sorted_by_source_and_line() {
        let known = ["a.md", "b.md"];
        let mut graph = LinkGraph::new(docs(&known));
        graph.add_link(link("b.md", "x.md", &known));
        graph.add_link(link("a.md", "z.md", &known));
        graph.add_link(link("a.md", "y.md", &known));

        let report = graph.report();
        let order: Vec<(&str, &str)> = report
            .broken_links()
            .iter()
            .map(|l| (l.source(), l.target_raw()))
            .collect();
        assert_eq!(order, vec![("a.md", "y.md"), ("a.md", "z.md"), ("b.md", "x.md")]);
    }

    #[test]
    fn test_orphans_excluding_does_not_touch_report() {
        let report = Report::build(&docs(&["manifest.md", "note.md"]), &[], &[]);
        let shown: Vec<&str> = report.orphans_excluding(|p| p == "manifest.md").collect();
        assert_eq!(shown, vec!["note.md"]);
        assert_eq!(report.orphans().len(), 2);
    }

    #[test]
    fn test_unreadable_documents_are_reported() {
        let mut graph = LinkGraph::new(docs(&["a.md", "bad.md"]));
        graph.mark_unreadable("bad.md");
        let report = graph.report();
        assert_eq!(report.documents(), 2);
        assert_eq!(report.unreadable(), vec!["bad.md"]);
    }

    #[test]
    fn test_suggestions() {
        let known = ["a.md", "b.md"];
        let links = vec![link("a.md", "gone.md", &known)];
        let report = Report::build(&docs(&known), &links, &[]);

        let suggestions = report.suggestions(2);
        assert_eq!(
            suggestions,
            vec![
                Suggestion::AddCrossReferences,
                Suggestion::FixBrokenLinks(1),
                Suggestion::LinkOrphans(2),
            ]
        );
        assert_eq!(suggestions[1].to_string(), "Fix 1 broken link");
        assert_eq!(
            suggestions[2].to_string(),
            "Link 2 orphan documents from an index or related note"
        );
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(ReportStatus::SomeBroken.exit_code(true), 2);
        assert_eq!(ReportStatus::SomeBroken.exit_code(false), 0);
        assert_eq!(ReportStatus::AllWorking.exit_code(true), 0);
        assert_eq!(ReportStatus::NoLinks.exit_code(true), 0);
    }
}
