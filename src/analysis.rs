//! One analysis pass: load, extract, resolve, aggregate.

use crate::config::Config;
use crate::error::Result;
use crate::extract::extract_links;
use crate::loader::discover;
use crate::report::LinkGraph;
use crate::resolve::Link;
use std::path::Path;

/// Build the link graph for every document under `root`.
///
/// Each document is read, scanned and dropped before the next one, so only
/// the links outlive the pass. A document that cannot be read is logged and
/// recorded as unreadable; only a missing or non-directory root fails the run.
pub fn analyze(root: &Path, config: &Config) -> Result<LinkGraph> {
    let documents = discover(root, config)?;
    let mut graph = LinkGraph::new(documents.paths().map(str::to_string).collect());

    for document in documents.iter() {
        let content = match document.read() {
            Ok(content) => content,
            Err(e) => {
                log::warn!("cannot read {}: {}", document.location().display(), e);
                graph.mark_unreadable(document.path());
                continue;
            }
        };

        let before = graph.links().len();
        for raw in extract_links(&content) {
            graph.add_link(Link::resolve(document.path(), &raw, |p| documents.contains(p)));
        }
        log::debug!("{}: {} links", document.path(), graph.links().len() - before);
    }

    log::info!(
        "{} links across {} documents",
        graph.links().len(),
        graph.documents().len()
    );
    Ok(graph)
}
