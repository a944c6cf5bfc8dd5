//! Document discovery.
//!
//! Walks the analysis root and records every document path up front. Document
//! text is read later, one file at a time, so the set of known paths is fixed
//! before any link is resolved against it.

use crate::config::Config;
use crate::error::{Error, Result};
use ahash::AHashSet;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// A text document under the root, identified by its root-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: String,
    location: PathBuf,
}

impl Document {
    /// Root-relative path with `/` separators
    pub fn path(&self) -> &str {
        &self.path
    }

    /// On-disk location
    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.location)
    }
}

/// Every document found by one traversal.
#[derive(Debug, Default)]
pub struct DocumentSet {
    documents: Vec<Document>,
    index: AHashSet<String>,
}

impl DocumentSet {
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.path())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn push(&mut self, document: Document) {
        if self.index.insert(document.path.clone()) {
            self.documents.push(document);
        }
    }
}

/// Fail unless `root` is an existing directory.
pub fn check_root(root: &Path) -> Result<()> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::root_not_directory(root)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::root_not_found(root)),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Collect the documents under `root` allowed by `config`.
pub fn discover(root: &Path, config: &Config) -> Result<DocumentSet> {
    check_root(root)?;

    let extensions: AHashSet<String> = config.extensions.iter().cloned().collect();
    let excluded = build_globset(&config.exclude)?;
    let ignored: AHashSet<String> = config.ignored_dirs.iter().cloned().collect();

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));
    if config.respect_gitignore {
        builder
            .git_ignore(true)
            .git_exclude(true)
            .git_global(true)
            .require_git(false);
    }
    builder.filter_entry(move |entry| {
        entry.depth() == 0
            || !entry
                .file_name()
                .to_str()
                .map(|name| ignored.contains(name))
                .unwrap_or(false)
    });

    let mut set = DocumentSet::default();

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };

        // `is_file` follows symlinks, so linked documents count; linked
        // directories are still not descended into.
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !extensions.contains(&ext) {
            continue;
        }

        let Some(rel_path) = relative_path(root, path) else {
            log::debug!("{} is outside the root, skipping", path.display());
            continue;
        };

        if excluded.is_match(&rel_path) {
            log::debug!("excluded {}", rel_path);
            continue;
        }

        set.push(Document {
            path: rel_path,
            location: path.to_path_buf(),
        });
    }

    log::info!("found {} documents under {}", set.len(), root.display());
    Ok(set)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Root-relative form of `path` using `/` separators.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn paths(set: &DocumentSet) -> Vec<&str> {
        set.paths().collect()
    }

    #[test]
    fn test_discovers_by_extension() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "# A");
        write(dir.path(), "notes/b.MD", "# B");
        write(dir.path(), "notes/c.txt", "plain");
        write(dir.path(), "image.png", "");

        let set = discover(dir.path(), &Config::default()).unwrap();
        assert_eq!(paths(&set), vec!["a.md", "notes/b.MD"]);
        assert!(set.contains("notes/b.MD"));
        assert!(!set.contains("notes/c.txt"));
    }

    #[test]
    fn test_prunes_ignored_dirs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "");
        write(dir.path(), ".git/info.md", "");
        write(dir.path(), "src/__pycache__/cached.md", "");
        write(dir.path(), ".vscode/settings.md", "");
        write(dir.path(), ".hidden/kept.md", "");

        let set = discover(dir.path(), &Config::default()).unwrap();
        assert_eq!(paths(&set), vec![".hidden/kept.md", "a.md"]);
    }

    #[test]
    fn test_exclude_globs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "");
        write(dir.path(), "drafts/wip.md", "");

        let mut config = Config::default();
        config.exclude = vec!["drafts/**".to_string()];
        let set = discover(dir.path(), &config).unwrap();
        assert_eq!(paths(&set), vec!["a.md"]);

        config.exclude = vec!["[".to_string()];
        assert!(matches!(discover(dir.path(), &config), Err(Error::Glob(_))));
    }

    #[test]
    fn test_gitignore_only_when_enabled() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".gitignore", "build/\n");
        write(dir.path(), "a.md", "");
        write(dir.path(), "build/out.md", "");

        let set = discover(dir.path(), &Config::default()).unwrap();
        assert_eq!(set.len(), 2);

        let mut config = Config::default();
        config.respect_gitignore = true;
        let set = discover(dir.path(), &config).unwrap();
        assert_eq!(paths(&set), vec!["a.md"]);
    }

    #[test]
    fn test_root_checks() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "");

        assert!(matches!(
            check_root(&dir.path().join("missing")),
            Err(Error::RootNotFound { .. })
        ));
        assert!(matches!(
            check_root(&dir.path().join("a.md")),
            Err(Error::RootNotDirectory { .. })
        ));
        assert!(check_root(dir.path()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_documents_are_loaded() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        write(outside.path(), "shared.md", "# Shared");
        write(outside.path(), "linked/inner.md", "# Inner");

        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", "[s](shared.md)");
        symlink(outside.path().join("shared.md"), dir.path().join("shared.md")).unwrap();
        symlink(outside.path().join("linked"), dir.path().join("linked")).unwrap();

        let set = discover(dir.path(), &Config::default()).unwrap();
        assert_eq!(paths(&set), vec!["a.md", "shared.md"]);
        assert_eq!(set.iter().nth(1).unwrap().read().unwrap(), "# Shared");
    }
}
