//! linkgraph - cross-reference checking for markdown knowledge bases.
//!
//! One pass over a directory tree: discover documents, extract inline
//! `[text](target)` links, resolve each target against the discovered
//! documents, then report broken links and documents nothing links to.
//!
//! ```no_run
//! use linkgraph::{analyze, Config};
//! use std::path::Path;
//!
//! let graph = analyze(Path::new("notes"), &Config::default())?;
//! let report = graph.report();
//! println!("{} of {} links are broken", report.broken_links().len(), report.total_links());
//! # Ok::<(), linkgraph::Error>(())
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod loader;
pub mod render;
pub mod report;
pub mod resolve;

pub use analysis::analyze;
pub use config::Config;
pub use error::{Error, Result};
pub use report::{LinkGraph, Report, ReportStatus};
pub use resolve::Link;
