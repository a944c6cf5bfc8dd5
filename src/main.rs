use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use linkgraph::config::DEFAULT_CONFIG_FILE;
use linkgraph::render::{self, Format, ReportView};
use linkgraph::{analyze, Config, ReportStatus, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// linkgraph - Find broken links and orphan documents in a markdown tree
#[derive(Parser)]
#[command(name = "linkgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path [default: .linkgraph.toml, if present]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the link graph and print a report
    Check {
        #[command(flatten)]
        scan: ScanArgs,

        /// Documents exempt from orphan reporting (can be repeated)
        #[arg(long = "entry")]
        entry_points: Vec<String>,

        /// Output format: text, json or yaml
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum broken links to list
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Exit with status 2 when any link is broken
        #[arg(long)]
        fail_on_broken: bool,

        /// Leave out the suggestions section
        #[arg(long)]
        no_suggestions: bool,
    },

    /// List every internal link and whether it resolves
    Links {
        #[command(flatten)]
        scan: ScanArgs,

        /// Show only broken links
        #[arg(long)]
        broken: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Options shared by every command that walks a tree.
#[derive(Args)]
struct ScanArgs {
    /// Root directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Document extensions (comma-separated)
    #[arg(short, long)]
    types: Option<String>,

    /// Glob patterns to exclude (can be repeated)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Extra directory names to skip (can be repeated)
    #[arg(long)]
    ignore_dir: Vec<String>,

    /// Honour .gitignore files
    #[arg(long)]
    gitignore: bool,
}

impl ScanArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(types) = &self.types {
            config.set_extensions(types);
        }
        config.exclude.extend(self.exclude.iter().cloned());
        config.ignored_dirs.extend(self.ignore_dir.iter().cloned());
        config.respect_gitignore |= self.gitignore;
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Check {
            scan,
            entry_points,
            format,
            output,
            limit,
            fail_on_broken,
            no_suggestions,
        } => {
            let mut config = config;
            scan.apply(&mut config);
            config.entry_points.extend(entry_points);
            if let Some(limit) = limit {
                config.report.broken_limit = limit;
            }
            cmd_check(
                &scan.path,
                &config,
                &format,
                output.as_deref(),
                !no_suggestions,
                cli.quiet,
            )
            .map(|status| status.exit_code(fail_on_broken))
        }
        Commands::Links { scan, broken, json } => {
            let mut config = config;
            scan.apply(&mut config);
            cmd_links(&scan.path, &config, broken, json).map(|_| 0)
        }
    });

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path, true),
        None => Config::load(Path::new(DEFAULT_CONFIG_FILE), false),
    }
}

fn cmd_check(
    path: &Path,
    config: &Config,
    format: &str,
    output: Option<&Path>,
    suggestions: bool,
    quiet: bool,
) -> Result<ReportStatus> {
    let start = Instant::now();
    let format: Format = format.parse()?;

    if !quiet && format == Format::Text {
        println!("{} {}", "Analyzing".cyan().bold(), path.display());
        println!();
    }

    let graph = analyze(path, config)?;
    let report = graph.report();
    let view = ReportView::new(&report, config, suggestions);

    print!("{}", render::render(&view, format, &config.report, true)?);

    if let Some(output) = output {
        fs::write(output, render::render_full(&view, format, &config.report)?)?;
        if !quiet && format == Format::Text {
            println!();
            println!("{} {}", "Report written to".green(), output.display().to_string().cyan());
        }
    }

    if !quiet && format == Format::Text {
        println!("{}", format!("Done in {:.2?}", start.elapsed()).dimmed());
    }

    Ok(view.status)
}

fn cmd_links(path: &Path, config: &Config, broken_only: bool, json: bool) -> Result<()> {
    let graph = analyze(path, config)?;
    let links: Vec<_> = graph
        .links()
        .iter()
        .filter(|l| !broken_only || !l.exists())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }

    if links.is_empty() {
        let message = if broken_only {
            "No broken links."
        } else {
            "No internal links found."
        };
        println!("{}", message.yellow());
        return Ok(());
    }

    print!("{}", render::render_links(links, true)?);
    Ok(())
}
