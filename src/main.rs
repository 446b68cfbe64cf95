use std::io;
use std::path::PathBuf;

use anyhow::Result;
use bug_finder::config::{DEFAULT_DEPTH, DEFAULT_WORKING_ROOT};
use bug_finder::scanner::DEFAULT_PATTERN;
use bug_finder::Config;
use clap::Parser;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "bug-finder")]
#[command(about = "Search Git commits for specific patterns to try and find bugs.")]
#[command(version)]
struct Args {
    /// URL of the Git repository to clone
    repo_url: String,

    /// Depth of the repository history to clone
    #[arg(
        long,
        default_value_t = DEFAULT_DEPTH,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    depth: u32,

    /// Regex pattern to search in commit messages
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Clone without a working tree
    #[arg(long)]
    bare: bool,

    /// Directory holding the cloned repositories
    #[arg(long, env = "BUG_FINDER_ROOT", default_value = DEFAULT_WORKING_ROOT)]
    root: PathBuf,

    /// Reuse a cached checkout even if it was cloned from another URL
    #[arg(long)]
    no_verify_origin: bool,

    /// Log debug output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let config = Config::new(args.repo_url)
        .depth(args.depth)
        .pattern(args.pattern)
        .bare(args.bare)
        .working_root(args.root)
        .verify_origin(!args.no_verify_origin);

    let stdout = io::stdout();
    bug_finder::run(&config, &mut stdout.lock())?;
    Ok(())
}
