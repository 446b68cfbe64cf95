//! Clones a repository and searches its history for commit messages that
//! match a pattern, printing each match with a command to check out the
//! state right before it.

use std::io::Write;

use thiserror::Error;
use tracing::info;

pub mod code_repository;
pub mod commit;
pub mod config;
pub mod fetcher;
pub mod report;
pub mod scanner;

pub use code_repository::{CodeRepository, CodeRepositoryError};
pub use commit::Commit;
pub use config::Config;
pub use fetcher::{repository_name, Cloner, FetchError, Fetcher, Git2Cloner};
pub use report::Report;
pub use scanner::{ScanError, Scanner};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Repository(#[from] CodeRepositoryError),
}

/// Fetches `config.repo_url` and writes a report for every matching commit
/// to `out`. Returns the number of matches.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<usize, Error> {
    let fetcher = Fetcher::new(&config.working_root).verify_origin(config.verify_origin);
    run_with(config, &fetcher, out)
}

pub fn run_with<C: Cloner, W: Write>(
    config: &Config,
    fetcher: &Fetcher<C>,
    out: &mut W,
) -> Result<usize, Error> {
    // A bad pattern must fail before anything touches the network.
    let scanner = Scanner::new(&config.pattern)?;
    let path = fetcher.fetch(&config.repo_url, config.depth, config.bare)?;
    let repo = CodeRepository::open(&path)?;
    let found = scanner.scan(&repo, &config.repo_url, out)?;
    info!("{} matching commits in {}", found, path.display());
    Ok(found)
}
