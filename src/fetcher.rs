use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use git2::build::RepoBuilder;
use git2::FetchOptions;
use thiserror::Error;
use tracing::{debug, info};

use crate::code_repository::CodeRepository;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("clone depth must be at least 1, got {0}")]
    InvalidDepth(u32),
    #[error("could not create working root {path}")]
    CreateRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot derive a checkout name from {0}")]
    EmptyName(String),
    #[error("checkout path {0} exists but is not a directory")]
    NotADirectory(PathBuf),
    #[error("failed to clone {url}")]
    Clone {
        url: String,
        #[source]
        source: git2::Error,
    },
    #[error("{path} is a checkout of {found}, not of {expected}")]
    OriginMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Name of the local checkout for a repository URL: the last path segment
/// with one trailing `.git` removed.
pub fn repository_name(url: &str) -> String {
    let segment = url
        .trim_end_matches('/')
        .rsplit(&['/', ':'][..])
        .next()
        .unwrap_or(url);
    segment.strip_suffix(".git").unwrap_or(segment).to_string()
}

pub fn checkout_path<P: AsRef<Path>>(root: P, url: &str) -> PathBuf {
    root.as_ref().join(repository_name(url))
}

/// Produces a local clone of a remote repository.
pub trait Cloner {
    fn clone_into(
        &self,
        url: &str,
        path: &Path,
        depth: u32,
        bare: bool,
    ) -> Result<(), FetchError>;
}

/// Whether `url` names a repository on this machine, either as a `file://`
/// URL or as a plain path.
pub fn is_local_source(url: &str) -> bool {
    url.starts_with("file://") || (!url.contains("://") && Path::new(url).exists())
}

pub struct Git2Cloner;

impl Cloner for Git2Cloner {
    fn clone_into(
        &self,
        url: &str,
        path: &Path,
        depth: u32,
        bare: bool,
    ) -> Result<(), FetchError> {
        let mut fetch_options = FetchOptions::new();
        // The local transport cannot fetch shallow.
        if is_local_source(url) {
            info!("{} is a local repository, ignoring depth {}", url, depth);
        } else {
            fetch_options.depth(depth.min(i32::MAX as u32) as i32);
        }

        RepoBuilder::new()
            .bare(bare)
            .fetch_options(fetch_options)
            .clone(url, path)
            .map(|_| ())
            .map_err(|source| FetchError::Clone {
                url: url.into(),
                source,
            })
    }
}

pub struct Fetcher<C: Cloner = Git2Cloner> {
    root: PathBuf,
    cloner: C,
    verify_origin: bool,
}

impl Fetcher<Git2Cloner> {
    pub fn new<P: Into<PathBuf>>(root: P) -> Fetcher<Git2Cloner> {
        Fetcher::with_cloner(root, Git2Cloner)
    }
}

impl<C: Cloner> Fetcher<C> {
    pub fn with_cloner<P: Into<PathBuf>>(root: P, cloner: C) -> Fetcher<C> {
        Fetcher {
            root: root.into(),
            cloner,
            verify_origin: true,
        }
    }

    pub fn verify_origin(mut self, verify: bool) -> Self {
        self.verify_origin = verify;
        self
    }

    /// Makes sure a checkout of `url` exists under the working root and
    /// returns its path. An existing non-empty directory is reused as is.
    pub fn fetch(&self, url: &str, depth: u32, bare: bool) -> Result<PathBuf, FetchError> {
        if depth == 0 {
            return Err(FetchError::InvalidDepth(depth));
        }
        if repository_name(url).is_empty() {
            return Err(FetchError::EmptyName(url.into()));
        }
        fs::create_dir_all(&self.root).map_err(|source| FetchError::CreateRoot {
            path: self.root.clone(),
            source,
        })?;

        let path = checkout_path(&self.root, url);
        if needs_clone(&path)? {
            info!(
                "Cloning repository from {} with depth {} into {}",
                url,
                depth,
                path.display()
            );
            self.cloner.clone_into(url, &path, depth, bare)?;
        } else {
            info!("{} already exists, using existing directory", path.display());
            if self.verify_origin {
                check_origin(&path, url)?;
            }
        }
        Ok(path)
    }
}

fn needs_clone(path: &Path) -> Result<bool, FetchError> {
    if !path.exists() {
        return Ok(true);
    }
    if !path.is_dir() {
        return Err(FetchError::NotADirectory(path.into()));
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

// Only checkouts that open and carry an origin can be told apart from the
// requested URL; anything else is left for the scan to reject.
fn check_origin(path: &Path, url: &str) -> Result<(), FetchError> {
    let found = match CodeRepository::open(path).ok().and_then(|repo| repo.origin_url()) {
        Some(found) => found,
        None => {
            debug!("no origin recorded for {}", path.display());
            return Ok(());
        }
    };
    if found == url {
        Ok(())
    } else {
        Err(FetchError::OriginMismatch {
            path: path.into(),
            expected: url.into(),
            found,
        })
    }
}
