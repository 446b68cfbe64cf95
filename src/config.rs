use std::path::PathBuf;

use crate::scanner::DEFAULT_PATTERN;

pub const DEFAULT_DEPTH: u32 = 100;
pub const DEFAULT_WORKING_ROOT: &str = "cloned_repos";

/// Everything a single run needs: what to fetch, where to keep it and
/// what to look for.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub repo_url: String,
    pub depth: u32,
    pub pattern: String,
    pub bare: bool,
    pub working_root: PathBuf,
    pub verify_origin: bool,
}

impl Config {
    pub fn new<S: Into<String>>(repo_url: S) -> Config {
        Config {
            repo_url: repo_url.into(),
            depth: DEFAULT_DEPTH,
            pattern: DEFAULT_PATTERN.into(),
            bare: false,
            working_root: PathBuf::from(DEFAULT_WORKING_ROOT),
            verify_origin: true,
        }
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn bare(mut self, bare: bool) -> Self {
        self.bare = bare;
        self
    }

    pub fn working_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.working_root = root.into();
        self
    }

    pub fn verify_origin(mut self, verify: bool) -> Self {
        self.verify_origin = verify;
        self
    }
}
