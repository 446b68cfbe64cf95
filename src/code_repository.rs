use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository, Sort};
use thiserror::Error;

use crate::commit::Commit;

#[derive(Error, Debug)]
pub enum CodeRepositoryError {
    #[error("{path} is not a valid repository")]
    Open {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },
    #[error(transparent)]
    Git(#[from] git2::Error),
}

pub struct CodeRepository {
    repo: Repository,
}

impl CodeRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<CodeRepository, CodeRepositoryError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|source| CodeRepositoryError::Open {
            path: path.into(),
            source,
        })?;
        Ok(CodeRepository { repo })
    }

    pub fn path(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    pub fn origin_url(&self) -> Option<String> {
        let remote = self.repo.find_remote("origin").ok()?;
        remote.url().map(String::from)
    }

    /// History reachable from HEAD, newest first. An unborn HEAD has no history.
    pub fn commits(&self) -> Result<Vec<Commit>, CodeRepositoryError> {
        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        match walk.push_head() {
            Ok(_) => {}
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Ok(vec![])
            }
            Err(e) => return Err(e.into()),
        }

        walk.map(|oid| -> Result<Commit, CodeRepositoryError> {
            let commit = self.repo.find_commit(oid?)?;
            Ok(Commit::from_git(&commit))
        })
        .collect()
    }
}
