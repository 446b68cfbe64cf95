use std::io::{self, Write};

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::code_repository::{CodeRepository, CodeRepositoryError};
use crate::commit::Commit;
use crate::report::Report;

pub const DEFAULT_PATTERN: &str = "#[0-9]+";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid pattern")]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    Repository(#[from] CodeRepositoryError),
    #[error("failed to write report")]
    Output(#[source] io::Error),
}

/// Searches commit messages for a pattern compiled once up front.
#[derive(Debug, Clone)]
pub struct Scanner {
    pattern: Regex,
}

impl Scanner {
    pub fn new(pattern: &str) -> Result<Scanner, ScanError> {
        Ok(Scanner {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_match(&self, message: &str) -> bool {
        self.pattern.is_match(message)
    }

    /// Matching commits paired with their successor in `commits`, which is
    /// expected newest first.
    pub fn matches<'a>(
        &'a self,
        repo_url: &'a str,
        commits: &'a [Commit],
    ) -> impl Iterator<Item = Report<'a>> + 'a {
        commits
            .iter()
            .enumerate()
            .filter(move |(_, commit)| self.is_match(&commit.message))
            .map(move |(i, commit)| Report {
                repo_url,
                commit,
                previous: commits.get(i + 1),
            })
    }

    /// Writes a report for every matching commit as soon as it is found and
    /// returns how many were written.
    pub fn scan<W: Write>(
        &self,
        repo: &CodeRepository,
        repo_url: &str,
        out: &mut W,
    ) -> Result<usize, ScanError> {
        info!("Searching for commits that match the pattern {}", self.pattern());
        let commits = repo.commits()?;
        debug!("{} commits in {}", commits.len(), repo.path().display());

        let mut found = 0;
        for report in self.matches(repo_url, &commits) {
            write!(out, "{}", report).map_err(ScanError::Output)?;
            out.flush().map_err(ScanError::Output)?;
            found += 1;
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_repository::tests::repository_with_history;
    use crate::report::SEPARATOR;
    use chrono::{FixedOffset, TimeZone};
    use tempdir::TempDir;

    const URL: &str = "https://example.com/a/tool.git";

    fn commits(messages: &[&str]) -> Vec<Commit> {
        messages
            .iter()
            .enumerate()
            .map(|(i, message)| Commit {
                hash: format!("{:040x}", i),
                message: message.to_string(),
                summary: message.lines().next().unwrap_or("").into(),
                authored: FixedOffset::east_opt(0).unwrap().timestamp_opt(0, 0).unwrap(),
            })
            .collect()
    }

    #[test]
    fn pattern_is_searched_anywhere_in_message() {
        let scanner = Scanner::new(DEFAULT_PATTERN).unwrap();
        assert!(scanner.is_match("fixes #42 and #43"));
        assert!(scanner.is_match("Refactor parser\n\nSee #7 for context"));
        assert!(!scanner.is_match("no reference here"));
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        assert!(matches!(Scanner::new("(unclosed"), Err(ScanError::Pattern(_))));
    }

    #[test]
    fn every_match_except_the_last_gets_a_successor() {
        let scanner = Scanner::new("match").unwrap();
        let history = commits(&["match a", "skip", "match b", "match c", "skip", "match d"]);

        let reports: Vec<Report> = scanner.matches("https://example.com/r.git", &history).collect();

        let matched: Vec<&Commit> = reports.iter().map(|r| r.commit).collect();
        assert_eq!(matched, vec![&history[0], &history[2], &history[3], &history[5]]);
        assert_eq!(reports[0].previous, Some(&history[1]));
        assert_eq!(reports[1].previous, Some(&history[3]));
        assert_eq!(reports[2].previous, Some(&history[4]));
        assert_eq!(reports[3].previous, None);
    }

    #[test]
    fn scan_reports_issue_fix_with_checkout_of_previous_commit() -> anyhow::Result<()> {
        let dir = TempDir::new("scanner")?;
        let hashes = repository_with_history(dir.path(), &["initial", "refactor", "fix #10"])?;
        let repo = CodeRepository::open(dir.path())?;
        let mut out = Vec::new();

        let found = Scanner::new(DEFAULT_PATTERN)?.scan(&repo, URL, &mut out)?;

        let output = String::from_utf8(out)?;
        assert_eq!(found, 1);
        assert!(output.starts_with(&format!("Commit {}: fix #10\n", hashes[2])));
        assert!(output.contains(&format!("cd tool && git checkout {}\n", hashes[1])));
        assert_eq!(output.matches(SEPARATOR).count(), 1);
        Ok(())
    }

    #[test]
    fn scan_without_matches_prints_nothing() -> anyhow::Result<()> {
        let dir = TempDir::new("scanner")?;
        repository_with_history(dir.path(), &["initial", "refactor", "fix #10"])?;
        let repo = CodeRepository::open(dir.path())?;
        let mut out = Vec::new();

        let found = Scanner::new("nomatch")?.scan(&repo, URL, &mut out)?;

        assert_eq!(found, 0);
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn scan_of_matching_oldest_commit_has_no_checkout_hint() -> anyhow::Result<()> {
        let dir = TempDir::new("scanner")?;
        let hashes = repository_with_history(dir.path(), &["initial #1", "refactor", "tidy"])?;
        let repo = CodeRepository::open(dir.path())?;
        let mut out = Vec::new();

        let found = Scanner::new(DEFAULT_PATTERN)?.scan(&repo, URL, &mut out)?;

        let output = String::from_utf8(out)?;
        assert_eq!(found, 1);
        assert!(output.contains(&hashes[0]));
        assert!(!output.contains("To checkout this commit run:"));
        Ok(())
    }

    #[test]
    fn scan_of_empty_repository_finds_nothing() -> anyhow::Result<()> {
        let dir = TempDir::new("scanner")?;
        git2::Repository::init(dir.path())?;
        let repo = CodeRepository::open(dir.path())?;
        let mut out = Vec::new();

        let found = Scanner::new(DEFAULT_PATTERN)?.scan(&repo, URL, &mut out)?;

        assert_eq!(found, 0);
        Ok(())
    }
}
