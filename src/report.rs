use std::fmt;

use crate::commit::Commit;
use crate::fetcher::repository_name;

pub const SEPARATOR: &str = "-----------------------------------";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// A commit whose message matched, together with the commit that came
/// right before it in history.
#[derive(Debug, Clone, PartialEq)]
pub struct Report<'a> {
    pub repo_url: &'a str,
    pub commit: &'a Commit,
    pub previous: Option<&'a Commit>,
}

impl<'a> Report<'a> {
    /// Shell command that reproduces the state just before the matched commit.
    pub fn checkout_command(&self) -> Option<String> {
        let previous = self.previous?;
        let name = repository_name(self.repo_url);
        Some(format!(
            "git clone --single-branch {url} {name} && cd {name} && git checkout {hash}",
            url = self.repo_url,
            name = name,
            hash = previous.hash
        ))
    }
}

impl<'a> fmt::Display for Report<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Commit {}: {}", self.commit.hash, self.commit.summary)?;
        writeln!(f, "Date: {}", self.commit.authored.format(DATE_FORMAT))?;
        writeln!(f, "Message: {}", self.commit.message)?;
        if let Some(command) = self.checkout_command() {
            writeln!(f, "To checkout this commit run:")?;
            writeln!(f, "{}", command)?;
        }
        writeln!(f, "{}", SEPARATOR)
    }
}
