use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

/// A commit as read from the local history.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub hash: String,
    pub message: String,
    pub summary: String,
    pub authored: DateTime<FixedOffset>,
}

impl Commit {
    pub fn from_git(commit: &git2::Commit) -> Commit {
        let message = String::from_utf8_lossy(commit.message_bytes()).to_string();
        let summary = match commit.summary_bytes() {
            Some(bytes) => String::from_utf8_lossy(bytes).to_string(),
            None => String::new(),
        };
        Commit {
            hash: commit.id().to_string(),
            message,
            summary,
            authored: authored_time(&commit.author().when()),
        }
    }
}

fn authored_time(when: &git2::Time) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(when.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    match offset.timestamp_opt(when.seconds(), 0).single() {
        Some(time) => time,
        None => DateTime::<Utc>::default().with_timezone(&offset),
    }
}
