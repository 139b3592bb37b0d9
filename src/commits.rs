/// Delimiter used in the `git log` format string. Three pipes are unlikely to
/// appear in author names or emails; a subject line containing them is still
/// handled because parsing only splits on the first three occurrences.
pub const LOG_DELIMITER: &str = "|||";

/// Format string passed to `git log --format=...`: hash, author name, author
/// email and subject line, delimiter-separated.
pub const LOG_FORMAT: &str = "%H|||%an|||%ae|||%s";

/// Read-only snapshot of one pre-existing commit, extracted from the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub author: String,
    pub email: String,
    pub message: String,
}

/// Parses raw `git log` output (one [`LOG_FORMAT`] line per commit,
/// newest-first) into commit records ordered oldest-first.
///
/// Each line is split on the first three delimiter occurrences only; any
/// further delimiters are kept as part of the message. Lines that do not
/// contain the delimiter, or that are missing fields, are skipped rather
/// than aborting the whole parse.
///
/// # Parameters
///
/// * `raw` — The complete stdout of `git log --format=<LOG_FORMAT>`.
///
/// # Returns
///
/// Commit records in oldest-first order, ready for sequential replay.
///
/// # Examples
///
/// ```ignore
/// let raw = "abc|||Alice|||alice@example.com|||Second\n\
///            def|||Alice|||alice@example.com|||First";
/// let commits = parse_log(raw);
/// assert_eq!(commits[0].message, "First");
/// ```
pub fn parse_log(raw: &str) -> Vec<CommitRecord> {
    let mut commits: Vec<CommitRecord> = Vec::new();

    for line in raw.lines() {
        if !line.contains(LOG_DELIMITER) {
            continue;
        }

        let parts: Vec<&str> = line.splitn(4, LOG_DELIMITER).collect();
        if parts.len() < 4 {
            continue;
        }

        commits.push(CommitRecord {
            hash: parts[0].to_string(),
            author: parts[1].to_string(),
            email: parts[2].to_string(),
            message: parts[3].to_string(),
        });
    }

    // The log arrives newest-first; replay wants oldest-first.
    commits.reverse();
    commits
}
