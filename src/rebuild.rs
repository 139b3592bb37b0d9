use crate::commits::CommitRecord;
use crate::dates;
use crate::git::{CommitIdentity, GitClient};

use console::style;

/// What to do when a per-commit replay step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Record the failure and keep replaying the remaining commits.
    Continue,
    /// Stop at the first failed commit and leave the rest unreplayed.
    Abort,
}

/// One failed replay step, kept for the end-of-run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFailure {
    /// Zero-based index of the commit in oldest-first order.
    pub index: usize,
    pub hash: String,
    /// Which step failed: `checkout`, `stage` or `commit`.
    pub step: &'static str,
    pub error: String,
}

/// Outcome of the replay loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildReport {
    /// How many commits were attempted (equals the input length unless the
    /// run aborted early).
    pub attempted: usize,
    pub failures: Vec<CommitFailure>,
    /// True when [`FailureMode::Abort`] cut the run short.
    pub aborted: bool,
}

impl RebuildReport {
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.aborted
    }
}

/// Replays `commits` (oldest-first) onto the current branch, committing each
/// with its original identity and message but the synthetic timestamp at the
/// same index in `timestamps`.
///
/// The caller is expected to have switched to a fresh orphan branch already;
/// this function only drives the per-commit checkout → stage → commit cycle.
/// Failures are collected into the returned report instead of being silently
/// dropped; `mode` decides whether a failure stops the run.
///
/// # Parameters
///
/// * `git` — Version-control client performing the actual repository work.
/// * `commits` — Snapshots of the original commits, oldest-first.
/// * `timestamps` — Synthetic timestamps, index-aligned with `commits`.
/// * `mode` — Abort on the first failure or continue and report.
///
/// # Returns
///
/// A [`RebuildReport`] with the attempted count and every recorded failure.
pub fn replay<G: GitClient>(
    git: &G,
    commits: &[CommitRecord],
    timestamps: &[String],
    mode: FailureMode,
) -> RebuildReport {
    let mut report = RebuildReport {
        attempted: 0,
        failures: Vec::new(),
        aborted: false,
    };

    for (index, commit) in commits.iter().enumerate() {
        let date = dates::timestamp_for(timestamps, index);
        report.attempted += 1;

        println!(
            "[{}/{}] {} -> {}",
            index + 1,
            commits.len(),
            short_hash(&commit.hash),
            date
        );

        let step_res = replay_one(git, commit, date);
        match step_res {
            Ok(()) => {}
            Err((step, error)) => {
                eprintln!(
                    "{}",
                    style(format!(
                        "  {} failed for {}: {}",
                        step,
                        short_hash(&commit.hash),
                        error
                    ))
                    .red()
                );
                report.failures.push(CommitFailure {
                    index,
                    hash: commit.hash.clone(),
                    step,
                    error,
                });
                if mode == FailureMode::Abort {
                    report.aborted = true;
                    break;
                }
            }
        }
    }

    report
}

/// Runs the three replay steps for one commit, naming the step that failed.
fn replay_one<G: GitClient>(
    git: &G,
    commit: &CommitRecord,
    date: &str,
) -> Result<(), (&'static str, String)> {
    match git.checkout_tree(&commit.hash) {
        Ok(()) => {}
        Err(e) => return Err(("checkout", e)),
    }

    match git.stage_all() {
        Ok(()) => {}
        Err(e) => return Err(("stage", e)),
    }

    let identity = CommitIdentity {
        name: commit.author.clone(),
        email: commit.email.clone(),
        date: date.to_string(),
    };
    match git.commit(&commit.message, &identity) {
        Ok(()) => Ok(()),
        Err(e) => Err(("commit", e)),
    }
}

/// Moves the original branch onto the rebuilt history and removes the
/// temporary orphan branch.
pub fn finalize<G: GitClient>(git: &G, branch: &str, temp_branch: &str) -> Result<(), String> {
    match git.move_branch(branch, temp_branch) {
        Ok(()) => {}
        Err(e) => return Err(format!("failed to move `{}`: {}", branch, e)),
    }

    match git.checkout_branch(branch) {
        Ok(()) => {}
        Err(e) => return Err(format!("failed to check out `{}`: {}", branch, e)),
    }

    match git.delete_branch(temp_branch) {
        Ok(()) => Ok(()),
        Err(e) => Err(format!("failed to delete `{}`: {}", temp_branch, e)),
    }
}

fn short_hash(hash: &str) -> &str {
    if hash.len() > 8 { &hash[..8] } else { hash }
}

#[cfg(test)]
mod tests {
    use super::{FailureMode, finalize, replay};
    use crate::commits::CommitRecord;
    use crate::git::{CommitIdentity, GitClient};
    use std::cell::RefCell;

    /// Records every call in order and fails `commit` for the configured
    /// hashes.
    struct MockGit {
        calls: RefCell<Vec<String>>,
        fail_commit_for: Vec<String>,
    }

    impl MockGit {
        fn new() -> Self {
            MockGit {
                calls: RefCell::new(Vec::new()),
                fail_commit_for: Vec::new(),
            }
        }

        fn failing_on(hashes: &[&str]) -> Self {
            MockGit {
                calls: RefCell::new(Vec::new()),
                fail_commit_for: hashes.iter().map(|h| h.to_string()).collect(),
            }
        }

        fn push(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }

        fn last_committed_hash(&self) -> Option<String> {
            // The checkout call preceding a commit carries the hash.
            self.calls
                .borrow()
                .iter()
                .rev()
                .find(|c| c.starts_with("checkout-tree "))
                .map(|c| c["checkout-tree ".len()..].to_string())
        }
    }

    impl GitClient for MockGit {
        fn rev_parse(&self, _flag: &str) -> Result<String, String> {
            Ok(String::new())
        }

        fn current_branch(&self) -> Result<String, String> {
            Ok(String::from("main"))
        }

        fn commit_count(&self) -> Result<usize, String> {
            Ok(0)
        }

        fn merge_count(&self) -> Result<usize, String> {
            Ok(0)
        }

        fn read_log(&self, _format: &str) -> Result<String, String> {
            Ok(String::new())
        }

        fn create_branch(&self, name: &str) -> Result<(), String> {
            self.push(format!("create-branch {}", name));
            Ok(())
        }

        fn checkout_orphan(&self, name: &str) -> Result<(), String> {
            self.push(format!("checkout-orphan {}", name));
            Ok(())
        }

        fn checkout_tree(&self, rev: &str) -> Result<(), String> {
            self.push(format!("checkout-tree {}", rev));
            Ok(())
        }

        fn stage_all(&self) -> Result<(), String> {
            self.push(String::from("stage-all"));
            Ok(())
        }

        fn commit(&self, message: &str, identity: &CommitIdentity) -> Result<(), String> {
            self.push(format!("commit {} @ {}", message, identity.date));
            let hash = self.last_committed_hash().unwrap_or_default();
            if self.fail_commit_for.contains(&hash) {
                Err(String::from("simulated commit failure"))
            } else {
                Ok(())
            }
        }

        fn move_branch(&self, branch: &str, target: &str) -> Result<(), String> {
            self.push(format!("move-branch {} {}", branch, target));
            Ok(())
        }

        fn checkout_branch(&self, name: &str) -> Result<(), String> {
            self.push(format!("checkout-branch {}", name));
            Ok(())
        }

        fn delete_branch(&self, name: &str) -> Result<(), String> {
            self.push(format!("delete-branch {}", name));
            Ok(())
        }

        fn recent_dates(&self, _limit: usize) -> Result<String, String> {
            Ok(String::new())
        }
    }

    fn sample_commits(n: usize) -> Vec<CommitRecord> {
        (0..n)
            .map(|i| CommitRecord {
                hash: format!("hash{}", i),
                author: String::from("Alice"),
                email: String::from("alice@example.com"),
                message: format!("commit {}", i),
            })
            .collect()
    }

    fn sample_timestamps(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("2025-12-{:02} 10:00:00", i + 1))
            .collect()
    }

    #[test]
    fn replays_every_commit_in_order_with_assigned_dates() {
        let git = MockGit::new();
        let commits = sample_commits(3);
        let timestamps = sample_timestamps(3);

        let report = replay(&git, &commits, &timestamps, FailureMode::Continue);

        assert!(report.is_clean());
        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded(), 3);

        let calls = git.calls.borrow();
        let expected: Vec<String> = vec![
            "checkout-tree hash0".into(),
            "stage-all".into(),
            "commit commit 0 @ 2025-12-01 10:00:00".into(),
            "checkout-tree hash1".into(),
            "stage-all".into(),
            "commit commit 1 @ 2025-12-02 10:00:00".into(),
            "checkout-tree hash2".into(),
            "stage-all".into(),
            "commit commit 2 @ 2025-12-03 10:00:00".into(),
        ];
        assert_eq!(*calls, expected);
    }

    #[test]
    fn continue_mode_records_failure_and_keeps_going() {
        let git = MockGit::failing_on(&["hash1"]);
        let commits = sample_commits(3);
        let timestamps = sample_timestamps(3);

        let report = replay(&git, &commits, &timestamps, FailureMode::Continue);

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[0].hash, "hash1");
        assert_eq!(report.failures[0].step, "commit");
        assert!(!report.aborted);

        // The third commit was still attempted.
        let calls = git.calls.borrow();
        assert!(calls.iter().any(|c| c == "checkout-tree hash2"));
    }

    #[test]
    fn abort_mode_stops_at_first_failure() {
        let git = MockGit::failing_on(&["hash0"]);
        let commits = sample_commits(3);
        let timestamps = sample_timestamps(3);

        let report = replay(&git, &commits, &timestamps, FailureMode::Abort);

        assert!(report.aborted);
        assert_eq!(report.attempted, 1);
        assert_eq!(report.failures.len(), 1);

        let calls = git.calls.borrow();
        assert!(!calls.iter().any(|c| c == "checkout-tree hash1"));
    }

    #[test]
    fn extra_commits_reuse_the_last_timestamp() {
        let git = MockGit::new();
        let commits = sample_commits(3);
        let timestamps = sample_timestamps(2);

        let report = replay(&git, &commits, &timestamps, FailureMode::Continue);
        assert!(report.is_clean());

        let calls = git.calls.borrow();
        assert!(
            calls
                .iter()
                .any(|c| c == "commit commit 2 @ 2025-12-02 10:00:00")
        );
    }

    #[test]
    fn finalize_moves_switches_and_deletes() {
        let git = MockGit::new();
        let res = finalize(&git, "main", "temp-rewrite-120000");
        assert!(res.is_ok());

        let calls = git.calls.borrow();
        let expected: Vec<String> = vec![
            "move-branch main temp-rewrite-120000".into(),
            "checkout-branch main".into(),
            "delete-branch temp-rewrite-120000".into(),
        ];
        assert_eq!(*calls, expected);
    }
}
