use chrono::{DateTime, Local};
use std::process::{Command, Stdio};

/// Author/committer identity and date applied to a single rebuilt commit.
///
/// The fields map directly onto the `GIT_AUTHOR_*` / `GIT_COMMITTER_*`
/// environment variables; the original history never separates author from
/// committer, so one identity covers both roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
    pub date: String,
}

/// Narrow interface over the `git` command line.
///
/// Everything the rewrite needs from the repository goes through this trait,
/// so the distribution and replay logic can be unit-tested against a mock
/// without a real repository. [`SystemGit`] is the production implementation
/// that shells out.
pub trait GitClient {
    /// Runs `git rev-parse <flag>` and returns its trimmed output.
    fn rev_parse(&self, flag: &str) -> Result<String, String>;

    /// Returns the name of the currently checked-out branch.
    fn current_branch(&self) -> Result<String, String>;

    /// Returns the number of commits reachable from `HEAD`.
    fn commit_count(&self) -> Result<usize, String>;

    /// Returns the number of merge commits reachable from `HEAD`.
    fn merge_count(&self) -> Result<usize, String>;

    /// Returns the raw output of `git log --format=<format>`, newest-first.
    fn read_log(&self, format: &str) -> Result<String, String>;

    /// Creates a branch at the current tip without switching to it.
    fn create_branch(&self, name: &str) -> Result<(), String>;

    /// Switches to a new branch that has no parent history.
    fn checkout_orphan(&self, name: &str) -> Result<(), String>;

    /// Overlays the working tree with the full file state of `rev`
    /// (`git checkout <rev> -- .`).
    fn checkout_tree(&self, rev: &str) -> Result<(), String>;

    /// Stages every change in the working tree, including deletions.
    fn stage_all(&self) -> Result<(), String>;

    /// Creates a commit with the given message, author/committer identity and
    /// date. The identity is passed via environment variables scoped to the
    /// single child process; the parent environment is never mutated.
    fn commit(&self, message: &str, identity: &CommitIdentity) -> Result<(), String>;

    /// Force-moves `branch` to point at `target` (`git branch -f`).
    fn move_branch(&self, branch: &str, target: &str) -> Result<(), String>;

    /// Switches to an existing branch.
    fn checkout_branch(&self, name: &str) -> Result<(), String>;

    /// Deletes a branch (`git branch -D`).
    fn delete_branch(&self, name: &str) -> Result<(), String>;

    /// Returns abbreviated hashes and short dates for the most recent
    /// `limit` commits, one per line.
    fn recent_dates(&self, limit: usize) -> Result<String, String>;
}

/// Production [`GitClient`] backed by `git` subprocesses, one invocation at a
/// time, each awaited to completion.
pub struct SystemGit;

/// Runs a command and returns only success or failure.
///
/// Output is captured rather than inherited; on a non-zero exit the trimmed
/// stderr is returned so callers can surface it.
fn run_status(mut cmd: Command) -> Result<(), String> {
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let out_res = cmd.output();
    match out_res {
        Ok(out) => {
            if out.status.success() {
                Ok(())
            } else {
                let err = String::from_utf8_lossy(&out.stderr).trim().to_string();
                if err.is_empty() {
                    Err(String::from("non-zero exit"))
                } else {
                    Err(err)
                }
            }
        }
        Err(e) => Err(format!("{}", e)),
    }
}

/// Runs a command and returns its trimmed standard output on success, or its
/// trimmed standard error as an `Err` on failure.
///
/// # Parameters
///
/// * `cmd` — A fully configured [`std::process::Command`] ready to execute.
///
/// # Returns
///
/// * `Ok(String)` containing trimmed `stdout` if the command succeeded.
/// * `Err(String)` containing trimmed `stderr` or an I/O error message
///   otherwise.
fn run_output(mut cmd: Command) -> Result<String, String> {
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let out_res = cmd.output();
    match out_res {
        Ok(out) => {
            if out.status.success() {
                Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
            } else {
                Err(String::from_utf8_lossy(&out.stderr).trim().to_string())
            }
        }
        Err(e) => Err(format!("{}", e)),
    }
}

fn git_command(args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.args(args);
    cmd
}

impl GitClient for SystemGit {
    fn rev_parse(&self, flag: &str) -> Result<String, String> {
        run_output(git_command(&["rev-parse", flag]))
    }

    fn current_branch(&self) -> Result<String, String> {
        run_output(git_command(&["rev-parse", "--abbrev-ref", "HEAD"]))
    }

    fn commit_count(&self) -> Result<usize, String> {
        let raw = run_output(git_command(&["rev-list", "--count", "HEAD"]))?;
        match raw.parse::<usize>() {
            Ok(n) => Ok(n),
            Err(e) => Err(format!("unparseable commit count `{}`: {}", raw, e)),
        }
    }

    fn merge_count(&self) -> Result<usize, String> {
        let raw = run_output(git_command(&["rev-list", "--count", "--merges", "HEAD"]))?;
        match raw.parse::<usize>() {
            Ok(n) => Ok(n),
            Err(e) => Err(format!("unparseable merge count `{}`: {}", raw, e)),
        }
    }

    fn read_log(&self, format: &str) -> Result<String, String> {
        let format_arg = format!("--format={}", format);
        run_output(git_command(&["log", format_arg.as_str()]))
    }

    fn create_branch(&self, name: &str) -> Result<(), String> {
        run_status(git_command(&["branch", name]))
    }

    fn checkout_orphan(&self, name: &str) -> Result<(), String> {
        run_status(git_command(&["checkout", "--orphan", name]))
    }

    fn checkout_tree(&self, rev: &str) -> Result<(), String> {
        run_status(git_command(&["checkout", rev, "--", "."]))
    }

    fn stage_all(&self) -> Result<(), String> {
        run_status(git_command(&["add", "-A"]))
    }

    fn commit(&self, message: &str, identity: &CommitIdentity) -> Result<(), String> {
        let mut cmd = git_command(&["commit", "-m", message]);
        cmd.env("GIT_AUTHOR_NAME", &identity.name);
        cmd.env("GIT_AUTHOR_EMAIL", &identity.email);
        cmd.env("GIT_AUTHOR_DATE", &identity.date);
        cmd.env("GIT_COMMITTER_NAME", &identity.name);
        cmd.env("GIT_COMMITTER_EMAIL", &identity.email);
        cmd.env("GIT_COMMITTER_DATE", &identity.date);
        run_status(cmd)
    }

    fn move_branch(&self, branch: &str, target: &str) -> Result<(), String> {
        run_status(git_command(&["branch", "-f", branch, target]))
    }

    fn checkout_branch(&self, name: &str) -> Result<(), String> {
        run_status(git_command(&["checkout", name]))
    }

    fn delete_branch(&self, name: &str) -> Result<(), String> {
        run_status(git_command(&["branch", "-D", name]))
    }

    fn recent_dates(&self, limit: usize) -> Result<String, String> {
        let limit_arg = format!("-{}", limit);
        run_output(git_command(&[
            "log",
            "--pretty=format:%h %ad",
            "--date=short",
            limit_arg.as_str(),
        ]))
    }
}

/// Builds the timestamped name of the safety branch created before rewriting,
/// e.g. `backup-20251201-093015`.
pub fn backup_branch_name(now: &DateTime<Local>) -> String {
    format!("backup-{}", now.format("%Y%m%d-%H%M%S"))
}

/// Builds the name of the throwaway orphan branch the history is rebuilt on,
/// e.g. `temp-rewrite-093015`.
pub fn temp_branch_name(now: &DateTime<Local>) -> String {
    format!("temp-rewrite-{}", now.format("%H%M%S"))
}
