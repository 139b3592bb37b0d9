use crate::{
    banner::print_banner,
    commits, dates,
    git::{self, GitClient, SystemGit},
    prompt,
    rebuild::{self, FailureMode},
};

use chrono::Local;
use console::style;
use rand::{SeedableRng, rngs::StdRng};
use std::env;

/// Repository facts gathered before anything is touched.
struct RepoInfo {
    branch: String,
    commit_count: usize,
}

/// Run configuration parsed from the command line.
struct Options {
    seed: Option<u64>,
    failure_mode: FailureMode,
}

/// Verifies the current directory is a repository and the history is usable,
/// returning the branch name and commit count.
fn verify_environment<G: GitClient>(git: &G) -> Result<RepoInfo, ()> {
    // Repository detection.
    match git.rev_parse("--git-dir") {
        Ok(_) => {}
        Err(e) => {
            eprintln!(
                "{}",
                style(format!("Error: not inside a git repo ({})", e))
                    .red()
                    .bold()
            );
            return Err(());
        }
    }

    let branch = match git.current_branch() {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{}",
                style(format!("Error: unable to resolve current branch ({})", e))
                    .red()
                    .bold()
            );
            return Err(());
        }
    };

    let commit_count = match git.commit_count() {
        Ok(n) => n,
        Err(e) => {
            eprintln!(
                "{}",
                style(format!("Error: unable to count commits ({})", e))
                    .red()
                    .bold()
            );
            return Err(());
        }
    };

    // Replay assumes a strictly linear history; reject merges up front
    // instead of producing a silently flattened rewrite.
    match git.merge_count() {
        Ok(0) => {}
        Ok(n) => {
            eprintln!(
                "{}",
                style(format!(
                    "Error: history contains {} merge commit(s); only linear histories are supported.",
                    n
                ))
                .red()
                .bold()
            );
            return Err(());
        }
        Err(e) => {
            eprintln!(
                "{}",
                style(format!("Error: unable to inspect history shape ({})", e))
                    .red()
                    .bold()
            );
            return Err(());
        }
    }

    Ok(RepoInfo {
        branch,
        commit_count,
    })
}

/// Parses the value following `--seed`, if the flag is present.
///
/// # Returns
///
/// * `Ok(None)` when the flag is absent.
/// * `Ok(Some(n))` when a valid unsigned value follows the flag.
/// * `Err(String)` when the flag has no value or the value does not parse.
fn parse_seed(args: &[String]) -> Result<Option<u64>, String> {
    let pos = args.iter().position(|a| a == "--seed");
    match pos {
        None => Ok(None),
        Some(i) => match args.get(i + 1) {
            None => Err(String::from("--seed requires a value")),
            Some(raw) => match raw.parse::<u64>() {
                Ok(n) => Ok(Some(n)),
                Err(_) => Err(format!("invalid --seed value `{}`", raw)),
            },
        },
    }
}

/// Builds the line printed after the replay loop: a success banner for a
/// clean run, or a failure tally when the report just listed failed commits.
fn completion_message(report: &rebuild::RebuildReport) -> String {
    if report.is_clean() {
        style("✓ Rewrite complete!").green().bold().to_string()
    } else {
        style(format!(
            "Rewrite finished with {} failure(s).",
            report.failures.len()
        ))
        .yellow()
        .bold()
        .to_string()
    }
}

/// Prints the per-date commit distribution table.
fn print_distribution(distribution: &[usize]) {
    println!("Distribution:");
    for (date, count) in dates::DATE_POOL.iter().zip(distribution.iter()) {
        println!("  {}: {} commits", date, count);
    }
    println!();
}

/// Prints usage information to stdout.
fn print_help() {
    println!(
        "\
git-date-rewrite {}

Rewrite the author/committer dates of a linear Git history.

USAGE:
    git-date-rewrite [OPTIONS]

OPTIONS:
    -h, --help             Print help information
    -V, --version          Print version information
    --seed <N>             Seed the random date distribution (reproducible runs)
    --abort-on-failure     Stop at the first failed commit instead of
                           continuing and reporting failures at the end

DESCRIPTION:
    This tool replays every commit of the current branch onto a fresh orphan
    branch, preserving tree contents, author identity and message while
    assigning each commit a new date drawn from a fixed pool. A timestamped
    backup branch is created before any history is touched.",
        env!("CARGO_PKG_VERSION")
    );
}

/// Main CLI entry point for `git-date-rewrite`.
///
/// This function:
/// 1. Parses CLI flags (`--seed`, `--abort-on-failure`).
/// 2. Verifies that `git` is installed, the current directory is a repository
///    and the history is linear with enough commits for the date pool.
/// 3. Computes the randomized date assignment and shows it.
/// 4. Asks for confirmation before touching anything.
/// 5. Creates a timestamped backup branch, replays every commit onto an
///    orphan branch with its new date, then moves the original branch onto
///    the rebuilt history.
/// 6. Prints a summary with the backup name and recovery/push instructions.
///
/// Returns `Ok(exit_code)` on success, or `Err(())` on error.
///
/// # Exit Codes
///
/// * `0` – Successful execution or user abort at the confirmation gate.
/// * Non-zero – Precondition failures or a fatal rebuild/finalize error.
pub fn entry() -> Result<i32, ()> {
    // Parse command-line arguments.
    let args: Vec<String> = env::args().collect();

    // Ensure `git` is available.
    match which::which("git") {
        Ok(_) => {}
        Err(_) => {
            eprintln!("{}", style("Error: `git` not found in PATH.").red().bold());
            return Err(());
        }
    }

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(0);
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("git-date-rewrite {}", env!("CARGO_PKG_VERSION"));
        return Ok(0);
    }

    let seed = match parse_seed(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", style(format!("Error: {}", e)).red().bold());
            return Err(());
        }
    };

    let failure_mode = if args.iter().any(|a| a == "--abort-on-failure") {
        FailureMode::Abort
    } else {
        FailureMode::Continue
    };

    let options = Options { seed, failure_mode };
    let mut confirm_prompter = prompt::DialoguerConfirmPrompter;
    run(&SystemGit, &mut confirm_prompter, &options)
}

/// Drives the whole rewrite against the given git client and confirmation
/// prompter; both are injected so the orchestration can be exercised without
/// a repository or a terminal.
fn run<G: GitClient, P: prompt::ConfirmPrompter>(
    git_client: &G,
    prompter: &mut P,
    options: &Options,
) -> Result<i32, ()> {
    let info = verify_environment(git_client)?;

    println!("Branch: {}", info.branch);
    println!("Commits: {}\n", info.commit_count);

    let pool_size = dates::DATE_POOL.len();
    if info.commit_count < pool_size {
        eprintln!(
            "{}",
            style(format!(
                "Error: need at least {} commits (found {}).",
                pool_size, info.commit_count
            ))
            .red()
            .bold()
        );
        return Err(());
    }

    // Compute the date assignment before touching the repository.
    let mut rng = match options.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let distribution = dates::distribute(info.commit_count, &mut rng);
    let timestamps = dates::assign_timestamps(&distribution, &mut rng);

    print_distribution(&distribution);

    print_banner(
        &info.branch,
        info.commit_count,
        dates::DATE_POOL[0],
        dates::DATE_POOL[pool_size - 1],
        options.failure_mode == FailureMode::Abort,
    );

    // Single confirmation gate before any repository mutation.
    match prompt::confirm_rewrite(prompter) {
        Ok(true) => {}
        Ok(false) => {
            println!(
                "{}",
                style("Canceled by user. No changes made.").yellow().bold()
            );
            return Ok(0);
        }
        Err(e) => {
            eprintln!("{}", style(format!("Prompt error: {}", e)).red().bold());
            return Err(());
        }
    }

    let now = Local::now();
    let backup = git::backup_branch_name(&now);
    println!("Creating backup: {}", backup);
    match git_client.create_branch(&backup) {
        Ok(()) => {
            println!("{}\n", style("✓ Backup created").green());
        }
        Err(e) => {
            eprintln!(
                "{}",
                style(format!("Error: failed to create backup branch ({})", e))
                    .red()
                    .bold()
            );
            return Err(());
        }
    }

    println!("Collecting commit information...");
    let raw_log = match git_client.read_log(commits::LOG_FORMAT) {
        Ok(s) if !s.is_empty() => s,
        Ok(_) => {
            eprintln!("{}", style("Error: could not read commits").red().bold());
            return Err(());
        }
        Err(e) => {
            eprintln!(
                "{}",
                style(format!("Error: could not read commits ({})", e))
                    .red()
                    .bold()
            );
            return Err(());
        }
    };

    let commit_list = commits::parse_log(&raw_log);
    println!("Found {} commits\n", commit_list.len());

    if commit_list.len() != info.commit_count {
        println!(
            "{}",
            style(format!(
                "Warning: expected {} commits but found {}",
                info.commit_count,
                commit_list.len()
            ))
            .yellow()
        );
    }

    let temp_branch = git::temp_branch_name(&now);
    match git_client.checkout_orphan(&temp_branch) {
        Ok(()) => {}
        Err(e) => {
            eprintln!(
                "{}",
                style(format!("Error: failed to create orphan branch ({})", e))
                    .red()
                    .bold()
            );
            return Err(());
        }
    }

    let report = rebuild::replay(git_client, &commit_list, &timestamps, options.failure_mode);

    if !report.failures.is_empty() {
        eprintln!(
            "{}",
            style(format!(
                "\n{} of {} commits failed to replay:",
                report.failures.len(),
                report.attempted
            ))
            .red()
            .bold()
        );
        for failure in &report.failures {
            eprintln!(
                "{}",
                style(format!(
                    "  [{}] {} ({} step): {}",
                    failure.index + 1,
                    failure.hash,
                    failure.step,
                    failure.error
                ))
                .red()
            );
        }
    }

    if report.aborted {
        eprintln!(
            "{}",
            style(format!(
                "Aborted on first failure. The branch `{0}` was not moved; recover with `git checkout {0} && git reset --hard {1}`.",
                info.branch, backup
            ))
            .red()
            .bold()
        );
        return Err(());
    }

    println!("\n{}\n", completion_message(&report));

    println!("Updating {}...", info.branch);
    match rebuild::finalize(git_client, &info.branch, &temp_branch) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("{}", style(format!("Error: {}", e)).red().bold());
            return Err(());
        }
    }

    match git_client.recent_dates(15) {
        Ok(log) => {
            println!("\nNew commit dates (last 15):");
            println!("{}", log);
        }
        Err(_) => {}
    }

    println!("\n{}", style("=== Success! ===").green().bold());
    println!("Backup: {}", backup);
    println!("\nTo push: git push --force origin {}", info.branch);
    println!("To restore: git reset --hard {}\n", backup);

    Ok(0)
}
