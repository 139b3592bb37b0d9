use console::{measure_text_width, style};
use std::iter;

/// Prints a decorative, colorized banner describing the date-rewrite run.
///
/// The banner is dynamically sized to fit the widest **visible** line of text,
/// using [`console::measure_text_width`] to ignore ANSI color codes when
/// calculating padding. It is framed with Unicode box-drawing characters
/// (`╔═╗`, `║ ║`, `╚═╝`) and uses [`console::style`] for coloring and bolding.
///
/// Borders are styled independently from the inner text so that embedded color
/// codes inside the content (e.g. the failure-mode line) do not affect the
/// color of the box edges.
///
/// # Parameters
///
/// * `branch` – The branch whose history will be rewritten.
/// * `commit_count` – How many commits will be replayed.
/// * `first_date` / `last_date` – The span of the fixed date pool.
/// * `abort_on_failure` – When `true`, the banner notes that the run stops at
///   the first failed commit; otherwise it notes that failures are collected
///   and reported at the end.
///
/// # Output
///
/// This function prints directly to standard output. It does not return any value.
///
/// # Examples
///
/// ```no_run
/// use git_date_rewrite::banner::print_banner;
///
/// print_banner("main", 42, "2025-12-01", "2025-12-16", false);
/// ```
pub fn print_banner(
    branch: &str,
    commit_count: usize,
    first_date: &str,
    last_date: &str,
    abort_on_failure: bool,
) {
    let lines = banner_lines(branch, commit_count, first_date, last_date, abort_on_failure);

    let max_width = lines
        .iter()
        .map(|l| measure_text_width(l)) // ignore ANSI in content
        .max()
        .unwrap_or(0)
        + 2;

    let border = "═".repeat(max_width);
    let top = style(format!("╔{}╗", border)).blue().bold();
    let bottom = style(format!("╚{}╝", border)).blue().bold();
    let left = style("║ ").blue().bold().to_string();
    let right = style("║").blue().bold().to_string();

    println!();
    println!("{top}");
    for line in lines {
        let visible = measure_text_width(&line);
        let pad = max_width - visible; // includes the one space after left border
        // build row: [blue left] + [colored line] + [padding spaces] + [blue right]
        println!("{}{}{}{}", left, line, " ".repeat(pad - 1), right);
    }
    println!("{bottom}");
    println!();
}

/// Constructs the lines of text for the date-rewrite banner.
///
/// Returns each banner line as a `String`, in the order they should be
/// displayed: 1) title, 2) failure-mode notice, 3) run summary, 4) steps.
/// Some lines contain ANSI styling; consumers that need accurate widths
/// should measure **visible** width (e.g. with `console::measure_text_width`)
/// rather than `str::len()`.
fn banner_lines(
    branch: &str,
    commit_count: usize,
    first_date: &str,
    last_date: &str,
    abort_on_failure: bool,
) -> Vec<String> {
    let top = ["Rewrite commit dates by replaying history onto an orphan branch", ""]
        .into_iter()
        .map(|s| s.to_string());

    let mode = if abort_on_failure {
        vec![
            style("Abort mode: the run stops at the first failed commit.")
                .yellow()
                .bold()
                .to_string(),
        ]
    } else {
        vec![
            style("Continue mode: failed commits are collected and reported at the end.")
                .cyan()
                .bold()
                .to_string(),
            style("(Use --abort-on-failure to stop at the first failure instead.)")
                .cyan()
                .to_string(),
        ]
    }
    .into_iter();

    let bottom = iter::once(String::new())
        .chain(iter::once(format!(
            "Branch `{}`: {} commits -> dates {} .. {}",
            branch, commit_count, first_date, last_date
        )))
        .chain(
            [
                "This tool will:",
                "  1) Create a timestamped backup branch at the current tip",
                "  2) Replay every commit onto an orphan branch with a new date",
                "  3) Move the branch to the rebuilt history and clean up",
            ]
            .into_iter()
            .map(|s| s.to_string()),
        );

    top.chain(mode).chain(bottom).collect()
}
