//! # git-date-rewrite
//!
//! A CLI tool to rewrite the author/committer dates of a linear Git history.
//!
//! This crate provides functionality to:
//! - Distribute commits across a fixed pool of calendar dates (weighted
//!   random, at least one commit per date)
//! - Replay each original commit onto a fresh orphan branch, preserving tree
//!   contents, author identity and message while overriding both dates
//! - Create a timestamped backup branch before anything is touched, and move
//!   the original branch onto the rebuilt history afterwards
//!
//! ## Usage
//!
//! ```bash
//! # Interactive run (confirmation gate before any mutation)
//! git-date-rewrite
//!
//! # Reproducible date assignment, stop at the first failed commit
//! git-date-rewrite --seed 42 --abort-on-failure
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface and main entry point
//! - [`git`] - Narrow git client trait plus the subprocess implementation
//! - [`commits`] - Commit log parsing
//! - [`dates`] - Date pool, distribution and timestamp assignment
//! - [`rebuild`] - Orphan-branch replay loop and finalization
//! - [`prompt`] - User confirmation abstraction
//! - [`banner`] - Decorative CLI banner

pub mod banner;
pub mod cli;
pub mod commits;
pub mod dates;
pub mod git;
pub mod prompt;
pub mod rebuild;
