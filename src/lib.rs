// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! prcheck - Pull request hygiene checks for CI
//!
//! Validates the commits of a branch or pull request against a subject
//! pattern, checks PR titles and descriptions, and delivers a rendered
//! report to the console, GitHub step outputs, check runs or comments.
//!
//! # Features
//!
//! - **Commit Validator**: Every commit in scope is checked, never fail-fast
//! - **Commit Sources**: Local git (`base..HEAD`) or the GitHub REST API
//! - **PR Format Checker**: Title pattern and minimum description length
//! - **LLM Quality Checker**: Optional OpenAI-scored description review
//! - **Code Reviewer**: Optional per-file LLM review posted as a PR review
//! - **Report Sinks**: Console, `$GITHUB_OUTPUT`, check runs, PR comments
//!
//! # Example
//!
//! ```no_run
//! use prcheck::config::PrCheckConfig;
//! use prcheck::rules::{CommitPattern, CommitValidator};
//! use std::path::Path;
//!
//! let config = PrCheckConfig::load().unwrap();
//! let (source, scope) = prcheck::source::from_config(&config, Path::new(".")).unwrap();
//!
//! let pattern = CommitPattern::new(&config.commits.pattern).unwrap();
//! let report = CommitValidator::new(source.as_ref(), pattern)
//!     .check(&scope)
//!     .unwrap();
//! println!("{} of {} commits are invalid", report.invalid.len(), report.total);
//! ```

// Module declarations
pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod github;
pub mod llm;
pub mod pr;
pub mod report;
pub mod rules;
pub mod source;

// Re-exports for convenience
pub use config::PrCheckConfig;
pub use error::{PrCheckError, Result};

/// Version information embedded at compile time.
pub mod version {
    /// The current version of prcheck.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// The git SHA at compile time (if available).
    pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

    /// The git commit date at compile time (if available).
    pub const GIT_COMMIT_DATE: Option<&str> = option_env!("VERGEN_GIT_COMMIT_DATE");

    /// Get a formatted version string.
    pub fn version_string() -> String {
        let short = |sha: &str| sha.chars().take(7).collect::<String>();
        match (GIT_SHA, GIT_COMMIT_DATE) {
            (Some(sha), Some(date)) => format!("{} ({} {})", VERSION, short(sha), date),
            (Some(sha), None) => format!("{} ({})", VERSION, short(sha)),
            _ => VERSION.to_string(),
        }
    }
}
