// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit records and aggregated validation reports.

use serde::Serialize;

/// A commit as returned by a commit source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Full commit SHA.
    pub hash: String,
    /// First line of the commit message.
    pub subject: String,
    /// Author name (or login when the name is unavailable).
    pub author: String,
    /// True for commits with more than one parent.
    pub is_merge: bool,
}

impl Commit {
    /// Create a commit from a full message, keeping only its first line.
    pub fn from_message(
        hash: impl Into<String>,
        message: &str,
        author: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            subject: subject_line(message).to_string(),
            author: author.into(),
            is_merge: false,
        }
    }

    /// Mark the commit as a merge commit.
    pub fn merge(mut self, is_merge: bool) -> Self {
        self.is_merge = is_merge;
        self
    }

    /// Abbreviated SHA for display.
    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.hash.len());
        &self.hash[..end]
    }
}

/// First line of a commit message, without its line terminator.
pub fn subject_line(message: &str) -> &str {
    let line = message.split('\n').next().unwrap_or("");
    line.strip_suffix('\r').unwrap_or(line)
}

/// Outcome of checking one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub commit: Commit,
    pub valid: bool,
}

/// Aggregate over every commit in scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Number of commits examined.
    pub total: usize,
    /// Failing commits, in source order.
    pub invalid: Vec<ValidationResult>,
    /// True when no commit failed.
    pub passed: bool,
}

impl Report {
    /// Whether the scope contained no commits at all.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of commits that passed.
    pub fn valid_count(&self) -> usize {
        self.total - self.invalid.len()
    }
}

/// Aggregate per-commit results into a report.
pub fn build_report(results: Vec<ValidationResult>) -> Report {
    let total = results.len();
    let invalid: Vec<ValidationResult> = results.into_iter().filter(|r| !r.valid).collect();
    let passed = invalid.is_empty();

    Report {
        total,
        invalid,
        passed,
    }
}
