// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit validation pipeline: fetch, classify, aggregate.

use crate::commit::{build_report, Commit, Report, ValidationResult};
use crate::error::Result;
use crate::source::{CommitSource, Scope};

use super::pattern::{validate, CommitPattern};

/// Validates every commit a source returns for a scope.
pub struct CommitValidator<'a> {
    source: &'a dyn CommitSource,
    pattern: CommitPattern,
    include_merges: bool,
}

impl<'a> CommitValidator<'a> {
    /// Create a validator reading from `source` and checking against `pattern`.
    pub fn new(source: &'a dyn CommitSource, pattern: CommitPattern) -> Self {
        Self {
            source,
            pattern,
            include_merges: false,
        }
    }

    /// Check merge commits too. They are skipped by default.
    pub fn include_merges(mut self, include: bool) -> Self {
        self.include_merges = include;
        self
    }

    /// Get the pattern commits are checked against.
    pub fn pattern(&self) -> &CommitPattern {
        &self.pattern
    }

    /// Classify a list of commits.
    ///
    /// Every commit is checked; a failure never stops the walk.
    pub fn classify(&self, commits: Vec<Commit>) -> Vec<ValidationResult> {
        commits
            .into_iter()
            .map(|commit| {
                let valid = validate(&commit, &self.pattern);
                tracing::debug!(
                    "{} {} {:?}",
                    if valid { "valid" } else { "invalid" },
                    commit.short_hash(),
                    commit.subject
                );
                ValidationResult { commit, valid }
            })
            .collect()
    }

    /// Fetch the commits in scope and build the aggregate report.
    ///
    /// Retrieval errors propagate before any validation happens.
    pub fn check(&self, scope: &Scope) -> Result<Report> {
        tracing::info!("Fetching commits for {} from {}", scope, self.source.name());
        let mut commits = self.source.fetch_commits(scope)?;
        if !self.include_merges {
            let before = commits.len();
            commits.retain(|c| !c.is_merge);
            if commits.len() < before {
                tracing::debug!("Skipped {} merge commits", before - commits.len());
            }
        }
        tracing::info!("Checking {} commits", commits.len());

        let report = build_report(self.classify(commits));
        tracing::info!(
            "{} of {} commits match the pattern",
            report.valid_count(),
            report.total
        );
        Ok(report)
    }
}
