// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit subject pattern matching.

use crate::commit::{subject_line, Commit};
use crate::config::{compile_pattern, DEFAULT_COMMIT_PATTERN};
use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// The built-in Conventional Commits pattern, compiled once.
    static ref DEFAULT_REGEX: Regex = Regex::new(DEFAULT_COMMIT_PATTERN).unwrap();
}

/// A compiled commit subject pattern.
#[derive(Debug, Clone)]
pub struct CommitPattern {
    regex: Regex,
}

impl CommitPattern {
    /// Compile a pattern supplied through configuration.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: compile_pattern("commits.pattern", pattern)?,
        })
    }

    /// Get the pattern source text.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether a subject line satisfies the pattern.
    ///
    /// Uses search semantics: only the pattern's own anchors constrain where
    /// the match may occur. The subject is matched exactly as given.
    pub fn is_match(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }
}

impl Default for CommitPattern {
    fn default() -> Self {
        Self {
            regex: DEFAULT_REGEX.clone(),
        }
    }
}

/// Check a commit's subject line against a pattern.
pub fn validate(commit: &Commit, pattern: &CommitPattern) -> bool {
    pattern.is_match(subject_line(&commit.subject))
}
