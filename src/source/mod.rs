// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit sources.
//!
//! A [`CommitSource`] turns a [`Scope`] into the list of commits to check.
//! The local git repository and the GitHub API are interchangeable
//! implementations, selected from configuration.

mod github;
mod local;

pub use github::GitHubSource;
pub use local::LocalSource;

use crate::commit::Commit;
use crate::config::{PrCheckConfig, SourceKind};
use crate::error::{Result, RetrievalError};
use crate::github::GitHubClient;
use std::path::Path;

/// The set of commits under consideration for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Commits on HEAD that are not on the named base branch.
    Branch { base: String },
    /// Commits belonging to a pull request.
    PullRequest { number: u64 },
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Branch { base } => write!(f, "{}..HEAD", base),
            Scope::PullRequest { number } => write!(f, "pull request #{}", number),
        }
    }
}

/// Something that can list the commits in a scope.
pub trait CommitSource {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// List commits in source order.
    ///
    /// An empty list is a valid answer; failures to reach or read the
    /// source are errors.
    fn fetch_commits(&self, scope: &Scope) -> std::result::Result<Vec<Commit>, RetrievalError>;
}

/// Decide which source kind and scope a configuration asks for.
pub fn resolve(config: &PrCheckConfig) -> (SourceKind, Scope) {
    let pr = config.github.pull_request;
    let branch = || Scope::Branch {
        base: config.commits.base_branch.clone(),
    };

    match (config.commits.source, pr) {
        (SourceKind::Local, _) => (SourceKind::Local, branch()),
        (SourceKind::Github, Some(number)) => (SourceKind::Github, Scope::PullRequest { number }),
        (SourceKind::Github, None) => (SourceKind::Github, branch()),
        (SourceKind::Auto, Some(number)) => (SourceKind::Github, Scope::PullRequest { number }),
        (SourceKind::Auto, None) => (SourceKind::Local, branch()),
    }
}

/// Build the configured commit source and its scope.
pub fn from_config(
    config: &PrCheckConfig,
    repo_path: &Path,
) -> Result<(Box<dyn CommitSource>, Scope)> {
    let (kind, scope) = resolve(config);
    tracing::debug!("Using {:?} commit source for {}", kind, scope);

    let source: Box<dyn CommitSource> = match kind {
        SourceKind::Github => {
            let client = GitHubClient::new(&config.github)?;
            let head = config.github.sha.clone();
            Box::new(GitHubSource::new(client, head))
        }
        SourceKind::Local | SourceKind::Auto => Box::new(LocalSource::open(repo_path)?),
    };

    Ok((source, scope))
}

/// In-memory source for tests.
#[cfg(test)]
pub struct StaticSource {
    commits: Vec<Commit>,
    error: std::cell::RefCell<Option<RetrievalError>>,
}

#[cfg(test)]
impl StaticSource {
    pub fn new(commits: Vec<Commit>) -> Self {
        Self {
            commits,
            error: std::cell::RefCell::new(None),
        }
    }

    pub fn failing(error: RetrievalError) -> Self {
        Self {
            commits: Vec::new(),
            error: std::cell::RefCell::new(Some(error)),
        }
    }
}

#[cfg(test)]
impl CommitSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch_commits(&self, _scope: &Scope) -> std::result::Result<Vec<Commit>, RetrievalError> {
        match self.error.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(self.commits.clone()),
        }
    }
}
