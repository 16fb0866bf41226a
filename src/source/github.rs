// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! GitHub API commit source.

use crate::commit::Commit;
use crate::error::RetrievalError;
use crate::github::GitHubClient;

use super::{CommitSource, Scope};

/// Reads pull request commits from the GitHub REST API.
pub struct GitHubSource {
    client: GitHubClient,
    head: Option<String>,
}

impl GitHubSource {
    /// Create a source. `head` is needed only for branch scopes.
    pub fn new(client: GitHubClient, head: Option<String>) -> Self {
        Self { client, head }
    }
}

impl CommitSource for GitHubSource {
    fn name(&self) -> &'static str {
        "GitHub API"
    }

    fn fetch_commits(&self, scope: &Scope) -> Result<Vec<Commit>, RetrievalError> {
        match scope {
            Scope::PullRequest { number } => self.client.list_pull_commits(*number),
            Scope::Branch { base } => {
                let head = self
                    .head
                    .as_deref()
                    .ok_or_else(|| RetrievalError::InvalidReference {
                        reference: format!(
                            "comparing against '{}' needs a head SHA (GITHUB_SHA)",
                            base
                        ),
                    })?;
                self.client.compare_commits(base, head)
            }
        }
    }
}
