// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! GitHub REST API payloads.

use crate::commit::Commit;
use crate::error::RetrievalError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ApiCommit {
    sha: String,
    commit: ApiCommitDetail,
    author: Option<ApiUser>,
    #[serde(default)]
    parents: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiCommitDetail {
    message: String,
    author: Option<ApiPerson>,
}

#[derive(Debug, Deserialize)]
struct ApiPerson {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
}

impl From<ApiCommit> for Commit {
    fn from(api: ApiCommit) -> Self {
        let author = api
            .commit
            .author
            .and_then(|a| a.name)
            .filter(|n| !n.is_empty())
            .or_else(|| api.author.map(|u| u.login))
            .unwrap_or_else(|| "unknown".to_string());
        let is_merge = api.parents.len() > 1;
        Commit::from_message(api.sha, &api.commit.message, author).merge(is_merge)
    }
}

/// Pull request fields the checks read.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
}

/// One page of a compare response.
#[derive(Debug, Clone)]
pub struct ComparePage {
    pub commits: Vec<Commit>,
    /// Commits in the whole range, as reported by GitHub.
    pub total_commits: Option<usize>,
}

/// A file changed by a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct PullFile {
    pub filename: String,
    pub status: String,
    /// Unified diff hunk. Absent for binary or very large files.
    #[serde(default)]
    pub patch: Option<String>,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

impl PullFile {
    pub fn is_removed(&self) -> bool {
        self.status == "removed"
    }
}

/// Request body for `POST /repos/{repo}/check-runs`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckRunRequest {
    pub name: String,
    pub head_sha: String,
    pub status: &'static str,
    pub conclusion: String,
    pub completed_at: String,
    pub output: CheckRunOutput,
}

/// The `output` object of a check run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckRunOutput {
    pub title: String,
    pub summary: String,
    pub text: String,
}

/// Parse a JSON array of commits as returned by the pull request commits API.
pub fn parse_commit_list(url: &str, body: &str) -> Result<Vec<Commit>, RetrievalError> {
    let value = parse_json(url, body)?;
    if !value.is_array() {
        return Err(unexpected(url, "a JSON array of commits", body));
    }
    commits_from_value(url, value, body)
}

/// Parse the `commits` array and `total_commits` of a compare response.
pub fn parse_compare(url: &str, body: &str) -> Result<ComparePage, RetrievalError> {
    let mut value = parse_json(url, body)?;
    let total_commits = value
        .get("total_commits")
        .and_then(Value::as_u64)
        .map(|n| n as usize);
    match value.get_mut("commits").map(Value::take) {
        Some(commits @ Value::Array(_)) => Ok(ComparePage {
            commits: commits_from_value(url, commits, body)?,
            total_commits,
        }),
        _ => Err(unexpected(url, "an object with a 'commits' array", body)),
    }
}

/// Parse a JSON array of pull request files.
pub fn parse_pull_files(url: &str, body: &str) -> Result<Vec<PullFile>, RetrievalError> {
    let value = parse_json(url, body)?;
    if !value.is_array() {
        return Err(unexpected(url, "a JSON array of files", body));
    }
    serde_json::from_value(value)
        .map_err(|e| unexpected(url, &format!("file objects ({})", e), body))
}

/// Parse a pull request object.
pub fn parse_pull_request(url: &str, body: &str) -> Result<PullRequest, RetrievalError> {
    serde_json::from_str(body).map_err(|_| unexpected(url, "a pull request object", body))
}

fn parse_json(url: &str, body: &str) -> Result<Value, RetrievalError> {
    serde_json::from_str(body).map_err(|_| unexpected(url, "JSON", body))
}

fn commits_from_value(
    url: &str,
    value: Value,
    body: &str,
) -> Result<Vec<Commit>, RetrievalError> {
    let commits: Vec<ApiCommit> = serde_json::from_value(value)
        .map_err(|e| unexpected(url, &format!("commit objects ({})", e), body))?;
    Ok(commits.into_iter().map(Commit::from).collect())
}

fn unexpected(url: &str, expected: &str, body: &str) -> RetrievalError {
    RetrievalError::UnexpectedShape {
        url: url.to_string(),
        expected: expected.to_string(),
        payload: body.to_string(),
    }
}
