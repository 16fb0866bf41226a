// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Blocking GitHub REST API client.

use crate::commit::Commit;
use crate::config::GitHubConfig;
use crate::error::{ConfigError, PrCheckError, PublishError, Result, RetrievalError};
use reqwest::blocking::{Client, ClientBuilder, RequestBuilder, Response};
use std::time::Duration;

use super::models::{
    parse_commit_list, parse_compare, parse_pull_files, parse_pull_request, CheckRunRequest,
    PullFile, PullRequest,
};

const PER_PAGE: usize = 100;
const API_VERSION: &str = "2022-11-28";

/// Client for the handful of GitHub endpoints prcheck uses.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: String,
    repository: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client for the configured repository.
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        Self::with_builder(config, Client::builder())
    }

    pub(super) fn with_builder(config: &GitHubConfig, builder: ClientBuilder) -> Result<Self> {
        let repository = config.repository.clone().ok_or_else(|| {
            PrCheckError::Config(ConfigError::MissingRequired {
                key: "github.repository (GITHUB_REPOSITORY)".to_string(),
            })
        })?;

        if config.token.is_none() {
            tracing::warn!("No GitHub token configured; requests are unauthenticated");
        }

        let http = builder
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("prcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                PrCheckError::Retrieval(RetrievalError::Transport {
                    url: config.api_url.clone(),
                    message: e.to_string(),
                })
            })?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            repository,
            token: config.token.clone(),
        })
    }

    /// Get the `owner/name` this client talks to.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.api_url, self.repository, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a GET and return the body of a successful response.
    fn get_text(&self, url: &str) -> std::result::Result<String, RetrievalError> {
        tracing::debug!("GET {}", url);
        let response = self
            .authorize(self.http.get(url))
            .send()
            .map_err(|e| transport(url, e))?;
        read_success(url, response)
    }

    fn page_url(&self, path: &str, page: usize) -> String {
        format!(
            "{}?per_page={}&page={}",
            self.repo_url(path),
            PER_PAGE,
            page
        )
    }

    /// Collect every page of a list endpoint, stopping at the first short page.
    fn get_all<T>(
        &self,
        path: &str,
        parse: fn(&str, &str) -> std::result::Result<Vec<T>, RetrievalError>,
    ) -> std::result::Result<Vec<T>, RetrievalError> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let url = self.page_url(path, page);
            let batch = parse(&url, &self.get_text(&url)?)?;
            let len = batch.len();
            items.extend(batch);

            if len < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// List the commits of a pull request, following pagination.
    pub fn list_pull_commits(
        &self,
        number: u64,
    ) -> std::result::Result<Vec<Commit>, RetrievalError> {
        self.get_all(&format!("pulls/{}/commits", number), parse_commit_list)
    }

    /// List the files changed by a pull request, following pagination.
    pub fn list_pull_files(
        &self,
        number: u64,
    ) -> std::result::Result<Vec<PullFile>, RetrievalError> {
        self.get_all(&format!("pulls/{}/files", number), parse_pull_files)
    }

    /// List the commits in `base...head`, following pagination.
    ///
    /// Paging stops on a short page or once `total_commits` is reached.
    pub fn compare_commits(
        &self,
        base: &str,
        head: &str,
    ) -> std::result::Result<Vec<Commit>, RetrievalError> {
        let path = format!("compare/{}...{}", base, head);
        let mut commits = Vec::new();
        let mut total = None;
        let mut page = 1;

        loop {
            let url = self.page_url(&path, page);
            let batch = parse_compare(&url, &self.get_text(&url)?)?;
            let len = batch.commits.len();
            total = batch.total_commits.or(total);
            commits.extend(batch.commits);

            let complete = total.is_some_and(|t| commits.len() >= t);
            if len < PER_PAGE || complete {
                break;
            }
            page += 1;
        }

        if let Some(total) = total {
            if commits.len() < total {
                tracing::warn!(
                    "Compare {} returned {} of {} commits; the rest are not checked",
                    path,
                    commits.len(),
                    total
                );
            }
        }

        Ok(commits)
    }

    /// Fetch a pull request's title and body.
    pub fn get_pull_request(
        &self,
        number: u64,
    ) -> std::result::Result<PullRequest, RetrievalError> {
        let url = self.repo_url(&format!("pulls/{}", number));
        parse_pull_request(&url, &self.get_text(&url)?)
    }

    /// Create a completed check run.
    pub fn create_check_run(
        &self,
        request: &CheckRunRequest,
    ) -> std::result::Result<(), PublishError> {
        let url = self.repo_url("check-runs");
        self.post("check-run", &url, request)
    }

    /// Post a comment on a pull request.
    pub fn create_issue_comment(
        &self,
        number: u64,
        body: &str,
    ) -> std::result::Result<(), PublishError> {
        let url = self.repo_url(&format!("issues/{}/comments", number));
        self.post("comment", &url, &serde_json::json!({ "body": body }))
    }

    /// Submit a `COMMENT` review on a pull request.
    pub fn create_pull_review(
        &self,
        number: u64,
        body: &str,
    ) -> std::result::Result<(), PublishError> {
        let url = self.repo_url(&format!("pulls/{}/reviews", number));
        self.post(
            "review",
            &url,
            &serde_json::json!({ "body": body, "event": "COMMENT" }),
        )
    }

    fn post<T: serde::Serialize + ?Sized>(
        &self,
        sink: &str,
        url: &str,
        payload: &T,
    ) -> std::result::Result<(), PublishError> {
        tracing::debug!("POST {}", url);
        let response = self
            .authorize(self.http.post(url))
            .json(payload)
            .send()
            .map_err(|e| PublishError::Failed {
                sink: sink.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        Err(PublishError::Rejected {
            sink: sink.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

fn read_success(url: &str, response: Response) -> std::result::Result<String, RetrievalError> {
    let status = response.status().as_u16();
    let body = response.text().map_err(|e| transport(url, e))?;

    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(classify_status(url, status, body))
    }
}

/// Map a non-success HTTP status to a retrieval error.
pub fn classify_status(url: &str, status: u16, body: String) -> RetrievalError {
    match status {
        401 | 403 => RetrievalError::Unauthorized {
            url: url.to_string(),
            status,
            body,
        },
        404 => RetrievalError::NotFound {
            url: url.to_string(),
            body,
        },
        _ => RetrievalError::Http {
            url: url.to_string(),
            status,
            body,
        },
    }
}

fn transport(url: &str, err: reqwest::Error) -> RetrievalError {
    RetrievalError::Transport {
        url: url.to_string(),
        message: err.to_string(),
    }
}
