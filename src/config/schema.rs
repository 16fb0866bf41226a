// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration schema definitions.
//!
//! Defines all configuration structures that can be loaded from prcheck.toml.
//! Every option has a documented default; command-line flags and the
//! environment a GitHub workflow provides are layered on top.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default commit subject pattern (Conventional Commits with a capitalised
/// description).
pub const DEFAULT_COMMIT_PATTERN: &str =
    r"^(feat|fix|docs|style|refactor|test|chore|perf)(\(.+\))?: [A-Z].*";

/// Default PR title pattern.
pub const DEFAULT_TITLE_PATTERN: &str = r"^\[(Feature|Fix|Docs|Refactor|Test|Chore)\] .+";

/// The main configuration structure for prcheck.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PrCheckConfig {
    /// Commit message validation.
    pub commits: CommitsConfig,

    /// PR title/body validation.
    pub pr: PrConfig,

    /// LLM quality scoring.
    pub llm: LlmConfig,

    /// LLM code review of changed files.
    pub review: ReviewConfig,

    /// GitHub connection and pull request identity.
    pub github: GitHubConfig,

    /// Where rendered outcomes are delivered.
    pub output: OutputConfig,
}

impl PrCheckConfig {
    /// Load configuration from the default locations.
    pub fn load() -> crate::error::Result<Self> {
        super::loader::load_config()
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &std::path::Path) -> crate::error::Result<Self> {
        super::loader::load_config_from(path)
    }
}

/// Commit message validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitsConfig {
    /// Regex every commit subject must match.
    pub pattern: String,

    /// Report violations as a warning instead of failing the run.
    pub ignore_failures: bool,

    /// Base branch for the local source (`<base>..HEAD`).
    pub base_branch: String,

    /// Which commit source to use.
    pub source: SourceKind,

    /// Check merge commits as well. Off by default so the synthetic merge
    /// commit of a `refs/pull/N/merge` checkout is not validated.
    pub include_merges: bool,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_COMMIT_PATTERN.to_string(),
            ignore_failures: false,
            base_branch: "main".to_string(),
            source: SourceKind::Auto,
            include_merges: false,
        }
    }
}

/// Commit source selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// GitHub when a pull request number is known, local git otherwise.
    Auto,
    /// The local git repository.
    Local,
    /// The GitHub pull request commits API.
    Github,
}

/// PR title/body settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrConfig {
    /// Regex the PR title must match.
    pub title_pattern: String,

    /// Minimum length of the trimmed PR body.
    pub min_body_length: usize,

    /// Report violations as a warning instead of failing the run.
    pub ignore_failures: bool,
}

impl Default for PrConfig {
    fn default() -> Self {
        Self {
            title_pattern: DEFAULT_TITLE_PATTERN.to_string(),
            min_body_length: 50,
            ignore_failures: false,
        }
    }
}

/// LLM quality scoring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat completion model.
    pub model: String,

    /// Base URL of the OpenAI-compatible API.
    pub api_url: String,

    /// API key. Never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Minimum score (1-10) for a PR description to be acceptable.
    pub min_score: u8,

    /// Sampling temperature.
    pub temperature: f32,

    /// Report a low score as a warning instead of failing the run.
    pub ignore_failures: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            min_score: 6,
            temperature: 0.3,
            ignore_failures: false,
        }
    }
}

/// LLM code review settings. Model and API key come from `[llm]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// At most this many files are sent for review.
    pub max_files: usize,

    /// Post the result as a pull request review.
    pub post_review: bool,

    /// Report high-severity findings as a warning instead of failing the run.
    pub ignore_failures: bool,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_files: 20,
            post_review: true,
            ignore_failures: false,
        }
    }
}

/// GitHub connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST API base URL.
    pub api_url: String,

    /// Web base URL used for commit links.
    pub web_url: String,

    /// `owner/name` of the repository.
    pub repository: Option<String>,

    /// Access token. Never written back out.
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Head commit SHA for check runs.
    pub sha: Option<String>,

    /// Pull request number.
    pub pull_request: Option<u64>,

    /// Name shown for created check runs.
    pub check_name: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            web_url: "https://github.com".to_string(),
            repository: None,
            token: None,
            sha: None,
            pull_request: None,
            check_name: "PR Validation".to_string(),
            timeout_secs: 30,
        }
    }
}

impl GitHubConfig {
    /// Base URL for links to commits in the configured repository.
    pub fn commit_url_base(&self) -> Option<String> {
        self.repository.as_ref().map(|repo| {
            format!("{}/{}/commit", self.web_url.trim_end_matches('/'), repo)
        })
    }
}

/// Output delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Sinks every outcome is delivered to.
    pub sinks: Vec<SinkKind>,

    /// Step output file (`$GITHUB_OUTPUT`).
    pub output_file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sinks: vec![SinkKind::Console, SinkKind::StepOutput],
            output_file: None,
        }
    }
}

/// A report delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SinkKind {
    /// Terminal output.
    Console,
    /// Key/value pairs appended to `$GITHUB_OUTPUT`.
    StepOutput,
    /// A completed GitHub check run.
    CheckRun,
    /// A pull request comment.
    Comment,
}

impl SinkKind {
    /// Get the string representation of the sink.
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Console => "console",
            SinkKind::StepOutput => "step-output",
            SinkKind::CheckRun => "check-run",
            SinkKind::Comment => "comment",
        }
    }
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
