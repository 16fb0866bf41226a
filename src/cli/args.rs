// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! CLI argument definitions using clap.

use crate::config::{Overrides, SinkKind, SourceKind};
use crate::report::Conclusion;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// prcheck - Pull request hygiene checks for CI
///
/// Validates commit messages and PR descriptions, then reports the result
/// to the console, step outputs, check runs or PR comments.
#[derive(Parser, Debug)]
#[command(name = "prcheck")]
#[command(author = "Eshan Roy")]
#[command(version)]
#[command(about = "Pull request hygiene checks for CI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The check to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Console output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Output format for CI and scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text output (default)
    Text,
    /// JSON output for machine parsing
    Json,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate the commit messages of a branch or pull request
    Commits(CommitsArgs),

    /// Check the pull request title and description format
    Pr(PrArgs),

    /// Score the pull request description with an LLM
    Llm(LlmArgs),

    /// Review the pull request's changed files with an LLM
    Review(ReviewArgs),

    /// Publish a caller-supplied check result
    Report(ReportArgs),

    /// Initialize prcheck configuration
    Init(InitArgs),

    /// Print version information
    Version,
}

/// GitHub and delivery options shared by every check.
#[derive(Args, Debug, Default, Clone)]
pub struct GitHubArgs {
    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository in owner/name form (also read from REPO_FULL_NAME)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Head commit SHA for check runs
    #[arg(long, env = "GITHUB_SHA")]
    pub sha: Option<String>,

    /// Pull request number
    #[arg(long = "pr", env = "PR_NUMBER")]
    pub pull_request: Option<u64>,

    /// Check run name
    #[arg(long, env = "CHECK_NAME")]
    pub check_name: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Step output file
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// Where to deliver the result (repeatable)
    #[arg(long = "sink", value_enum)]
    pub sinks: Vec<SinkKind>,
}

impl GitHubArgs {
    /// Overrides for the shared options.
    pub fn overrides(&self) -> Overrides {
        let repository = self
            .repository
            .clone()
            .or_else(|| std::env::var("REPO_FULL_NAME").ok().filter(|r| !r.is_empty()));

        Overrides {
            repository,
            token: self.token.clone(),
            sha: self.sha.clone(),
            pull_request: self.pull_request,
            check_name: self.check_name.clone(),
            api_url: self.api_url.clone(),
            sinks: self.sinks.clone(),
            output_file: self.output_file.clone(),
            ..Default::default()
        }
    }
}

/// Arguments for the commits command.
#[derive(Parser, Debug, Clone)]
pub struct CommitsArgs {
    /// Regular expression every commit subject must match
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Base branch for local branch checks
    #[arg(short, long, env = "GITHUB_BASE_REF")]
    pub base: Option<String>,

    /// Where to read commits from
    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,

    /// Report failures without failing the run
    #[arg(long)]
    pub ignore_failures: bool,

    /// Validate merge commits too
    #[arg(long)]
    pub include_merges: bool,

    /// Path to the local repository
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    #[command(flatten)]
    pub github: GitHubArgs,
}

impl CommitsArgs {
    pub fn to_overrides(&self) -> Overrides {
        Overrides {
            commit_pattern: self.pattern.clone(),
            base_branch: self.base.clone(),
            source: self.source,
            ignore_failures: self.ignore_failures,
            include_merges: self.include_merges,
            ..self.github.overrides()
        }
    }
}

/// Arguments for the pr command.
#[derive(Parser, Debug, Clone)]
pub struct PrArgs {
    /// PR title (fetched from GitHub when omitted)
    #[arg(long)]
    pub title: Option<String>,

    /// PR description (fetched from GitHub when omitted)
    #[arg(long)]
    pub body: Option<String>,

    /// Regular expression the PR title must match
    #[arg(long)]
    pub title_pattern: Option<String>,

    /// Report failures without failing the run
    #[arg(long)]
    pub ignore_failures: bool,

    #[command(flatten)]
    pub github: GitHubArgs,
}

impl PrArgs {
    pub fn to_overrides(&self) -> Overrides {
        Overrides {
            title_pattern: self.title_pattern.clone(),
            ignore_failures: self.ignore_failures,
            ..self.github.overrides()
        }
    }
}

/// Arguments for the llm command.
#[derive(Parser, Debug, Clone)]
pub struct LlmArgs {
    /// PR title (fetched from GitHub when omitted)
    #[arg(long)]
    pub title: Option<String>,

    /// PR description (fetched from GitHub when omitted)
    #[arg(long)]
    pub body: Option<String>,

    /// Chat completion model
    #[arg(long, env = "MODEL_NAME")]
    pub model: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Report failures without failing the run
    #[arg(long)]
    pub ignore_failures: bool,

    #[command(flatten)]
    pub github: GitHubArgs,
}

impl LlmArgs {
    pub fn to_overrides(&self) -> Overrides {
        Overrides {
            llm_model: self.model.clone(),
            llm_api_key: self.api_key.clone(),
            ignore_failures: self.ignore_failures,
            ..self.github.overrides()
        }
    }
}

/// Arguments for the review command.
#[derive(Parser, Debug, Clone)]
pub struct ReviewArgs {
    /// Chat completion model
    #[arg(long, env = "MODEL_NAME")]
    pub model: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Review at most this many files
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Do not post the result as a pull request review
    #[arg(long)]
    pub no_post: bool,

    /// Report high-severity findings without failing the run
    #[arg(long)]
    pub ignore_failures: bool,

    #[command(flatten)]
    pub github: GitHubArgs,
}

impl ReviewArgs {
    pub fn to_overrides(&self) -> Overrides {
        Overrides {
            llm_model: self.model.clone(),
            llm_api_key: self.api_key.clone(),
            review_max_files: self.max_files,
            ignore_failures: self.ignore_failures,
            ..self.github.overrides()
        }
    }
}

/// Arguments for the report command.
#[derive(Parser, Debug, Clone)]
pub struct ReportArgs {
    /// Check title
    #[arg(long, default_value = "Validation check")]
    pub title: String,

    /// Check summary
    #[arg(long, default_value = "A validation check was run.")]
    pub summary: String,

    /// Check details (Markdown)
    #[arg(long, default_value = "No details available.")]
    pub text: String,

    /// Check conclusion
    #[arg(long, value_enum, default_value_t = Conclusion::Neutral)]
    pub conclusion: Conclusion,

    /// Step output key prefix
    #[arg(long, default_value = "report")]
    pub key: String,

    #[command(flatten)]
    pub github: GitHubArgs,
}

impl ReportArgs {
    /// Overrides for the report command.
    ///
    /// Without an explicit `--sink` the result goes to a check run.
    pub fn to_overrides(&self) -> Overrides {
        let mut overrides = self.github.overrides();
        if overrides.sinks.is_empty() {
            overrides.sinks = vec![SinkKind::CheckRun];
        }
        overrides
    }
}

/// Arguments for the init command.
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_commits() {
        let args = Cli::parse_from([
            "prcheck",
            "commits",
            "--base",
            "develop",
            "--pattern",
            "^feat: .+",
            "--ignore-failures",
            "--include-merges",
            "--sink",
            "console",
            "--sink",
            "check-run",
        ]);
        if let Commands::Commits(commits) = args.command {
            let overrides = commits.to_overrides();
            assert_eq!(overrides.base_branch.as_deref(), Some("develop"));
            assert_eq!(overrides.commit_pattern.as_deref(), Some("^feat: .+"));
            assert!(overrides.ignore_failures);
            assert!(overrides.include_merges);
            assert_eq!(overrides.sinks, vec![SinkKind::Console, SinkKind::CheckRun]);
        } else {
            panic!("Expected Commits command");
        }
    }

    #[test]
    fn test_parse_pr() {
        let args = Cli::parse_from(["prcheck", "pr", "--title", "[Fix] Typo", "--pr", "42"]);
        if let Commands::Pr(pr) = args.command {
            assert_eq!(pr.title.as_deref(), Some("[Fix] Typo"));
            assert_eq!(pr.to_overrides().pull_request, Some(42));
        } else {
            panic!("Expected Pr command");
        }
    }

    #[test]
    fn test_parse_review() {
        let args = Cli::parse_from([
            "prcheck",
            "review",
            "--pr",
            "9",
            "--max-files",
            "5",
            "--no-post",
        ]);
        if let Commands::Review(review) = args.command {
            assert!(review.no_post);
            let overrides = review.to_overrides();
            assert_eq!(overrides.pull_request, Some(9));
            assert_eq!(overrides.review_max_files, Some(5));
        } else {
            panic!("Expected Review command");
        }
    }

    #[test]
    fn test_report_defaults_to_check_run() {
        let args = Cli::parse_from(["prcheck", "report", "--conclusion", "timed_out"]);
        if let Commands::Report(report) = args.command {
            assert_eq!(report.conclusion, Conclusion::TimedOut);
            assert_eq!(report.title, "Validation check");
            assert_eq!(report.to_overrides().sinks, vec![SinkKind::CheckRun]);
        } else {
            panic!("Expected Report command");
        }
    }

    #[test]
    fn test_global_flags() {
        let args = Cli::parse_from(["prcheck", "version", "--debug", "--format", "json"]);
        assert!(args.debug);
        assert_eq!(args.format, OutputFormat::Json);
        assert!(matches!(args.command, Commands::Version));
    }

    #[test]
    fn test_invalid_sink_rejected() {
        assert!(Cli::try_parse_from(["prcheck", "commits", "--sink", "email"]).is_err());
    }
}
