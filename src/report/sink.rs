// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Delivery of rendered outcomes.

use crate::cli::args::OutputFormat;
use crate::config::{PrCheckConfig, SinkKind};
use crate::error::PublishError;
use crate::github::{CheckRunOutput, CheckRunRequest, GitHubClient};
use chrono::{SecondsFormat, Utc};
use console::style;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use super::outcome::{CheckOutcome, Conclusion};

/// GitHub rejects check run text and review bodies longer than this.
pub const GITHUB_TEXT_LIMIT: usize = 65_535;

/// A destination for rendered outcomes.
pub trait ReportSink {
    /// Sink name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Deliver an outcome.
    fn publish(&self, outcome: &CheckOutcome) -> Result<(), PublishError>;
}

/// Prints outcomes to stdout.
pub struct ConsoleSink {
    format: OutputFormat,
}

impl ConsoleSink {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl ReportSink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    fn publish(&self, outcome: &CheckOutcome) -> Result<(), PublishError> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(outcome).map_err(|e| {
                    PublishError::Failed {
                        sink: self.name().to_string(),
                        message: e.to_string(),
                    }
                })?;
                println!("{}", json);
            }
            OutputFormat::Text => {
                let status = match (outcome.conclusion, outcome.needs_attention) {
                    (Conclusion::Failure, _) => style("✗").red().bold(),
                    (_, true) => style("⚠").yellow().bold(),
                    (Conclusion::Success, false) => style("✓").green().bold(),
                    _ => style("•").dim(),
                };
                println!("{} {}", status, style(&outcome.title).bold());
                println!("  {}", style(&outcome.summary).dim());
                println!();
                println!("{}", outcome.text);
            }
        }
        Ok(())
    }
}

/// Appends `<key>_title`, `<key>_summary`, `<key>_text` and
/// `<key>_conclusion` to the `$GITHUB_OUTPUT` file.
///
/// The conclusion is always `success` or `failure`.
pub struct StepOutputSink {
    path: PathBuf,
}

impl StepOutputSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for StepOutputSink {
    fn name(&self) -> &'static str {
        "step-output"
    }

    fn publish(&self, outcome: &CheckOutcome) -> Result<(), PublishError> {
        let mut content = String::new();
        for (suffix, value) in [
            ("title", outcome.title.as_str()),
            ("summary", outcome.summary.as_str()),
            ("text", outcome.text.as_str()),
            ("conclusion", outcome.conclusion.step_output_value()),
        ] {
            content.push_str(&step_output_entry(
                &format!("{}_{}", outcome.key, suffix),
                value,
            ));
        }

        let failed = |e: std::io::Error| PublishError::Failed {
            sink: self.name().to_string(),
            message: format!("{}: {}", self.path.display(), e),
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(failed)?;
        file.write_all(content.as_bytes()).map_err(failed)?;
        Ok(())
    }
}

/// Format one `name<<DELIMITER` step output entry.
///
/// The delimiter is chosen so it never occurs inside the value.
pub fn step_output_entry(name: &str, value: &str) -> String {
    let mut delimiter = "PRCHECK_EOF".to_string();
    let mut attempt = 0;
    while value.contains(&delimiter) {
        attempt += 1;
        delimiter = format!("PRCHECK_EOF_{}", attempt);
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Creates a completed check run on the head commit.
pub struct CheckRunSink {
    client: GitHubClient,
    check_name: String,
    head_sha: String,
}

impl CheckRunSink {
    pub fn new(client: GitHubClient, check_name: String, head_sha: String) -> Self {
        Self {
            client,
            check_name,
            head_sha,
        }
    }

    /// Build the API request for an outcome.
    pub fn request(&self, outcome: &CheckOutcome) -> CheckRunRequest {
        CheckRunRequest {
            name: self.check_name.clone(),
            head_sha: self.head_sha.clone(),
            status: "completed",
            conclusion: outcome.conclusion.as_str().to_string(),
            completed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            output: CheckRunOutput {
                title: outcome.title.clone(),
                summary: outcome.summary.clone(),
                text: truncate_text(&outcome.text, GITHUB_TEXT_LIMIT),
            },
        }
    }
}

impl ReportSink for CheckRunSink {
    fn name(&self) -> &'static str {
        "check-run"
    }

    fn publish(&self, outcome: &CheckOutcome) -> Result<(), PublishError> {
        self.client.create_check_run(&self.request(outcome))
    }
}

/// Posts the outcome text as a pull request comment.
///
/// Only outcomes that need attention are posted.
pub struct CommentSink {
    client: GitHubClient,
    pull_request: u64,
}

impl CommentSink {
    pub fn new(client: GitHubClient, pull_request: u64) -> Self {
        Self {
            client,
            pull_request,
        }
    }
}

impl ReportSink for CommentSink {
    fn name(&self) -> &'static str {
        "comment"
    }

    fn publish(&self, outcome: &CheckOutcome) -> Result<(), PublishError> {
        if !outcome.needs_attention {
            tracing::debug!("Outcome '{}' needs no comment", outcome.title);
            return Ok(());
        }
        self.client
            .create_issue_comment(self.pull_request, &outcome.text)
    }
}

/// Truncate to at most `limit` bytes on a character boundary.
pub fn truncate_text(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    const MARKER: &str = "\n\n…(truncated)";
    let mut end = limit.saturating_sub(MARKER.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &text[..end], MARKER)
}

fn warn_missing(kind: SinkKind, key: &str) -> PublishError {
    let error = PublishError::MissingSetting {
        sink: kind.to_string(),
        key: key.to_string(),
    };
    tracing::warn!("Skipping sink: {}", error);
    error
}

/// Fans an outcome out to every configured sink.
pub struct Publisher {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl Publisher {
    /// Create a publisher over explicit sinks.
    pub fn new(sinks: Vec<Box<dyn ReportSink>>) -> Self {
        Self { sinks }
    }

    /// Build the sinks named in configuration.
    ///
    /// Sinks whose required settings are missing are skipped with a warning.
    pub fn from_config(config: &PrCheckConfig, format: OutputFormat) -> Self {
        let mut sinks: Vec<Box<dyn ReportSink>> = Vec::new();
        let needs_github = config
            .output
            .sinks
            .iter()
            .any(|s| matches!(s, SinkKind::CheckRun | SinkKind::Comment));
        let client = if needs_github {
            match GitHubClient::new(&config.github) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!("GitHub sinks disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        for kind in &config.output.sinks {
            match kind {
                SinkKind::Console => sinks.push(Box::new(ConsoleSink::new(format))),
                SinkKind::StepOutput => match &config.output.output_file {
                    Some(path) => sinks.push(Box::new(StepOutputSink::new(path))),
                    None => tracing::debug!("No step output file (GITHUB_OUTPUT); skipping"),
                },
                SinkKind::CheckRun => match (&client, &config.github.sha) {
                    (Some(client), Some(sha)) => sinks.push(Box::new(CheckRunSink::new(
                        client.clone(),
                        config.github.check_name.clone(),
                        sha.clone(),
                    ))),
                    (_, None) => {
                        warn_missing(*kind, "github.sha (GITHUB_SHA)");
                    }
                    _ => {}
                },
                SinkKind::Comment => match (&client, config.github.pull_request) {
                    (Some(client), Some(number)) => {
                        sinks.push(Box::new(CommentSink::new(client.clone(), number)))
                    }
                    (_, None) => {
                        warn_missing(*kind, "github.pull_request (PR_NUMBER)");
                    }
                    _ => {}
                },
            }
        }

        Self { sinks }
    }

    /// Number of active sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sink is active.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Deliver to every sink, returning how many succeeded.
    ///
    /// Failures are logged and do not stop delivery to the remaining sinks.
    pub fn publish(&self, outcome: &CheckOutcome) -> usize {
        let mut delivered = 0;
        for sink in &self.sinks {
            match sink.publish(outcome) {
                Ok(()) => {
                    tracing::debug!("Delivered '{}' to {}", outcome.title, sink.name());
                    delivered += 1;
                }
                Err(e) => tracing::warn!("Could not deliver to {}: {}", sink.name(), e),
            }
        }
        delivered
    }
}
