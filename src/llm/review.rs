// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Per-file LLM code review of a pull request's changes.

use crate::error::LlmError;
use crate::github::PullFile;
use crate::report::markdown::{code_span, escape_inline};
use crate::report::CheckOutcome;
use crate::rules::Verdict;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write;

use super::client::CodeReviewer;

/// Step output key prefix for code reviews.
pub const REVIEW_CHECK_KEY: &str = "code_review";

/// Patches longer than this many characters are cut before prompting.
const PATCH_LIMIT: usize = 12_000;

/// Category of a review finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Bug,
    Performance,
    Security,
    Style,
    BestPractice,
    #[serde(other)]
    Other,
}

impl IssueKind {
    fn emoji(&self) -> &'static str {
        match self {
            IssueKind::Bug => "🐛",
            IssueKind::Performance => "⚡",
            IssueKind::Security => "🔒",
            IssueKind::Style => "💅",
            IssueKind::BestPractice => "✨",
            IssueKind::Other => "❓",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            IssueKind::Bug => "Bug",
            IssueKind::Performance => "Performance",
            IssueKind::Security => "Security",
            IssueKind::Style => "Style",
            IssueKind::BestPractice => "Best practice",
            IssueKind::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

impl Severity {
    fn emoji(&self) -> &'static str {
        match self {
            Severity::High => "🔴",
            Severity::Medium => "🟡",
            Severity::Low => "🟢",
            Severity::Unknown => "❓",
        }
    }
}

/// One finding reported by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub suggestion: String,
    /// A number, a string such as `"12-14"`, or absent.
    #[serde(default)]
    pub line_number: Option<Value>,
}

impl ReviewIssue {
    fn location(&self) -> Option<String> {
        match &self.line_number {
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }
}

/// The model's review of a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReview {
    pub score: u8,
    #[serde(default)]
    pub issues: Vec<ReviewIssue>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub positive_aspects: Vec<String>,
}

impl FileReview {
    /// Parse the JSON object the model was asked to return.
    pub fn parse(content: &str) -> Result<Self, LlmError> {
        let review: Self = serde_json::from_str(content.trim())?;
        if !(1..=10).contains(&review.score) {
            return Err(LlmError::InvalidResponse(format!(
                "score {} is outside 1..=10",
                review.score
            )));
        }
        Ok(review)
    }

    pub fn high_severity(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::High)
            .count()
    }
}

/// Build the review prompt for one file's patch.
pub fn review_prompt(filename: &str, patch: &str) -> String {
    let patch = cut_patch(patch);
    format!(
        "You are an expert code reviewer. Review the following change to the file {filename}.

Diff:
{patch}

Analyze it for:
1. Code quality: readability, complexity and maintainability
2. Potential problems: bugs, performance issues or security vulnerabilities
3. Best practices: whether the change follows good programming practice
4. Improvements: concrete suggestions

Respond with a JSON object containing:
{{
  \"score\": [1-10 integer score],
  \"issues\": [
    {{
      \"type\": \"bug\" | \"performance\" | \"security\" | \"style\" | \"best_practice\",
      \"severity\": \"high\" | \"medium\" | \"low\",
      \"description\": \"what is wrong\",
      \"suggestion\": \"how to fix it\",
      \"line_number\": \"related line number, if any\"
    }}
  ],
  \"summary\": \"overall assessment\",
  \"positive_aspects\": [array of things done well]
}}
"
    )
}

fn cut_patch(patch: &str) -> String {
    match patch.char_indices().nth(PATCH_LIMIT) {
        Some((end, _)) => format!("{}\n... (diff truncated)", &patch[..end]),
        None => patch.to_string(),
    }
}

/// Review result for one file. A failed model call keeps its error text.
#[derive(Debug, Clone)]
pub struct ReviewedFile {
    pub filename: String,
    pub result: Result<FileReview, String>,
}

/// Reviews of every file that was sent to the model.
#[derive(Debug, Clone, Default)]
pub struct CodeReviewReport {
    pub files: Vec<ReviewedFile>,
    /// Files not sent: removed, binary, without a patch, or over the limit.
    pub skipped: Vec<String>,
}

impl CodeReviewReport {
    fn reviews(&self) -> impl Iterator<Item = &FileReview> {
        self.files.iter().filter_map(|f| f.result.as_ref().ok())
    }

    pub fn reviewed_count(&self) -> usize {
        self.reviews().count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.len() - self.reviewed_count()
    }

    pub fn total_issues(&self) -> usize {
        self.reviews().map(|r| r.issues.len()).sum()
    }

    pub fn high_severity(&self) -> usize {
        self.reviews().map(FileReview::high_severity).sum()
    }

    /// Whether no file was sent for review.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Review up to `max_files` changed files.
///
/// A failed review of one file is recorded and the rest continue. When every
/// attempted file fails, the last error is returned.
pub fn review_files(
    reviewer: &dyn CodeReviewer,
    files: &[PullFile],
    max_files: usize,
) -> Result<CodeReviewReport, LlmError> {
    let mut report = CodeReviewReport::default();
    let mut last_error = None;

    for file in files {
        let patch = match file.patch.as_deref() {
            Some(patch) if !file.is_removed() && !patch.is_empty() => patch,
            _ => {
                tracing::debug!("Skipping {} ({})", file.filename, file.status);
                report.skipped.push(file.filename.clone());
                continue;
            }
        };
        if report.files.len() >= max_files {
            tracing::debug!(
                "Review limit of {} files reached; skipping {}",
                max_files,
                file.filename
            );
            report.skipped.push(file.filename.clone());
            continue;
        }

        tracing::info!("Reviewing {}", file.filename);
        let result = match reviewer.review_file(&file.filename, patch) {
            Ok(review) => Ok(review),
            Err(e) => {
                tracing::warn!("Review of {} failed: {}", file.filename, e);
                let message = e.to_string();
                last_error = Some(e);
                Err(message)
            }
        };
        report.files.push(ReviewedFile {
            filename: file.filename.clone(),
            result,
        });
    }

    if let Some(err) = last_error {
        if report.reviewed_count() == 0 {
            return Err(err);
        }
    }
    Ok(report)
}

fn score_emoji(score: u8) -> &'static str {
    match score {
        1..=3 => "🚨",
        4..=5 => "⚠️",
        6..=7 => "👍",
        _ => "✅",
    }
}

fn render_file(out: &mut String, file: &ReviewedFile) {
    let review = match &file.result {
        Ok(review) => review,
        Err(message) => {
            let _ = writeln!(out, "### {}\n", code_span(&file.filename));
            let _ = writeln!(out, "⚠️ Review failed: {}\n", code_span(message));
            return;
        }
    };

    let _ = writeln!(
        out,
        "### {} {} - {}/10\n",
        score_emoji(review.score),
        code_span(&file.filename),
        review.score
    );
    if !review.summary.is_empty() {
        let _ = writeln!(out, "{}\n", escape_inline(&review.summary));
    }

    if !review.positive_aspects.is_empty() {
        out.push_str("**Positive aspects** 👏\n\n");
        for aspect in &review.positive_aspects {
            let _ = writeln!(out, "- {}", escape_inline(aspect));
        }
        out.push('\n');
    }

    if review.issues.is_empty() {
        out.push_str("No significant issues found.\n\n");
        return;
    }
    for issue in &review.issues {
        let _ = write!(
            out,
            "#### {} {} {}",
            issue.kind.emoji(),
            issue.severity.emoji(),
            issue.kind.label()
        );
        match issue.location() {
            Some(line) => {
                let _ = writeln!(out, " (line {})\n", escape_inline(&line));
            }
            None => out.push_str("\n\n"),
        }
        let _ = writeln!(out, "- **Description:** {}", escape_inline(&issue.description));
        let _ = writeln!(out, "- **Suggestion:** {}\n", escape_inline(&issue.suggestion));
    }
}

/// Render a review report as Markdown. File names and model text are escaped.
pub fn render(report: &CodeReviewReport) -> String {
    let mut out = String::new();
    out.push_str("## 🔍 Code review\n\n");
    let _ = writeln!(
        out,
        "- Files reviewed: {}\n- Issues found: {}\n- High severity: {}\n",
        report.reviewed_count(),
        report.total_issues(),
        report.high_severity()
    );

    if report.high_severity() > 0 {
        out.push_str("⚠️ High-severity issues were found. Please resolve them before merging.\n\n");
    } else if !report.is_empty() {
        out.push_str("✅ No high-severity issues were found.\n\n");
    }

    for file in &report.files {
        render_file(&mut out, file);
    }

    if !report.skipped.is_empty() {
        let names: Vec<String> = report.skipped.iter().map(|f| code_span(f)).collect();
        let _ = writeln!(out, "Not reviewed: {}\n", names.join(", "));
    }

    out.push_str("---\n*This review was generated by an AI model and is advisory only.*\n");
    out
}

/// Render a review report into a deliverable outcome for a verdict.
pub fn outcome(report: &CodeReviewReport, verdict: Verdict) -> CheckOutcome {
    let mut text = String::new();
    if verdict == Verdict::Warned {
        text.push_str(
            "> **Warning:** high-severity findings are ignored by configuration; \
             this check does not block the pull request.\n\n",
        );
    }
    text.push_str(&render(report));

    let counts = format!(
        "{} reviewed, {} issues, {} high severity.",
        crate::report::plural(report.reviewed_count(), "file"),
        report.total_issues(),
        report.high_severity()
    );
    let (title, summary) = match verdict {
        Verdict::Neutral => (
            "No files to review".to_string(),
            "The pull request has no reviewable changes.".to_string(),
        ),
        Verdict::Passed => ("Code review passed".to_string(), counts),
        Verdict::Warned => (
            "Code review found high-severity issues (ignored)".to_string(),
            format!("{} Failures are ignored.", counts),
        ),
        Verdict::Failed => ("Code review found high-severity issues".to_string(), counts),
    };

    CheckOutcome::new(REVIEW_CHECK_KEY, title, summary, text, verdict.conclusion())
        .with_attention(verdict.needs_attention())
}
