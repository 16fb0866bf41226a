// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! PR title and body format checks.

use crate::config::{compile_pattern, PrConfig};
use crate::error::Result;
use crate::report::markdown::{code_block, code_span};
use crate::report::CheckOutcome;
use crate::rules::Verdict;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Any Markdown heading followed by a word.
    static ref HEADING_REGEX: Regex = Regex::new(r"#+\s+\w+").unwrap();
}

/// Step output key prefix for PR format checks.
pub const PR_CHECK_KEY: &str = "pr_check";

const TITLE_EXAMPLES: &[&str] = &[
    "[Feature] Add user authentication",
    "[Fix] Resolve memory leak in data processor",
    "[Docs] Update API documentation",
    "[Refactor] Restructure user management module",
    "[Test] Add integration tests",
    "[Chore] Bump dependency versions",
];

const BODY_TEMPLATE: &str = "## Changes\nWhat this PR changes\n\n\
## Motivation\nWhy the change is needed\n\n\
## Testing\nHow the change was tested\n\n\
## Related issues\nLinked issues or documents";

/// Result of checking a PR's title and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrFormatReport {
    pub title: String,
    pub title_valid: bool,
    /// Character count of the trimmed body.
    pub body_length: usize,
    pub body_valid: bool,
    /// True when the body has no Markdown heading.
    pub missing_sections: bool,
}

impl PrFormatReport {
    /// Whether title and body both passed.
    pub fn passed(&self) -> bool {
        self.title_valid && self.body_valid
    }

    /// Number of failed checks (title, body).
    pub fn failure_count(&self) -> usize {
        usize::from(!self.title_valid) + usize::from(!self.body_valid)
    }
}

/// Checks PR titles and bodies against configured rules.
#[derive(Debug, Clone)]
pub struct PrFormatChecker {
    title_pattern: Regex,
    min_body_length: usize,
}

impl PrFormatChecker {
    /// Build a checker from configuration.
    pub fn new(config: &PrConfig) -> Result<Self> {
        Ok(Self {
            title_pattern: compile_pattern("pr.title_pattern", &config.title_pattern)?,
            min_body_length: config.min_body_length,
        })
    }

    /// Check a title and body.
    pub fn check(&self, title: &str, body: &str) -> PrFormatReport {
        let trimmed = body.trim();
        let body_length = trimmed.chars().count();
        let body_valid = body_length >= self.min_body_length;

        PrFormatReport {
            title: title.to_string(),
            title_valid: self.title_pattern.is_match(title),
            body_length,
            body_valid,
            missing_sections: body_valid && !HEADING_REGEX.is_match(trimmed),
        }
    }

    /// Render the Markdown report text.
    pub fn render(&self, report: &PrFormatReport) -> String {
        let mut sections = Vec::new();

        if report.passed() {
            sections.push(
                "## ✅ PR format check passed\n\n\
                 - Title format is correct\n\
                 - Description is sufficient"
                    .to_string(),
            );
        }

        if !report.title_valid {
            let examples = TITLE_EXAMPLES
                .iter()
                .map(|e| format!("- `{}`", e))
                .collect::<Vec<_>>()
                .join("\n");
            sections.push(format!(
                "## ❌ PR title format error\n\n\
                 The PR title {} does not match the required format:\n\n{}\n\n\
                 ### Valid titles\n\n{}\n\n\
                 ### How to fix\n\n\
                 1. Click **Edit** next to the PR title\n\
                 2. Change the title to match the format above\n\
                 3. Click **Save**",
                code_span(&report.title),
                code_block(self.title_pattern.as_str(), "text"),
                examples
            ));
        }

        if !report.body_valid {
            sections.push(format!(
                "## ❌ PR description error\n\n\
                 The PR description is empty or too short ({} of at least {} characters). \
                 Please include these sections:\n\n{}\n\n\
                 ### How to fix\n\n\
                 1. Click **Edit** on the PR description\n\
                 2. Add the sections above\n\
                 3. Fill in each section\n\
                 4. Click **Update comment**\n\n\
                 A good description helps reviewers understand the change and speeds up review.",
                report.body_length,
                self.min_body_length,
                code_block(BODY_TEMPLATE, "markdown")
            ));
        }

        if report.missing_sections {
            sections.push(format!(
                "## ⚠️ PR description suggestion\n\n\
                 The description has no Markdown headings. Structuring it makes review easier:\n\n{}",
                code_block(BODY_TEMPLATE, "markdown")
            ));
        }

        let mut text = sections.join("\n\n");
        text.push('\n');
        text
    }

    /// Render the report into a deliverable outcome for a verdict.
    pub fn outcome(&self, report: &PrFormatReport, verdict: Verdict) -> CheckOutcome {
        let mut text = String::new();
        if verdict == Verdict::Warned {
            text.push_str(
                "> **Warning:** PR format failures are ignored by configuration; \
                 this check does not block the pull request.\n\n",
            );
        }
        text.push_str(&self.render(report));

        let (title, summary) = match verdict {
            Verdict::Passed | Verdict::Neutral => (
                "PR format check passed",
                "The PR title and description are correctly formatted.",
            ),
            Verdict::Warned => (
                "PR format check failed (ignored)",
                "The PR title or description does not match the required format. Failures are ignored.",
            ),
            Verdict::Failed => (
                "PR format check failed",
                "The PR title or description does not match the required format.",
            ),
        };

        CheckOutcome::new(PR_CHECK_KEY, title, summary, text, verdict.conclusion())
            .with_attention(verdict.needs_attention())
    }
}
