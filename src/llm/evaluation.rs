// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! PR quality evaluations returned by the model.

use crate::error::LlmError;
use crate::report::markdown::escape_inline;
use crate::report::CheckOutcome;
use crate::rules::Verdict;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Step output key prefix for LLM quality checks.
pub const LLM_CHECK_KEY: &str = "llm_check";

/// The model's assessment of a PR description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityEvaluation {
    pub quality_score: u8,
    #[serde(default)]
    pub is_acceptable: bool,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvement_suggestions: Vec<String>,
    #[serde(default)]
    pub explanation: String,
}

impl QualityEvaluation {
    /// Parse the JSON object the model was asked to return.
    pub fn parse(content: &str) -> Result<Self, LlmError> {
        let evaluation: Self = serde_json::from_str(content.trim())?;
        if !(1..=10).contains(&evaluation.quality_score) {
            return Err(LlmError::InvalidResponse(format!(
                "quality_score {} is outside 1..=10",
                evaluation.quality_score
            )));
        }
        Ok(evaluation)
    }

    /// Whether the score meets the threshold.
    pub fn meets(&self, min_score: u8) -> bool {
        self.quality_score >= min_score
    }
}

/// Build the evaluation prompt.
pub fn build_prompt(title: &str, body: &str) -> String {
    format!(
        "You are an expert code reviewer tasked with evaluating the quality of a GitHub Pull Request.
Analyze the following PR title and description to determine if it meets high-quality standards.

PR Title: {title}
PR Description:
{body}

Evaluate based on these criteria:
1. Clarity: Is the purpose of the PR clearly communicated?
2. Completeness: Does it explain what changes were made and why?
3. Technical Detail: Are implementation details sufficiently explained?
4. Testing: Is there information about how the changes were tested?

Respond with a JSON object containing:
{{
  \"quality_score\": [1-10 integer score],
  \"is_acceptable\": [boolean, true if score >= 6],
  \"strengths\": [array of strengths],
  \"improvement_suggestions\": [array of specific suggestions for improvement],
  \"explanation\": [brief explanation of your evaluation]
}}
"
    )
}

fn score_emoji(score: u8) -> &'static str {
    match score {
        1..=3 => "🚨",
        4..=5 => "⚠️",
        6..=7 => "👍",
        8 => "✅",
        9..=10 => "🌟",
        _ => "🔍",
    }
}

/// Render an evaluation as Markdown. Model text is escaped.
pub fn render(evaluation: &QualityEvaluation) -> String {
    let mut out = String::new();
    let score = evaluation.quality_score;

    let _ = writeln!(out, "## {} PR quality assessment\n", score_emoji(score));
    let _ = writeln!(
        out,
        "**Score: {}/10** - {}\n",
        score,
        escape_inline(&evaluation.explanation)
    );

    out.push_str("### Strengths\n\n");
    push_list(&mut out, &evaluation.strengths);

    out.push_str("\n### Suggestions\n\n");
    push_list(&mut out, &evaluation.improvement_suggestions);

    out.push_str("\n---\n*This assessment was generated by an AI model and is advisory only.*\n");
    out
}

fn push_list(out: &mut String, items: &[String]) {
    if items.is_empty() {
        out.push_str("- *(none)*\n");
    }
    for item in items {
        let _ = writeln!(out, "- {}", escape_inline(item));
    }
}

/// Render an evaluation into a deliverable outcome for a verdict.
pub fn outcome(evaluation: &QualityEvaluation, verdict: Verdict) -> CheckOutcome {
    let mut text = String::new();
    if verdict == Verdict::Warned {
        text.push_str(
            "> **Warning:** a low quality score is ignored by configuration; \
             this check does not block the pull request.\n\n",
        );
    }
    text.push_str(&render(evaluation));

    let score = evaluation.quality_score;
    let (title, summary) = match verdict {
        Verdict::Passed | Verdict::Neutral => (
            "PR quality assessment passed".to_string(),
            format!("PR quality score: {}/10, meets the bar.", score),
        ),
        Verdict::Warned => (
            "PR quality assessment failed (ignored)".to_string(),
            format!("PR quality score: {}/10, below the bar. Failures are ignored.", score),
        ),
        Verdict::Failed => (
            "PR quality assessment failed".to_string(),
            format!("PR quality score: {}/10, below the bar.", score),
        ),
    };

    CheckOutcome::new(LLM_CHECK_KEY, title, summary, text, verdict.conclusion())
        .with_attention(verdict.needs_attention())
}
