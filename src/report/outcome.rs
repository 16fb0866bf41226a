// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! The rendered result of a check, ready for delivery.

use serde::Serialize;

/// Check run conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    Skipped,
    #[value(name = "timed_out")]
    TimedOut,
}

impl Conclusion {
    /// Get the string GitHub expects for this conclusion.
    pub fn as_str(&self) -> &'static str {
        match self {
            Conclusion::Success => "success",
            Conclusion::Failure => "failure",
            Conclusion::Neutral => "neutral",
            Conclusion::Cancelled => "cancelled",
            Conclusion::Skipped => "skipped",
            Conclusion::TimedOut => "timed_out",
        }
    }

    /// The pass/fail value written to step outputs: `success` or `failure`.
    ///
    /// Only check runs see the finer-grained conclusions.
    pub fn step_output_value(&self) -> &'static str {
        match self {
            Conclusion::Failure | Conclusion::Cancelled | Conclusion::TimedOut => "failure",
            Conclusion::Success | Conclusion::Neutral | Conclusion::Skipped => "success",
        }
    }
}

impl std::fmt::Display for Conclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Title, summary, text and conclusion of one check.
///
/// Rendered once and handed unchanged to every sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// Key prefix for step outputs (`commit_check`, `pr_check`, ...).
    #[serde(skip)]
    pub key: String,
    pub title: String,
    pub summary: String,
    pub text: String,
    pub conclusion: Conclusion,
    /// Whether the outcome carries failures, ignored or not.
    pub needs_attention: bool,
}

impl CheckOutcome {
    /// Create an outcome.
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        text: impl Into<String>,
        conclusion: Conclusion,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            summary: summary.into(),
            text: text.into(),
            conclusion,
            needs_attention: conclusion == Conclusion::Failure,
        }
    }

    /// Set whether the outcome needs a human's attention.
    pub fn with_attention(mut self, needs_attention: bool) -> Self {
        self.needs_attention = needs_attention;
        self
    }
}
