// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! LLM-based PR description scoring and code review.

mod client;
mod evaluation;
mod review;

pub use client::{CodeReviewer, OpenAiClient, QualityScorer};
pub use evaluation::{build_prompt, outcome, render, QualityEvaluation, LLM_CHECK_KEY};
pub use review::{
    outcome as review_outcome, render as render_review, review_files, review_prompt,
    CodeReviewReport, FileReview, IssueKind, ReviewIssue, ReviewedFile, Severity,
    REVIEW_CHECK_KEY,
};
