// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Report rendering and delivery.
//!
//! Each check renders a single [`CheckOutcome`]; a [`Publisher`] hands that
//! same value to the console, step outputs, check runs and PR comments.

mod commits;
pub mod markdown;
mod outcome;
mod sink;

pub use commits::{plural, CommitReportRenderer, COMMIT_CHECK_KEY};
pub use outcome::{CheckOutcome, Conclusion};
pub use sink::{
    step_output_entry, truncate_text, CheckRunSink, CommentSink, ConsoleSink, Publisher,
    ReportSink, StepOutputSink, GITHUB_TEXT_LIMIT,
};
