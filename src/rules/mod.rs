// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Validation rules for commits.
//!
//! This module holds the commit subject pattern, the validation pipeline
//! that applies it to every commit in scope, and the policy that turns a
//! report into a pass/fail signal.

mod engine;
mod pattern;
mod policy;

pub use engine::CommitValidator;
pub use pattern::{validate, CommitPattern};
pub use policy::Verdict;
