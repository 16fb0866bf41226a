// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit data model.

mod model;

pub use model::{build_report, subject_line, Commit, Report, ValidationResult};
