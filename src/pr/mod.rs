// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Pull request title and description checks.

mod format;

pub use format::{PrFormatChecker, PrFormatReport, PR_CHECK_KEY};
