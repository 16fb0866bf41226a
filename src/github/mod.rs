// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! GitHub REST API integration.

mod client;
mod models;
#[cfg(test)]
pub(crate) mod stub;

pub use client::{classify_status, GitHubClient};
pub use models::{CheckRunOutput, CheckRunRequest, ComparePage, PullFile, PullRequest};
