// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Exit/continuation policy for a completed check.

use crate::report::Conclusion;
use serde::Serialize;

/// How a finished check should be signalled to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Everything in scope passed.
    Passed,
    /// Nothing was in scope.
    Neutral,
    /// Something failed, but failures are configured to be ignored.
    Warned,
    /// Something failed.
    Failed,
}

impl Verdict {
    /// Decide the verdict for a check.
    ///
    /// `empty` takes precedence: a scope with nothing in it is neutral.
    pub fn decide(passed: bool, empty: bool, ignore_failures: bool) -> Self {
        match (empty, passed, ignore_failures) {
            (true, _, _) => Verdict::Neutral,
            (false, true, _) => Verdict::Passed,
            (false, false, true) => Verdict::Warned,
            (false, false, false) => Verdict::Failed,
        }
    }

    /// Whether the process should exit successfully.
    pub fn is_success(&self) -> bool {
        !matches!(self, Verdict::Failed)
    }

    /// Whether the outcome carries failures a human should look at.
    pub fn needs_attention(&self) -> bool {
        matches!(self, Verdict::Warned | Verdict::Failed)
    }

    /// Conclusion reported to GitHub.
    pub fn conclusion(&self) -> Conclusion {
        match self {
            Verdict::Passed | Verdict::Warned => Conclusion::Success,
            Verdict::Neutral => Conclusion::Neutral,
            Verdict::Failed => Conclusion::Failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passed_always_succeeds() {
        for ignore in [true, false] {
            let verdict = Verdict::decide(true, false, ignore);
            assert_eq!(verdict, Verdict::Passed);
            assert!(verdict.is_success());
            assert!(!verdict.needs_attention());
        }
    }

    #[test]
    fn test_failure_respects_ignore_flag() {
        let failed = Verdict::decide(false, false, false);
        assert_eq!(failed, Verdict::Failed);
        assert!(!failed.is_success());
        assert_eq!(failed.conclusion(), Conclusion::Failure);

        let warned = Verdict::decide(false, false, true);
        assert_eq!(warned, Verdict::Warned);
        assert!(warned.is_success());
        assert!(warned.needs_attention());
        assert_eq!(warned.conclusion(), Conclusion::Success);
    }

    #[test]
    fn test_empty_scope_is_neutral() {
        let verdict = Verdict::decide(true, true, false);
        assert_eq!(verdict, Verdict::Neutral);
        assert!(verdict.is_success());
        assert!(!verdict.needs_attention());
        assert_eq!(verdict.conclusion(), Conclusion::Neutral);
    }
}
