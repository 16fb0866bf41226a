// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit report rendering.

use crate::commit::{Report, ValidationResult};
use crate::rules::{CommitPattern, Verdict};
use std::fmt::Write;

use super::markdown::{code_block, code_span};
use super::outcome::CheckOutcome;

/// Step output key prefix for commit checks.
pub const COMMIT_CHECK_KEY: &str = "commit_check";

const VALID_EXAMPLES: &[&str] = &[
    "feat: Add user authentication",
    "fix(auth): Resolve session timeout",
    "docs: Update installation guide",
    "refactor(core): Simplify configuration loading",
];

/// Renders commit reports as Markdown.
#[derive(Debug, Clone, Default)]
pub struct CommitReportRenderer {
    commit_url_base: Option<String>,
}

impl CommitReportRenderer {
    /// Create a renderer. With a base URL, short hashes link to their commit.
    pub fn new(commit_url_base: Option<String>) -> Self {
        Self { commit_url_base }
    }

    /// Render the full report text.
    pub fn render(&self, report: &Report, pattern: &CommitPattern) -> String {
        let mut out = String::new();

        if report.is_empty() {
            out.push_str("## ➖ No commits to check\n\n");
            out.push_str("No commits were found in scope, so there was nothing to validate.\n");
            return out;
        }

        if report.passed {
            out.push_str("## ✅ Commit message check passed\n\n");
            let _ = writeln!(
                out,
                "All {} match the required format.\n",
                plural(report.total, "commit")
            );
            out.push_str("### Required pattern\n\n");
            out.push_str(&code_block(pattern.as_str(), "text"));
            out.push('\n');
            return out;
        }

        out.push_str("## ❌ Commit message check failed\n\n");
        let _ = writeln!(
            out,
            "{} of {} do not match the required format.\n",
            report.invalid.len(),
            plural(report.total, "commit")
        );

        out.push_str("### Invalid commits\n\n");
        for result in &report.invalid {
            let _ = writeln!(out, "- {}", self.invalid_line(result));
        }

        out.push_str("\n### Required pattern\n\n");
        out.push_str(&code_block(pattern.as_str(), "text"));
        out.push_str("\n\n### Valid examples\n\n");
        for example in VALID_EXAMPLES {
            let _ = writeln!(out, "- `{}`", example);
        }

        out.push_str("\n### How to fix\n\n");
        out.push_str(
            "1. Reword the offending commits, e.g. with `git rebase -i` (choose `reword`) \
             or `git commit --amend` for the most recent one.\n",
        );
        out.push_str("2. Push the rewritten branch with `git push --force-with-lease`.\n\n");
        out.push_str(
            "The default pattern follows the \
             [Conventional Commits](https://www.conventionalcommits.org/) convention: \
             `type(scope): Description`.\n",
        );

        out
    }

    fn invalid_line(&self, result: &ValidationResult) -> String {
        let commit = &result.commit;
        let short = code_span(commit.short_hash());
        let reference = match &self.commit_url_base {
            Some(base) if is_hex(&commit.hash) => format!("[{}]({}/{})", short, base, commit.hash),
            _ => short,
        };

        format!(
            "{} by {}: {}",
            reference,
            code_span(&commit.author),
            code_span(&commit.subject)
        )
    }

    /// Render the report into a deliverable outcome for a verdict.
    pub fn outcome(&self, report: &Report, pattern: &CommitPattern, verdict: Verdict) -> CheckOutcome {
        let mut text = String::new();
        if verdict == Verdict::Warned {
            text.push_str(
                "> **Warning:** commit format failures are ignored by configuration; \
                 this check does not block the pull request.\n\n",
            );
        }
        text.push_str(&self.render(report, pattern));

        let (title, summary) = match verdict {
            Verdict::Neutral => (
                "No commits to check".to_string(),
                "No commits were found in scope.".to_string(),
            ),
            Verdict::Passed => (
                "Commit message check passed".to_string(),
                format!(
                    "All {} match the required format.",
                    plural(report.total, "commit")
                ),
            ),
            Verdict::Warned => (
                "Commit message check failed (ignored)".to_string(),
                format!(
                    "{} of {} do not match the required format. Failures are ignored.",
                    report.invalid.len(),
                    plural(report.total, "commit")
                ),
            ),
            Verdict::Failed => (
                "Commit message check failed".to_string(),
                format!(
                    "{} of {} do not match the required format.",
                    report.invalid.len(),
                    plural(report.total, "commit")
                ),
            ),
        };

        CheckOutcome::new(COMMIT_CHECK_KEY, title, summary, text, verdict.conclusion())
            .with_attention(verdict.needs_attention())
    }
}

fn is_hex(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// `1 commit`, `2 commits`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::{build_report, Commit};
    use crate::report::Conclusion;
    use crate::rules::validate;

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

    fn report(subjects: &[&str]) -> Report {
        let pattern = CommitPattern::default();
        let results = subjects
            .iter()
            .map(|s| {
                let commit = Commit::from_message(SHA, s, "Alice");
                let valid = validate(&commit, &pattern);
                ValidationResult { commit, valid }
            })
            .collect();
        build_report(results)
    }

    fn renderer() -> CommitReportRenderer {
        CommitReportRenderer::new(Some("https://github.com/octo/widgets/commit".to_string()))
    }

    #[test]
    fn test_render_failure_lists_commit() {
        let text = renderer().render(&report(&["Added login page"]), &CommitPattern::default());

        assert!(text.contains("Commit message check failed"));
        assert!(text.contains("1 of 1 commit do not match"));
        assert!(text.contains(
            "- [`0123456`](https://github.com/octo/widgets/commit/0123456789abcdef0123456789abcdef01234567) by `Alice`: `Added login page`"
        ));
        assert!(text.contains(CommitPattern::default().as_str()));
        assert!(text.contains("feat: Add user authentication"));
        assert!(text.contains("conventionalcommits.org"));
    }

    #[test]
    fn test_render_without_repository_has_no_link() {
        let text = CommitReportRenderer::default()
            .render(&report(&["Added login page"]), &CommitPattern::default());
        assert!(text.contains("- `0123456` by `Alice`: `Added login page`"));
        assert!(!text.contains("](http"));
    }

    #[test]
    fn test_render_pass_and_empty() {
        let pattern = CommitPattern::default();
        let text = renderer().render(&report(&["feat: Add login", "fix: Typo"]), &pattern);
        assert!(text.contains("passed"));
        assert!(text.contains("All 2 commits"));
        assert!(!text.contains("Invalid commits"));

        let text = renderer().render(&report(&[]), &pattern);
        assert!(text.contains("No commits to check"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let r = report(&["feat: Add login", "oops", "also bad"]);
        let pattern = CommitPattern::default();
        assert_eq!(renderer().render(&r, &pattern), renderer().render(&r, &pattern));
    }

    #[test]
    fn test_adversarial_subject_stays_in_code_span() {
        let subject = "x` <img src=x onerror=alert(1)> | ## @here ``";
        let text = renderer().render(&report(&[subject]), &CommitPattern::default());

        let line = text
            .lines()
            .find(|l| l.starts_with("- [`0123456`]"))
            .unwrap();
        assert!(line.ends_with(&format!("```{}```", subject)) || line.ends_with(&format!("``` {} ```", subject)));
        assert_eq!(text.lines().filter(|l| l.starts_with("## ")).count(), 1);
    }

    #[test]
    fn test_non_hex_hash_is_not_linked() {
        let results = vec![ValidationResult {
            commit: Commit::from_message("not-a-sha)](evil", "bad", "Mallory"),
            valid: false,
        }];
        let text = renderer().render(&build_report(results), &CommitPattern::default());
        assert!(!text.contains("](https://github.com/octo/widgets/commit/not"));
    }

    #[test]
    fn test_outcome_for_each_verdict() {
        let pattern = CommitPattern::default();
        let failing = report(&["Added login page"]);

        let outcome = renderer().outcome(&failing, &pattern, Verdict::Failed);
        assert_eq!(outcome.conclusion, Conclusion::Failure);
        assert!(outcome.needs_attention);
        assert_eq!(outcome.key, COMMIT_CHECK_KEY);

        let outcome = renderer().outcome(&failing, &pattern, Verdict::Warned);
        assert_eq!(outcome.conclusion, Conclusion::Success);
        assert!(outcome.needs_attention);
        assert!(outcome.text.starts_with("> **Warning:**"));
        assert!(outcome.text.contains("`Added login page`"));

        let outcome = renderer().outcome(&report(&[]), &pattern, Verdict::Neutral);
        assert_eq!(outcome.conclusion, Conclusion::Neutral);
        assert!(!outcome.needs_attention);
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "commit"), "1 commit");
        assert_eq!(plural(0, "commit"), "0 commits");
        assert_eq!(plural(3, "commit"), "3 commits");
    }
}
