// Author: Eshan Roy
// SPDX-License-Identifier: MIT

use assert_cmd::Command;
use git2::{Oid, Repository, Signature};
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

const CLEARED_ENV: &[&str] = &[
    "GITHUB_TOKEN",
    "GITHUB_REPOSITORY",
    "REPO_FULL_NAME",
    "GITHUB_SHA",
    "GITHUB_OUTPUT",
    "GITHUB_BASE_REF",
    "GITHUB_API_URL",
    "PR_NUMBER",
    "CHECK_NAME",
    "OPENAI_API_KEY",
    "MODEL_NAME",
    "XDG_CONFIG_HOME",
    "RUST_LOG",
];

struct TestRepo {
    dir: TempDir,
    repo: Repository,
}

impl TestRepo {
    /// A repository with one commit on a `base` branch.
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let test_repo = Self { dir, repo };
        let base = test_repo.commit("Initial commit");
        {
            let base_commit = test_repo.repo.find_commit(base).unwrap();
            test_repo.repo.branch("base", &base_commit, false).unwrap();
        }
        test_repo
    }

    fn commit(&self, message: &str) -> Oid {
        let sig = Signature::now("Test Author", "test@example.com").unwrap();
        let tree_id = self.repo.index().unwrap().write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    /// Merge a side commit with `side_message` into HEAD.
    fn merge_side(&self, side_message: &str, merge_message: &str) {
        let sig = Signature::now("Test Author", "test@example.com").unwrap();
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        let tree = head.tree().unwrap();
        let side_oid = self
            .repo
            .commit(None, &sig, &sig, side_message, &tree, &[&head])
            .unwrap();
        let side = self.repo.find_commit(side_oid).unwrap();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, merge_message, &tree, &[&head, &side])
            .unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("prcheck").unwrap();
        for var in CLEARED_ENV {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.dir.path()).current_dir(self.dir.path());
        cmd
    }

    fn commits(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.args(["commits", "--base", "base", "--sink", "console"]);
        cmd
    }
}

#[test]
fn invalid_commit_fails_the_run() {
    let repo = TestRepo::new();
    repo.commit("feat: Add login");
    repo.commit("added stuff");

    repo.commits()
        .assert()
        .failure()
        .code(1)
        .stdout(contains("added stuff"))
        .stdout(contains("How to fix"))
        .stderr(contains("1 of 2 commits did not pass"));
}

#[test]
fn valid_commits_pass() {
    let repo = TestRepo::new();
    repo.commit("feat: Add login");
    repo.commit("fix(auth): Handle expired sessions");

    repo.commits()
        .assert()
        .success()
        .stdout(contains("2 commits"));
}

#[test]
fn ignored_failures_still_report() {
    let repo = TestRepo::new();
    repo.commit("added stuff");

    repo.commits()
        .arg("--ignore-failures")
        .assert()
        .success()
        .stdout(contains("added stuff"))
        .stdout(contains("Warning"));
}

#[test]
fn empty_scope_is_neutral() {
    let repo = TestRepo::new();

    repo.commits()
        .assert()
        .success()
        .stdout(contains("failed").not());
}

#[test]
fn empty_scope_step_output_conclusion_is_success() {
    let repo = TestRepo::new();
    let output = repo.dir.path().join("github_output");

    repo.cmd()
        .args(["commits", "--base", "base", "--sink", "step-output"])
        .arg("--output-file")
        .arg(&output)
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("commit_check_conclusion<<PRCHECK_EOF\nsuccess\nPRCHECK_EOF\n"));
    assert!(!written.contains("neutral"));
}

#[test]
fn merge_commits_are_skipped_by_default() {
    let repo = TestRepo::new();
    repo.commit("feat: Add login");
    repo.merge_side("fix: Side fix", "Merge branch 'side'");

    repo.commits()
        .assert()
        .success()
        .stdout(contains("2 commits"));

    repo.commits()
        .arg("--include-merges")
        .assert()
        .failure()
        .stdout(contains("Merge branch"));
}

#[test]
fn missing_base_is_fatal_even_when_ignoring_failures() {
    let repo = TestRepo::new();
    repo.commit("feat: Add login");

    repo.cmd()
        .args(["commits", "--base", "no-such-branch", "--ignore-failures"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Retrieval error"));
}

#[test]
fn custom_pattern_from_command_line() {
    let repo = TestRepo::new();
    repo.commit("JIRA-12 Add login");

    repo.commits()
        .args(["--pattern", r"^[A-Z]+-\d+ .+"])
        .assert()
        .success();
}

#[test]
fn invalid_pattern_names_the_value() {
    let repo = TestRepo::new();

    repo.commits()
        .args(["--pattern", "^(feat"])
        .assert()
        .failure()
        .stderr(contains("commits.pattern"))
        .stderr(contains("^(feat"));
}

#[test]
fn pattern_from_config_file() {
    let repo = TestRepo::new();
    repo.commit("JIRA-12 Add login");
    fs::write(
        repo.dir.path().join(".prcheck.toml"),
        "[commits]\npattern = '^JIRA-\\d+ .+'\n",
    )
    .unwrap();

    repo.commits().assert().success();
}

#[test]
fn step_output_file_receives_entries() {
    let repo = TestRepo::new();
    repo.commit("added stuff");
    let output = repo.dir.path().join("github_output");

    repo.cmd()
        .args(["commits", "--base", "base", "--ignore-failures"])
        .args(["--sink", "step-output"])
        .arg("--output-file")
        .arg(&output)
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("commit_check_title<<PRCHECK_EOF\n"));
    assert!(written.contains("commit_check_conclusion<<PRCHECK_EOF\nsuccess\nPRCHECK_EOF\n"));
    assert!(written.contains("added stuff"));
}

#[test]
fn json_console_output() {
    let repo = TestRepo::new();
    repo.commit("feat: Add login");

    let output = repo.commits().args(["--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["conclusion"], "success");
    assert_eq!(json["needs_attention"], false);
}

#[test]
fn pr_format_valid() {
    let repo = TestRepo::new();

    repo.cmd()
        .args(["pr", "--sink", "console", "--title", "[Feature] Add login"])
        .args([
            "--body",
            "## Changes\nAdds a login page backed by the session service.",
        ])
        .assert()
        .success()
        .stdout(contains("PR format check passed"));
}

#[test]
fn pr_format_invalid_title() {
    let repo = TestRepo::new();

    repo.cmd()
        .args(["pr", "--sink", "console", "--title", "Add login", "--body", "short"])
        .assert()
        .failure()
        .stdout(contains("PR title format error"))
        .stdout(contains("PR description error"))
        .stderr(contains("2 of 2 PR format checks did not pass"));
}

#[test]
fn pr_without_title_or_number_is_a_config_error() {
    let repo = TestRepo::new();

    repo.cmd()
        .args(["pr", "--sink", "console"])
        .assert()
        .failure()
        .stderr(contains("Missing required configuration"));
}

#[test]
fn llm_requires_api_key() {
    let repo = TestRepo::new();

    repo.cmd()
        .args(["llm", "--title", "[Fix] Typo", "--body", "Fixes a typo"])
        .assert()
        .failure()
        .stderr(contains("OPENAI_API_KEY"));
}

#[test]
fn llm_failure_still_writes_step_outputs() {
    let repo = TestRepo::new();
    let output = repo.dir.path().join("github_output");

    repo.cmd()
        .args(["llm", "--title", "[Fix] Typo", "--body", "Fixes a typo"])
        .args(["--sink", "step-output"])
        .arg("--output-file")
        .arg(&output)
        .assert()
        .failure()
        .code(1);

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("llm_check_conclusion<<PRCHECK_EOF\nfailure\nPRCHECK_EOF\n"));
    assert!(written.contains("OPENAI_API_KEY"));
}

#[test]
fn review_requires_pull_request() {
    let repo = TestRepo::new();

    repo.cmd()
        .args(["review", "--api-key", "sk-test", "--sink", "console"])
        .assert()
        .failure()
        .stderr(contains("PR_NUMBER"));
}

#[test]
fn review_requires_api_key_and_records_failure() {
    let repo = TestRepo::new();
    let output = repo.dir.path().join("github_output");

    repo.cmd()
        .args(["review", "--pr", "3", "--repository", "octo/widgets"])
        .args(["--sink", "step-output"])
        .arg("--output-file")
        .arg(&output)
        .assert()
        .failure()
        .stderr(contains("OPENAI_API_KEY"));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("code_review_conclusion<<PRCHECK_EOF\nfailure\nPRCHECK_EOF\n"));
}

#[test]
fn report_success_without_sinks_succeeds() {
    let repo = TestRepo::new();

    // No GITHUB_SHA: the check-run sink is skipped and the result is printed.
    repo.cmd()
        .args(["report", "--title", "Lint", "--conclusion", "success"])
        .assert()
        .success()
        .stdout(contains("Lint"));
}

#[test]
fn report_failure_without_sinks_fails() {
    let repo = TestRepo::new();

    repo.cmd()
        .args(["report", "--title", "Lint", "--conclusion", "failure"])
        .assert()
        .failure()
        .stdout(contains("Lint"));
}

#[test]
fn init_writes_config_once() {
    let repo = TestRepo::new();

    repo.cmd().arg("init").assert().success();
    assert!(repo.dir.path().join("prcheck.toml").exists());

    repo.cmd()
        .arg("init")
        .assert()
        .failure()
        .stderr(contains("already exists"));

    repo.cmd().args(["init", "--force"]).assert().success();
}

#[test]
fn version_prints_name() {
    let repo = TestRepo::new();

    repo.cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(contains("prcheck"));
}
