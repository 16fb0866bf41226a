// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Local git repository commit source.

use crate::commit::Commit;
use crate::error::RetrievalError;
use git2::{Oid, Repository, Sort};
use std::path::Path;

use super::{CommitSource, Scope};

/// Reads commits from a local repository with a `<base>..HEAD` revwalk.
pub struct LocalSource {
    inner: Repository,
}

impl LocalSource {
    /// Open the repository containing `path`.
    pub fn open(path: &Path) -> Result<Self, RetrievalError> {
        let repo = Repository::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                RetrievalError::NotARepository {
                    path: path.to_path_buf(),
                }
            } else {
                git_error("open", e)
            }
        })?;

        Ok(Self { inner: repo })
    }

    /// Resolve the base branch, preferring the remote-tracking ref.
    fn resolve_base(&self, base: &str) -> Result<Oid, RetrievalError> {
        for candidate in [format!("origin/{}", base), base.to_string()] {
            if let Ok(obj) = self.inner.revparse_single(&candidate) {
                let commit = obj.peel_to_commit().map_err(|e| git_error("peel", e))?;
                tracing::debug!("Resolved base '{}' to {}", candidate, commit.id());
                return Ok(commit.id());
            }
        }

        Err(RetrievalError::InvalidReference {
            reference: format!("neither 'origin/{}' nor '{}' exists", base, base),
        })
    }

    /// Commits reachable from HEAD but not from `base`, newest first.
    fn commits_since(&self, base: &str) -> Result<Vec<Commit>, RetrievalError> {
        let base_oid = self.resolve_base(base)?;

        let mut revwalk = self.inner.revwalk().map_err(|e| git_error("revwalk", e))?;
        revwalk
            .set_sorting(Sort::TIME)
            .map_err(|e| git_error("revwalk.sort", e))?;
        revwalk
            .push_head()
            .map_err(|e| git_error("revwalk.push_head", e))?;
        revwalk
            .hide(base_oid)
            .map_err(|e| git_error("revwalk.hide", e))?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result.map_err(|e| git_error("revwalk", e))?;
            let commit = self
                .inner
                .find_commit(oid)
                .map_err(|e| git_error("find_commit", e))?;

            let message = String::from_utf8_lossy(commit.message_bytes());
            let author = commit.author();
            let author_name = String::from_utf8_lossy(author.name_bytes());
            commits.push(
                Commit::from_message(oid.to_string(), &message, author_name)
                    .merge(commit.parent_count() > 1),
            );
        }

        Ok(commits)
    }
}

impl CommitSource for LocalSource {
    fn name(&self) -> &'static str {
        "local git"
    }

    fn fetch_commits(&self, scope: &Scope) -> Result<Vec<Commit>, RetrievalError> {
        match scope {
            Scope::Branch { base } => self.commits_since(base),
            Scope::PullRequest { number } => Err(RetrievalError::InvalidReference {
                reference: format!(
                    "pull request #{} cannot be resolved from a local repository",
                    number
                ),
            }),
        }
    }
}

fn git_error(operation: &str, err: git2::Error) -> RetrievalError {
    RetrievalError::Git {
        operation: operation.to_string(),
        message: err.message().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn commit(repo: &Repository, message: &str, name: &str) -> Oid {
        let sig = git2::Signature::now(name, "test@example.com").unwrap();
        let tree_id = {
            let mut index = repo.index().unwrap();
            index.write_tree().unwrap()
        };
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    fn create_test_repo() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let base = commit(&repo, "Initial commit", "Base Author");
        {
            let base_commit = repo.find_commit(base).unwrap();
            repo.branch("base", &base_commit, false).unwrap();
        }
        (dir, repo)
    }

    #[test]
    fn test_commits_since_base() {
        let (dir, repo) = create_test_repo();
        commit(&repo, "feat: Add login\n\nLonger body", "Alice");
        commit(&repo, "Added logout", "Bob");

        let source = LocalSource::open(dir.path()).unwrap();
        let commits = source
            .fetch_commits(&Scope::Branch {
                base: "base".to_string(),
            })
            .unwrap();

        assert_eq!(commits.len(), 2);
        let subjects: Vec<&str> = commits.iter().map(|c| c.subject.as_str()).collect();
        assert!(subjects.contains(&"feat: Add login"));
        assert!(subjects.contains(&"Added logout"));
        assert!(commits.iter().any(|c| c.author == "Alice"));
        assert!(commits.iter().all(|c| c.hash.len() == 40));
    }

    #[test]
    fn test_merge_commit_is_flagged() {
        let (dir, repo) = create_test_repo();
        let sig = git2::Signature::now("Alice", "test@example.com").unwrap();
        let base = repo.head().unwrap().peel_to_commit().unwrap();
        let tree = base.tree().unwrap();

        // A side commit on top of base, not on HEAD.
        let side_oid = repo
            .commit(None, &sig, &sig, "fix: Side change", &tree, &[&base])
            .unwrap();
        let main_oid = commit(&repo, "feat: Main change", "Alice");

        let side = repo.find_commit(side_oid).unwrap();
        let main = repo.find_commit(main_oid).unwrap();
        repo.commit(
            Some("HEAD"),
            &sig,
            &sig,
            "Merge branch 'side'",
            &tree,
            &[&main, &side],
        )
        .unwrap();

        let source = LocalSource::open(dir.path()).unwrap();
        let commits = source
            .fetch_commits(&Scope::Branch {
                base: "base".to_string(),
            })
            .unwrap();

        assert_eq!(commits.len(), 3);
        let merges: Vec<&str> = commits
            .iter()
            .filter(|c| c.is_merge)
            .map(|c| c.subject.as_str())
            .collect();
        assert_eq!(merges, vec!["Merge branch 'side'"]);
    }

    #[test]
    fn test_no_commits_ahead_is_empty() {
        let (dir, _repo) = create_test_repo();
        let source = LocalSource::open(dir.path()).unwrap();
        let commits = source
            .fetch_commits(&Scope::Branch {
                base: "base".to_string(),
            })
            .unwrap();
        assert!(commits.is_empty());
    }

    #[test]
    fn test_missing_base_branch() {
        let (dir, _repo) = create_test_repo();
        let source = LocalSource::open(dir.path()).unwrap();
        let result = source.fetch_commits(&Scope::Branch {
            base: "does-not-exist".to_string(),
        });
        assert!(matches!(
            result,
            Err(RetrievalError::InvalidReference { .. })
        ));
    }

    #[test]
    fn test_not_a_repo() {
        let dir = TempDir::new().unwrap();
        let result = LocalSource::open(dir.path());
        assert!(matches!(
            result,
            Err(RetrievalError::NotARepository { .. })
        ));
    }

    #[test]
    fn test_pull_request_scope_unsupported() {
        let (dir, _repo) = create_test_repo();
        let source = LocalSource::open(dir.path()).unwrap();
        let result = source.fetch_commits(&Scope::PullRequest { number: 1 });
        assert!(result.is_err());
    }
}
