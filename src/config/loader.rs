// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration loading, overlaying and validation.

use crate::error::{ConfigError, PrCheckError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};

use super::schema::{PrCheckConfig, SinkKind, SourceKind};

/// Configuration file names to search for, in order of priority.
const CONFIG_FILES: &[&str] = &["prcheck.toml", ".prcheck.toml", ".github/prcheck.toml"];

/// Find the configuration file in the current directory or parent directories.
pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    find_config_file_from(&current_dir)
}

/// Find the configuration file starting from a specific directory.
pub fn find_config_file_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for config_name in CONFIG_FILES {
            let config_path = current.join(config_name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    // XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join("prcheck").join("config.toml");
        if user_config.exists() {
            return Some(user_config);
        }
    }

    None
}

/// Load configuration from the default locations.
pub fn load_config() -> Result<PrCheckConfig> {
    match find_config_file() {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("No configuration file found, using defaults");
            Ok(PrCheckConfig::default())
        }
    }
}

/// Load configuration from a specific path.
pub fn load_config_from(path: &Path) -> Result<PrCheckConfig> {
    tracing::debug!("Loading configuration from: {:?}", path);

    if !path.exists() {
        return Err(PrCheckError::Config(ConfigError::NotFound {
            path: path.to_path_buf(),
        }));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        PrCheckError::Config(ConfigError::ParseError {
            message: format!("Failed to read config file: {}", e),
        })
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<PrCheckConfig> {
    toml::from_str(content).map_err(|e| {
        PrCheckError::Config(ConfigError::ParseError {
            message: format!("Failed to parse TOML: {}", e),
        })
    })
}

/// Values supplied on the command line or through the environment.
///
/// `None` leaves the file/default value in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub commit_pattern: Option<String>,
    pub base_branch: Option<String>,
    pub source: Option<SourceKind>,
    pub include_merges: bool,
    pub title_pattern: Option<String>,
    pub ignore_failures: bool,
    pub repository: Option<String>,
    pub token: Option<String>,
    pub sha: Option<String>,
    pub pull_request: Option<u64>,
    pub check_name: Option<String>,
    pub api_url: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
    pub review_max_files: Option<usize>,
    pub sinks: Vec<SinkKind>,
    pub output_file: Option<PathBuf>,
}

/// Apply command-line/environment overrides on top of a loaded configuration.
pub fn apply_overrides(mut config: PrCheckConfig, overrides: Overrides) -> PrCheckConfig {
    if let Some(pattern) = overrides.commit_pattern {
        config.commits.pattern = pattern;
    }
    if let Some(base) = overrides.base_branch {
        config.commits.base_branch = base;
    }
    if let Some(source) = overrides.source {
        config.commits.source = source;
    }
    if overrides.include_merges {
        config.commits.include_merges = true;
    }
    if let Some(pattern) = overrides.title_pattern {
        config.pr.title_pattern = pattern;
    }
    if overrides.ignore_failures {
        config.commits.ignore_failures = true;
        config.pr.ignore_failures = true;
        config.llm.ignore_failures = true;
        config.review.ignore_failures = true;
    }

    let github = &mut config.github;
    if overrides.repository.is_some() {
        github.repository = overrides.repository;
    }
    if overrides.token.is_some() {
        github.token = overrides.token;
    }
    if overrides.sha.is_some() {
        github.sha = overrides.sha;
    }
    if overrides.pull_request.is_some() {
        github.pull_request = overrides.pull_request;
    }
    if let Some(name) = overrides.check_name {
        github.check_name = name;
    }
    if let Some(url) = overrides.api_url {
        github.api_url = url;
    }

    if overrides.llm_api_key.is_some() {
        config.llm.api_key = overrides.llm_api_key;
    }
    if let Some(max_files) = overrides.review_max_files {
        config.review.max_files = max_files;
    }
    if let Some(model) = overrides.llm_model {
        config.llm.model = model;
    }

    if !overrides.sinks.is_empty() {
        config.output.sinks = overrides.sinks;
    }
    if overrides.output_file.is_some() {
        config.output.output_file = overrides.output_file;
    }

    config
}

/// Compile a configured pattern, naming the offending key and value on failure.
pub fn compile_pattern(key: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        PrCheckError::Config(ConfigError::InvalidPattern {
            key: key.to_string(),
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
    })
}

/// Check a fully overlaid configuration for values that cannot work.
pub fn validate_config(config: &PrCheckConfig) -> Result<()> {
    compile_pattern("commits.pattern", &config.commits.pattern)?;
    compile_pattern("pr.title_pattern", &config.pr.title_pattern)?;

    if !(1..=10).contains(&config.llm.min_score) {
        return Err(PrCheckError::Config(ConfigError::InvalidValue {
            key: "llm.min_score".to_string(),
            message: format!("{} is outside 1..=10", config.llm.min_score),
        }));
    }

    if config.review.max_files == 0 {
        return Err(PrCheckError::Config(ConfigError::InvalidValue {
            key: "review.max_files".to_string(),
            message: "must be at least 1".to_string(),
        }));
    }

    if let Some(repo) = &config.github.repository {
        let mut parts = repo.split('/');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
        );
        if !well_formed {
            return Err(PrCheckError::Config(ConfigError::InvalidValue {
                key: "github.repository".to_string(),
                message: format!("'{}' is not in owner/name form", repo),
            }));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_COMMIT_PATTERN;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config.commits.pattern, DEFAULT_COMMIT_PATTERN);
        assert_eq!(config.github.api_url, "https://api.github.com");
    }

    #[test]
    fn test_parse_custom_config() {
        let toml = r#"
[commits]
pattern = "^JIRA-[0-9]+ .+"
ignore_failures = true
base_branch = "develop"
source = "local"

[pr]
min_body_length = 20

[output]
sinks = ["console", "check-run", "comment"]
"#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.commits.pattern, "^JIRA-[0-9]+ .+");
        assert!(config.commits.ignore_failures);
        assert_eq!(config.commits.base_branch, "develop");
        assert_eq!(config.commits.source, SourceKind::Local);
        assert_eq!(config.pr.min_body_length, 20);
        assert_eq!(
            config.output.sinks,
            vec![SinkKind::Console, SinkKind::CheckRun, SinkKind::Comment]
        );
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_config("[commits\npattern = ");
        assert!(matches!(
            result,
            Err(PrCheckError::Config(ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config_from(Path::new("/definitely/not/here/prcheck.toml"));
        assert!(matches!(
            result,
            Err(PrCheckError::Config(ConfigError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_find_config_in_parent() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".prcheck.toml"), "").unwrap();

        let found = find_config_file_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(".prcheck.toml"));
    }

    #[test]
    fn test_apply_overrides() {
        let base = parse_config("[commits]\nbase_branch = \"develop\"\n").unwrap();
        let overrides = Overrides {
            commit_pattern: Some("^x".to_string()),
            ignore_failures: true,
            include_merges: true,
            pull_request: Some(42),
            sinks: vec![SinkKind::Comment],
            ..Default::default()
        };
        let merged = apply_overrides(base, overrides);

        assert_eq!(merged.commits.pattern, "^x");
        assert_eq!(merged.commits.base_branch, "develop");
        assert!(merged.commits.ignore_failures);
        assert!(merged.commits.include_merges);
        assert!(merged.pr.ignore_failures);
        assert!(merged.review.ignore_failures);
        assert_eq!(merged.github.pull_request, Some(42));
        assert_eq!(merged.output.sinks, vec![SinkKind::Comment]);
    }

    #[test]
    fn test_overrides_keep_file_values() {
        let base = parse_config("[commits]\nignore_failures = true\n").unwrap();
        let merged = apply_overrides(base, Overrides::default());
        assert!(merged.commits.ignore_failures);
        assert!(!merged.commits.include_merges);
        assert_eq!(
            merged.output.sinks,
            vec![SinkKind::Console, SinkKind::StepOutput]
        );
    }

    #[test]
    fn test_validate_rejects_zero_review_files() {
        let mut config = PrCheckConfig::default();
        config.review.max_files = 0;
        assert!(matches!(
            validate_config(&config),
            Err(PrCheckError::Config(ConfigError::InvalidValue { key, .. })) if key == "review.max_files"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_pattern() {
        let mut config = PrCheckConfig::default();
        config.commits.pattern = "^(feat".to_string();
        match validate_config(&config) {
            Err(PrCheckError::Config(ConfigError::InvalidPattern { key, pattern, .. })) => {
                assert_eq!(key, "commits.pattern");
                assert_eq!(pattern, "^(feat");
            }
            other => panic!("Expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_repository_form() {
        let mut config = PrCheckConfig::default();
        config.github.repository = Some("octo/widgets".to_string());
        assert!(validate_config(&config).is_ok());

        config.github.repository = Some("widgets".to_string());
        assert!(validate_config(&config).is_err());

        config.github.repository = Some("a/b/c".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_min_score_range() {
        let mut config = PrCheckConfig::default();
        config.llm.min_score = 11;
        assert!(matches!(
            validate_config(&config),
            Err(PrCheckError::Config(ConfigError::InvalidValue { .. }))
        ));
    }
}
