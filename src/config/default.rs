// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Default configuration values.

use super::schema::PrCheckConfig;

/// Get the default configuration.
pub fn default_config() -> PrCheckConfig {
    PrCheckConfig::default()
}

/// Generate an example configuration file.
pub fn example_config() -> &'static str {
    r#"# prcheck configuration file
# Author: Eshan Roy
# SPDX-License-Identifier: MIT

# Commit message validation
[commits]
pattern = "^(feat|fix|docs|style|refactor|test|chore|perf)(\\(.+\\))?: [A-Z].*"
ignore_failures = false
base_branch = "main"
# auto | local | github
source = "auto"
include_merges = false

# PR title and body validation
[pr]
title_pattern = "^\\[(Feature|Fix|Docs|Refactor|Test|Chore)\\] .+"
min_body_length = 50
ignore_failures = false

# LLM quality scoring (api key comes from OPENAI_API_KEY)
[llm]
model = "gpt-4"
api_url = "https://api.openai.com/v1"
min_score = 6
temperature = 0.3
ignore_failures = false

# LLM code review of changed files (model and key from [llm])
[review]
max_files = 20
post_review = true
ignore_failures = false

# GitHub connection (token comes from GITHUB_TOKEN)
[github]
api_url = "https://api.github.com"
web_url = "https://github.com"
check_name = "PR Validation"
timeout_secs = 30

# Report delivery: console, step-output, check-run, comment
[output]
sinks = ["console", "step-output"]
"#
}
