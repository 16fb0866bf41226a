// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command dispatch and execution.

use crate::config::{apply_overrides, validate_config, Overrides, PrCheckConfig, SinkKind};
use crate::error::{ConfigError, PrCheckError, Result, ResultExt, ValidationFailure};
use crate::github::GitHubClient;
use crate::llm::{
    review_files, CodeReviewReport, OpenAiClient, QualityEvaluation, QualityScorer,
    LLM_CHECK_KEY, REVIEW_CHECK_KEY,
};
use crate::pr::PrFormatChecker;
use crate::report::markdown::code_block;
use crate::report::{
    plural, truncate_text, CheckOutcome, CommitReportRenderer, Conclusion, ConsoleSink,
    Publisher, ReportSink, StepOutputSink, GITHUB_TEXT_LIMIT,
};
use crate::rules::{CommitPattern, CommitValidator, Verdict};
use std::time::Duration;

use super::args::{
    Cli, Commands, CommitsArgs, InitArgs, LlmArgs, OutputFormat, PrArgs, ReportArgs,
    ReviewArgs,
};

/// Run the CLI with the given arguments.
pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Commits(args) => {
            let config = load(&cli, args.to_overrides())?;
            run_commits(&cli, &config, args)
        }
        Commands::Pr(args) => {
            let config = load(&cli, args.to_overrides())?;
            run_pr(&cli, &config, args)
        }
        Commands::Llm(args) => {
            let config = load(&cli, args.to_overrides())?;
            run_llm(&cli, &config, args)
        }
        Commands::Review(args) => {
            let config = load(&cli, args.to_overrides())?;
            run_review(&cli, &config, args)
        }
        Commands::Report(args) => {
            let config = load(&cli, args.to_overrides())?;
            run_report(&cli, &config, args)
        }
        Commands::Init(args) => run_init(args),
        Commands::Version => run_version(),
    }
}

/// Load configuration, overlay command-line values and validate the result.
fn load(cli: &Cli, overrides: Overrides) -> Result<PrCheckConfig> {
    let config = if let Some(config_path) = &cli.config {
        PrCheckConfig::load_from(config_path)?
    } else {
        PrCheckConfig::load()?
    };

    let config = apply_overrides(config, overrides);
    validate_config(&config)?;
    Ok(config)
}

/// Publish an outcome through the configured sinks.
///
/// Returns how many sinks accepted it. When none did, the outcome is
/// printed so the result is never lost.
fn deliver(config: &PrCheckConfig, format: OutputFormat, outcome: &CheckOutcome) -> usize {
    let publisher = Publisher::from_config(config, format);
    let delivered = publisher.publish(outcome);

    if delivered == 0 {
        tracing::warn!("No sink accepted the result; printing it instead");
        if let Err(e) = ConsoleSink::new(format).publish(outcome) {
            tracing::warn!("Could not print result: {}", e);
        }
    }
    delivered
}

/// Write a failure outcome to the step output file for a check that could
/// not run, so workflow steps reading its outputs still see a conclusion.
fn record_failure(config: &PrCheckConfig, key: &str, title: &str, err: &PrCheckError) {
    let Some(path) = &config.output.output_file else {
        return;
    };
    if !config.output.sinks.contains(&SinkKind::StepOutput) {
        return;
    }

    let outcome = CheckOutcome::new(
        key,
        title,
        "The check could not run.",
        code_block(&err.to_string(), "text"),
        Conclusion::Failure,
    );
    if let Err(e) = StepOutputSink::new(path).publish(&outcome) {
        tracing::warn!("Could not record failure: {}", e);
    }
}

/// Run the commits command.
fn run_commits(cli: &Cli, config: &PrCheckConfig, args: &CommitsArgs) -> Result<()> {
    tracing::debug!("Running commits command in {:?}", args.repo);

    let pattern = CommitPattern::new(&config.commits.pattern)?;
    let (source, scope) = crate::source::from_config(config, &args.repo)?;
    let validator = CommitValidator::new(source.as_ref(), pattern)
        .include_merges(config.commits.include_merges);
    let report = validator.check(&scope)?;

    let verdict = Verdict::decide(
        report.passed,
        report.is_empty(),
        config.commits.ignore_failures,
    );
    tracing::info!("Commit check verdict: {:?}", verdict);

    let renderer = CommitReportRenderer::new(config.github.commit_url_base());
    let outcome = renderer.outcome(&report, validator.pattern(), verdict);
    deliver(config, cli.format, &outcome);

    if verdict.is_success() {
        Ok(())
    } else {
        Err(PrCheckError::Validation(ValidationFailure {
            count: report.invalid.len(),
            total: report.total,
            subject: "commits".to_string(),
        }))
    }
}

/// Resolve the PR title and body, fetching whatever was not given.
fn pr_text(
    config: &PrCheckConfig,
    title: Option<String>,
    body: Option<String>,
) -> Result<(String, String)> {
    if let (Some(title), Some(body)) = (&title, &body) {
        return Ok((title.clone(), body.clone()));
    }

    match config.github.pull_request {
        Some(number) => {
            let client = GitHubClient::new(&config.github)?;
            tracing::info!("Fetching pull request #{} from {}", number, client.repository());
            let pr = client.get_pull_request(number)?;
            Ok((
                title.unwrap_or(pr.title),
                body.or(pr.body).unwrap_or_default(),
            ))
        }
        None => match title {
            Some(title) => Ok((title, body.unwrap_or_default())),
            None => Err(PrCheckError::Config(ConfigError::MissingRequired {
                key: "--title or github.pull_request (PR_NUMBER)".to_string(),
            })),
        },
    }
}

/// Run the pr command.
fn run_pr(cli: &Cli, config: &PrCheckConfig, args: &PrArgs) -> Result<()> {
    tracing::debug!("Running pr command");

    let checker = PrFormatChecker::new(&config.pr)?;
    let (title, body) = pr_text(config, args.title.clone(), args.body.clone())?;
    let report = checker.check(&title, &body);
    tracing::info!(
        "PR title valid: {}, body valid: {} ({} chars)",
        report.title_valid,
        report.body_valid,
        report.body_length
    );

    let verdict = Verdict::decide(report.passed(), false, config.pr.ignore_failures);
    let outcome = checker.outcome(&report, verdict);
    deliver(config, cli.format, &outcome);

    if verdict.is_success() {
        Ok(())
    } else {
        Err(PrCheckError::Validation(ValidationFailure {
            count: report.failure_count(),
            total: 2,
            subject: "PR format checks".to_string(),
        }))
    }
}

fn evaluate_pr(config: &PrCheckConfig, args: &LlmArgs) -> Result<QualityEvaluation> {
    let client = OpenAiClient::new(&config.llm, Duration::from_secs(config.github.timeout_secs))?;
    let (title, body) = pr_text(config, args.title.clone(), args.body.clone())?;
    Ok(client.evaluate(&title, &body)?)
}

/// Run the llm command.
fn run_llm(cli: &Cli, config: &PrCheckConfig, args: &LlmArgs) -> Result<()> {
    tracing::debug!("Running llm command");

    let evaluation = evaluate_pr(config, args).map_err(|e| {
        record_failure(config, LLM_CHECK_KEY, "PR quality assessment could not run", &e);
        e
    })?;

    let acceptable = evaluation.meets(config.llm.min_score);
    if acceptable != evaluation.is_acceptable {
        tracing::debug!(
            "Model said is_acceptable={}, score {} against minimum {} says {}",
            evaluation.is_acceptable,
            evaluation.quality_score,
            config.llm.min_score,
            acceptable
        );
    }

    let verdict = Verdict::decide(acceptable, false, config.llm.ignore_failures);
    let outcome = crate::llm::outcome(&evaluation, verdict);
    deliver(config, cli.format, &outcome);

    if verdict.is_success() {
        Ok(())
    } else {
        Err(PrCheckError::Validation(ValidationFailure {
            count: 1,
            total: 1,
            subject: "PR quality checks".to_string(),
        }))
    }
}

/// List the pull request's changed files and review them.
fn review_pull_request(config: &PrCheckConfig) -> Result<(GitHubClient, u64, CodeReviewReport)> {
    let number = config.github.pull_request.ok_or_else(|| {
        PrCheckError::Config(ConfigError::MissingRequired {
            key: "github.pull_request (PR_NUMBER)".to_string(),
        })
    })?;
    let reviewer =
        OpenAiClient::new(&config.llm, Duration::from_secs(config.github.timeout_secs))?;
    let github = GitHubClient::new(&config.github)?;

    let files = github.list_pull_files(number)?;
    tracing::info!(
        "Pull request #{} changes {}",
        number,
        plural(files.len(), "file")
    );
    let report = review_files(&reviewer, &files, config.review.max_files)?;
    Ok((github, number, report))
}

/// Run the review command.
///
/// High-severity findings fail the run. The rendered review is also posted
/// on the pull request unless posting is disabled.
fn run_review(cli: &Cli, config: &PrCheckConfig, args: &ReviewArgs) -> Result<()> {
    tracing::debug!("Running review command");

    let (github, number, report) = review_pull_request(config).map_err(|e| {
        record_failure(config, REVIEW_CHECK_KEY, "Code review could not run", &e);
        e
    })?;

    let verdict = Verdict::decide(
        report.high_severity() == 0,
        report.is_empty(),
        config.review.ignore_failures,
    );
    tracing::info!("Code review verdict: {:?}", verdict);

    let outcome = crate::llm::review_outcome(&report, verdict);
    deliver(config, cli.format, &outcome);

    if config.review.post_review && !args.no_post && !report.is_empty() {
        let body = truncate_text(&outcome.text, GITHUB_TEXT_LIMIT);
        match github.create_pull_review(number, &body) {
            Ok(()) => tracing::info!("Posted review on pull request #{}", number),
            Err(e) => tracing::warn!("Could not post review: {}", e),
        }
    }

    if verdict.is_success() {
        Ok(())
    } else {
        Err(PrCheckError::Validation(ValidationFailure {
            count: report.high_severity(),
            total: report.total_issues(),
            subject: "review findings".to_string(),
        }))
    }
}

/// Run the report command.
///
/// Succeeds when a sink accepted the result or the conclusion is success.
fn run_report(cli: &Cli, config: &PrCheckConfig, args: &ReportArgs) -> Result<()> {
    tracing::debug!("Running report command ({})", args.conclusion);

    let outcome = CheckOutcome::new(
        args.key.clone(),
        args.title.clone(),
        args.summary.clone(),
        args.text.clone(),
        args.conclusion,
    );
    let delivered = deliver(config, cli.format, &outcome);

    if delivered > 0 || args.conclusion == Conclusion::Success {
        Ok(())
    } else {
        Err(PrCheckError::WithContext {
            context: "report".to_string(),
            message: format!(
                "result with conclusion '{}' could not be delivered",
                args.conclusion
            ),
        })
    }
}

/// Run the version command.
fn run_version() -> Result<()> {
    println!("prcheck {}", crate::version::version_string());

    if let Some(sha) = crate::version::GIT_SHA {
        println!("git commit: {}", sha);
    }
    if let Some(date) = crate::version::GIT_COMMIT_DATE {
        println!("commit date: {}", date);
    }

    Ok(())
}

/// Run the init command.
fn run_init(args: &InitArgs) -> Result<()> {
    use crate::config::default::example_config;

    tracing::debug!("Running init command with args: {:?}", args);

    let config_path = std::path::Path::new("prcheck.toml");

    if config_path.exists() && !args.force {
        return Err(PrCheckError::Config(ConfigError::AlreadyExists {
            path: config_path.to_path_buf(),
        }));
    }

    std::fs::write(config_path, example_config()).context("Failed to write prcheck.toml")?;

    println!("✓ Created prcheck.toml");

    Ok(())
}
