// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! prcheck - Pull request hygiene checks for CI

use clap::Parser;
use prcheck::cli::{run, Cli};
use prcheck::PrCheckError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let PrCheckError::Retrieval(retrieval) = &e {
            if let Some(payload) = retrieval.payload() {
                tracing::debug!("Raw response payload: {}", payload);
            }
        }
        std::process::exit(1);
    }
}

/// Set up logging/tracing. Logs go to stderr so stdout stays parseable.
fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::try_new("prcheck=debug,warn").unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if debug {
        tracing::debug!("Debug logging enabled");
    }
}
