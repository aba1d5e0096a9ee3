//! rbu-eval - Rank-Biased Utility evaluation tool
//!
//! Usage:
//!   rbu-eval <P> <E> <GOLD> <OUTPUT> [--report PATH] [--json PATH] [--config PATH]
//!
//! Exit code 0 when the report was written, 1 when the run was aborted
//! (invalid arguments, unreadable files, gold standard format errors).

use clap::Parser;
use rbu_common::config::{ConfigResolver, ResolvedConfig};
use rbu_eval::{run, Args};
use tracing::{error, info};

fn main() {
    let args = Args::parse();

    // Resolve configuration first: it decides the default log level.
    // Resolution itself logs through a bootstrap subscriber at info.
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    let resolved = tracing::subscriber::with_default(bootstrap, || {
        ConfigResolver::new().resolve(args.config.as_deref())
    });
    let level = match &resolved {
        Ok(ResolvedConfig { config, .. }) => config.logging.level.clone(),
        Err(_) => "info".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    info!("Starting rbu-eval v{}", env!("CARGO_PKG_VERSION"));

    let resolved = match resolved {
        Ok(resolved) => resolved,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!("Configuration: {}", resolved.source);

    match run(&args, &resolved.config) {
        Ok(summary) => {
            info!(
                "Evaluation complete: {} test case(s) scored, report at {}",
                summary.result.len(),
                summary.report_path.display()
            );
        }
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
