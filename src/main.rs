//! TrendSphere — Binary Entrypoint
//! Serves today's trend report: cached if today's is already on disk,
//! freshly acquired otherwise. `--refresh` forces re-acquisition.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trendsphere::acquire::Acquirer;
use trendsphere::app::TrendApp;
use trendsphere::cache::{FileStore, ReportCache};
use trendsphere::config::{TrendsConfig, DEFAULT_CONFIG_PATH};
use trendsphere::provider::build_client_from_config;
use trendsphere::render::render_report;

#[derive(Debug, Parser)]
#[command(name = "trendsphere")]
#[command(about = "Daily global tech trend report, generated with search grounding")]
struct Cli {
    /// Re-acquire even when today's report is already cached.
    #[arg(long)]
    refresh: bool,

    /// Path to the JSON config file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trendsphere=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let cfg = TrendsConfig::load_from_file(&cli.config);

    let client = build_client_from_config(&cfg);
    let cache = ReportCache::new(Arc::new(FileStore::new(cfg.cache_dir.clone())));
    let mut app = TrendApp::new(cache, Acquirer::new(client));

    let outcome = if cli.refresh {
        app.refresh().await.map(|_| ())
    } else {
        app.start().await.map(|_| ())
    };

    match outcome {
        Ok(()) => {
            let Some(report) = app.report() else {
                // Success status always carries a report; keep the binary honest anyway.
                eprintln!("no report available");
                return ExitCode::FAILURE;
            };
            let cached_on = if app.from_cache() { app.last_updated() } else { None };
            print!("{}", render_report(report, cached_on));
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "acquisition failed");
            eprintln!("Could not fetch the trend report. Check your connection and run again to retry.");
            ExitCode::FAILURE
        }
    }
}
