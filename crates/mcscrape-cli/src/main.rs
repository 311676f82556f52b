mod runner;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mcscrape_core::{load_targets, AppConfig, Pipeline, RunProfile, SinkStrategy};
use mcscrape_scraper::{
    login, ApiSink, ChromeSession, DeliveryCounts, RecordSink, Resolver, TextReportSink,
};
use tracing_subscriber::EnvFilter;

use crate::runner::{run_targets, RunContext, RunSummary};

#[derive(Debug, Parser)]
#[command(name = "mcscrape")]
#[command(about = "Scrape Moneycontrol company data for a list of ticker symbols")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Process every symbol in the target list
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Which extractors run and where records go
    #[arg(long, env = "MCSCRAPE_PROFILE", default_value = "report")]
    profile: RunProfile,

    /// CSV with a `Symbol` column (overrides `MCSCRAPE_SYMBOLS_PATH`)
    #[arg(long)]
    symbols: Option<PathBuf>,

    /// Report file (overrides `MCSCRAPE_OUTPUT_PATH`)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the de-duplicated targets and exit without launching a browser
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = mcscrape_core::load_app_config().context("failed to load configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Run(args) => run(config, args).await,
    }
}

async fn run(mut config: AppConfig, args: RunArgs) -> anyhow::Result<()> {
    if let Some(symbols) = args.symbols {
        config.symbols_path = symbols;
    }
    if let Some(output) = args.output {
        config.output_path = output;
    }

    let pipeline =
        Pipeline::for_profile(args.profile).with_pacing_override(config.pacing_delay_ms);
    let endpoint = pipeline.endpoint(config.api_url.as_deref())?;

    let targets = load_targets(&config.symbols_path).with_context(|| {
        format!("failed to load targets from {}", config.symbols_path.display())
    })?;
    tracing::info!(
        profile = %pipeline.profile,
        count = targets.len(),
        path = %config.symbols_path.display(),
        "loaded targets"
    );

    if args.dry_run {
        for target in &targets {
            println!("{target}");
        }
        return Ok(());
    }

    let mut sink = build_sink(&config, &pipeline, endpoint.as_deref())?;
    let screenshot_dir = prepare_screenshot_dir(&config);

    let session = ChromeSession::launch(&config.browser)
        .await
        .context("failed to start browser session")?;

    let outcome = login(
        session.page(),
        &config.login_url,
        config.credentials.as_ref(),
        &config.timings,
        screenshot_dir.as_deref(),
    )
    .await;
    tracing::info!(?outcome, "session ready");

    let resolver = Resolver::new(
        &config.search_url,
        &config.site_domain,
        config.search_max_attempts,
    );
    let ctx = RunContext {
        page: session.page(),
        resolver: &resolver,
        pipeline: &pipeline,
        timings: &config.timings,
        screenshot_dir: screenshot_dir.as_deref(),
    };
    let result = run_targets(&ctx, &targets, sink.as_mut()).await;

    session.shutdown().await;

    let RunSummary { processed, failed } = result?;
    tracing::info!(
        processed,
        failed,
        output = %config.output_path.display(),
        "run complete"
    );
    if let Some(DeliveryCounts {
        delivered,
        rejected,
    }) = sink.deliveries()
    {
        tracing::info!(delivered, rejected, "remote delivery totals");
    }
    Ok(())
}

fn build_sink(
    config: &AppConfig,
    pipeline: &Pipeline,
    endpoint: Option<&str>,
) -> anyhow::Result<Box<dyn RecordSink>> {
    let report = TextReportSink::create(&config.output_path, pipeline.report_format())
        .context("failed to open report file")?;

    match (&pipeline.sink, endpoint) {
        (SinkStrategy::Api { shape, .. }, Some(endpoint)) => {
            tracing::info!(endpoint, "delivering records over HTTP");
            let sink = ApiSink::new(endpoint, *shape, config.request_timeout_secs, report)?;
            Ok(Box::new(sink))
        }
        _ => Ok(Box::new(report)),
    }
}

/// Screenshot directory for this run, created on demand.
///
/// Login error screenshots are always taken when possible, so the directory
/// is prepared even for profiles without per-target screenshots.
fn prepare_screenshot_dir(config: &AppConfig) -> Option<PathBuf> {
    match std::fs::create_dir_all(&config.screenshot_dir) {
        Ok(()) => Some(config.screenshot_dir.clone()),
        Err(e) => {
            tracing::warn!(
                path = %config.screenshot_dir.display(),
                error = %e,
                "screenshot directory unavailable, screenshots disabled"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests;
