//! Per-target run loop.
//!
//! Each target walks resolve, navigate, extract, assemble and emit. Any error
//! inside that walk is the target's failure alone: it becomes one
//! `ERROR PROCESSING` entry in the sink and the loop moves on. Only a sink
//! that cannot record the failure stops the run.

use std::path::Path;
use std::time::Duration;

use mcscrape_core::{assemble, AssemblyInput, Pipeline, Target, Timings};
use mcscrape_scraper::extract::profile::PROFILE_HEADER;
use mcscrape_scraper::extract::{
    extract_essentials, extract_insights, extract_news, extract_profile, extract_swot,
};
use mcscrape_scraper::{settle, BrowserPage, RecordSink, Resolver, Stage};

/// Everything one run shares across targets.
pub(crate) struct RunContext<'a> {
    pub page: &'a dyn BrowserPage,
    pub resolver: &'a Resolver,
    pub pipeline: &'a Pipeline,
    pub timings: &'a Timings,
    /// Per-target screenshots are saved here when the pipeline enables them.
    pub screenshot_dir: Option<&'a Path>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Process `targets` strictly in order, pacing after each one.
///
/// # Errors
///
/// Returns an error only when the sink cannot record a target's failure.
pub(crate) async fn run_targets(
    ctx: &RunContext<'_>,
    targets: &[Target],
    sink: &mut dyn RecordSink,
) -> anyhow::Result<RunSummary> {
    let mut summary = RunSummary::default();
    let total = targets.len();

    for (index, target) in targets.iter().enumerate() {
        tracing::info!(symbol = %target, position = index + 1, total, "processing target");

        match process_target(ctx, target, sink).await {
            Ok(()) => {
                summary.processed += 1;
                tracing::info!(symbol = %target, "target processed");
            }
            Err(e) => {
                summary.failed += 1;
                let message = format!("{e:#}");
                tracing::error!(symbol = %target, error = %message, "target failed");
                sink.record_failure(target, &message).await?;
            }
        }

        pace(ctx.pipeline.pacing).await;
    }

    Ok(summary)
}

async fn process_target(
    ctx: &RunContext<'_>,
    target: &Target,
    sink: &mut dyn RecordSink,
) -> anyhow::Result<()> {
    let page = ctx.page;
    let timings = ctx.timings;
    let pipeline = ctx.pipeline;

    let link = ctx.resolver.resolve(page, target, timings).await?;

    if let Err(e) = page.goto(&link.url, timings.navigation).await {
        tracing::warn!(
            symbol = %target,
            url = %link.url,
            error = %e,
            "profile page did not finish loading, continuing"
        );
    }
    if let Err(e) = page.wait_for_selector(PROFILE_HEADER, timings.navigation).await {
        tracing::warn!(symbol = %target, error = %e, "profile header not found, continuing");
    }

    let mut input = AssemblyInput::empty(target.clone(), link.url);
    input.profile = settle(target, Stage::Profile, extract_profile(page, target).await);
    input.swot = settle(
        target,
        Stage::Swot,
        extract_swot(page, target, pipeline.swot, timings).await,
    );
    input.essentials = settle(
        target,
        Stage::Essentials,
        extract_essentials(page, pipeline.essentials, timings).await,
    );
    if pipeline.insights {
        input.insights = settle(target, Stage::Insights, extract_insights(page, timings).await);
    }
    if pipeline.news {
        input.news = settle(target, Stage::News, extract_news(page, timings).await);
    }

    let record = assemble(input);
    sink.emit(&record).await?;

    if pipeline.screenshots {
        if let Some(dir) = ctx.screenshot_dir {
            save_screenshot(page, dir, target).await;
        }
    }
    Ok(())
}

async fn save_screenshot(page: &dyn BrowserPage, dir: &Path, target: &Target) {
    let path = dir.join(format!(
        "{target}_{}.png",
        chrono::Utc::now().timestamp_millis()
    ));
    match page.screenshot(&path).await {
        Ok(()) => tracing::debug!(symbol = %target, path = %path.display(), "screenshot saved"),
        Err(e) => tracing::warn!(symbol = %target, error = %e, "screenshot failed"),
    }
}

async fn pace(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
