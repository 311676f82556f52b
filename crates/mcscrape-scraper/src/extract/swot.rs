//! SWOT tiles.
//!
//! The four tiles share one overlay region on the page, so only one may be
//! expanded at a time. In detailed mode each tile walks
//! `Closed -> Expanding -> Scraped -> Collapsing -> Closed` before the next
//! tile starts.

use mcscrape_core::record::swot_count;
use mcscrape_core::{SwotCategory, SwotKind, SwotMode, Target, Timings};
use serde::Deserialize;
use serde_json::json;

use super::{pause, require_section};
use crate::error::{ExtractionError, PageError};
use crate::page::{query_as, BrowserPage};
use crate::scripts::{LIST_ITEMS, SWOT_TILE};

pub const SWOT_ROOT: &str = ".swot_cnt";

/// Page anchors for one SWOT tile.
#[derive(Debug, Clone, Copy)]
pub struct TileSelectors {
    pub kind: SwotKind,
    pub tile: &'static str,
    pub expand: &'static str,
    pub details: &'static str,
    pub collapse: &'static str,
}

pub const TILES: [TileSelectors; 4] = [
    TileSelectors {
        kind: SwotKind::Strengths,
        tile: ".swli1",
        expand: ".swli1 a",
        details: "#swliSDiv",
        collapse: ".swli1 .swlicl",
    },
    TileSelectors {
        kind: SwotKind::Weaknesses,
        tile: ".swli2",
        expand: ".swli2 a",
        details: "#swliWDiv",
        collapse: ".swli2 .swlicl",
    },
    TileSelectors {
        kind: SwotKind::Opportunities,
        tile: ".swli3",
        expand: ".swli3 a",
        details: "#swliODiv",
        collapse: ".swli3 .swlicl",
    },
    TileSelectors {
        kind: SwotKind::Threats,
        tile: ".swli4",
        expand: ".swli4 a",
        details: "#swliTDiv",
        collapse: ".swli4 .swlicl",
    },
];

#[derive(Debug, Deserialize)]
struct RawTile {
    title: String,
    summary: String,
}

/// Expansion state of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TileState {
    Closed,
    Expanding,
    Scraped,
    Collapsing,
}

/// Read every tile present on the page.
///
/// A missing tile is skipped; a tile that fails mid-way is logged and the
/// next tile still runs.
///
/// # Errors
///
/// [`ExtractionError::SectionMissing`] when the SWOT block is absent or no
/// tile could be read.
pub async fn extract_swot(
    page: &dyn BrowserPage,
    target: &Target,
    mode: SwotMode,
    timings: &Timings,
) -> Result<Vec<SwotCategory>, ExtractionError> {
    require_section(page, SWOT_ROOT, timings.section_wait).await?;

    let mut categories = Vec::with_capacity(TILES.len());
    for tile in &TILES {
        match read_tile(page, tile, mode, timings).await {
            Ok(Some(category)) => categories.push(category),
            Ok(None) => {
                tracing::debug!(symbol = %target, category = %tile.kind, "SWOT tile not on page");
            }
            Err(e) => {
                tracing::warn!(
                    symbol = %target,
                    category = %tile.kind,
                    error = %e,
                    "SWOT tile failed"
                );
            }
        }
    }

    if categories.is_empty() {
        return Err(ExtractionError::SectionMissing { selector: SWOT_ROOT });
    }
    Ok(categories)
}

async fn read_tile(
    page: &dyn BrowserPage,
    tile: &TileSelectors,
    mode: SwotMode,
    timings: &Timings,
) -> Result<Option<SwotCategory>, PageError> {
    let raw: Option<RawTile> = query_as(page, &SWOT_TILE, json!({ "tile": tile.tile })).await?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    let mut category = SwotCategory {
        kind: tile.kind,
        count: swot_count(&raw.title),
        summary: raw.summary,
        details: Vec::new(),
    };
    if mode == SwotMode::Detailed {
        category.details = expand_and_scrape(page, tile, timings).await;
    }
    Ok(Some(category))
}

/// Drive one tile through its expand/scrape/collapse cycle.
///
/// An expanded tile is always collapsed again, even when its details could
/// not be read.
async fn expand_and_scrape(
    page: &dyn BrowserPage,
    tile: &TileSelectors,
    timings: &Timings,
) -> Vec<String> {
    let mut state = TileState::Closed;
    let mut details: Option<Vec<String>> = None;

    loop {
        state = match (state, details.is_some()) {
            (TileState::Closed, false) => {
                if let Err(e) = page.click(tile.expand).await {
                    tracing::warn!(category = %tile.kind, error = %e, "SWOT expand control missing");
                    return Vec::new();
                }
                TileState::Expanding
            }
            (TileState::Expanding, _) => {
                pause(timings.swot_expand_settle).await;
                let scraped: Result<Vec<String>, PageError> =
                    query_as(page, &LIST_ITEMS, json!({ "container": tile.details })).await;
                details = Some(scraped.unwrap_or_else(|e| {
                    tracing::warn!(category = %tile.kind, error = %e, "SWOT details unreadable");
                    Vec::new()
                }));
                TileState::Scraped
            }
            (TileState::Scraped, _) => {
                if let Err(e) = page.click(tile.collapse).await {
                    tracing::debug!(category = %tile.kind, error = %e, "SWOT collapse control missing");
                }
                TileState::Collapsing
            }
            (TileState::Collapsing, _) => {
                pause(timings.swot_collapse_settle).await;
                TileState::Closed
            }
            (TileState::Closed, true) => break,
        };
    }
    details.unwrap_or_default()
}

#[cfg(test)]
#[path = "swot_test.rs"]
mod tests;
