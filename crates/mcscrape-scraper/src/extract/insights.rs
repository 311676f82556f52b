//! Financial Insights: Piotroski score, 3-year CAGR and status-tagged rows.
//!
//! The insight boxes carry no stable ids, so the financials and peers boxes
//! are found by the in-page anchors they link to.

use indexmap::IndexMap;
use mcscrape_core::{FinancialInsights, InsightStatus, StatusItem, Timings};
use serde::Deserialize;
use serde_json::json;

use super::require_section;
use crate::error::ExtractionError;
use crate::page::{query_as, BrowserPage};
use crate::scripts::INSIGHTS;

pub const INSIGHTS_ROOT: &str = "#mc_insight";
pub const INSIGHT_BOXES: &str = ".grey_bx.mcinbx";

#[derive(Debug, Deserialize)]
struct RawInsights {
    piotroski_score: Option<String>,
    piotroski_indicates: Option<String>,
    #[serde(default)]
    cagr: Vec<(String, String)>,
    #[serde(default)]
    price: Vec<RawStatusRow>,
    #[serde(default)]
    industry: Vec<RawStatusRow>,
}

#[derive(Debug, Deserialize)]
struct RawStatusRow {
    text: String,
    #[serde(default)]
    class: String,
}

impl From<RawStatusRow> for StatusItem {
    fn from(raw: RawStatusRow) -> Self {
        StatusItem {
            status: InsightStatus::from_class(&raw.class),
            text: raw.text,
        }
    }
}

/// # Errors
///
/// [`ExtractionError::SectionMissing`] when the insights block is absent;
/// [`ExtractionError::Page`] when the query fails or returns another shape.
pub async fn extract_insights(
    page: &dyn BrowserPage,
    timings: &Timings,
) -> Result<FinancialInsights, ExtractionError> {
    require_section(page, INSIGHTS_ROOT, timings.section_wait).await?;

    let raw: RawInsights = query_as(page, &INSIGHTS, json!({ "boxes": INSIGHT_BOXES })).await?;
    let three_year_cagr: IndexMap<String, String> = raw.cagr.into_iter().collect();

    Ok(FinancialInsights {
        piotroski_score: raw.piotroski_score.filter(|s| !s.trim().is_empty()),
        piotroski_indicates: raw.piotroski_indicates.unwrap_or_default(),
        three_year_cagr,
        price: raw.price.into_iter().map(StatusItem::from).collect(),
        industry_comparison: raw.industry.into_iter().map(StatusItem::from).collect(),
    })
}
