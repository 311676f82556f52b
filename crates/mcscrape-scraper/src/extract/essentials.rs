//! Essentials scorecard.

use mcscrape_core::{ChecklistRow, EssentialsMode, EssentialsReport, EssentialsSection, Timings};
use serde::Deserialize;
use serde_json::json;

use super::{pause, require_section};
use crate::error::ExtractionError;
use crate::page::{query_as, BrowserPage};
use crate::scripts::{CHECKLIST_ROWS, FIRST_TEXT};

pub const ESSENTIALS_ROOT: &str = ".bx_mceti";
pub const SCORE_SELECTOR: &str = ".esbx";
pub const EXPAND_SELECTOR: &str = ".arw_line";

/// Row selector for each checklist section.
#[must_use]
pub fn rows_selector(section: EssentialsSection) -> &'static str {
    match section {
        EssentialsSection::Financials => "#id_financials li",
        EssentialsSection::Ownership => "#id_ownership li",
        EssentialsSection::IndustryComparison => "#id_induscmp li",
        EssentialsSection::Others => "#id_others li",
    }
}

/// A checklist row as the page reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawChecklistRow {
    pub text: String,
    /// Whether the green checkmark path is drawn in the row's icon.
    pub check_marker: bool,
}

impl From<RawChecklistRow> for ChecklistRow {
    fn from(raw: RawChecklistRow) -> Self {
        ChecklistRow {
            text: raw.text,
            passed: raw.check_marker,
        }
    }
}

/// Read the score text and, in detailed mode, the four checklists.
///
/// # Errors
///
/// [`ExtractionError::SectionMissing`] when the Essentials block is absent;
/// [`ExtractionError::Page`] when a query fails.
pub async fn extract_essentials(
    page: &dyn BrowserPage,
    mode: EssentialsMode,
    timings: &Timings,
) -> Result<EssentialsReport, ExtractionError> {
    require_section(page, ESSENTIALS_ROOT, timings.section_wait).await?;

    let score: Option<String> =
        query_as(page, &FIRST_TEXT, json!({ "selectors": [SCORE_SELECTOR] })).await?;
    let mut report = EssentialsReport {
        pass_percentage: score.unwrap_or_default(),
        ..EssentialsReport::default()
    };
    if mode == EssentialsMode::ScoreOnly {
        return Ok(report);
    }

    if let Err(e) = page.click(EXPAND_SELECTOR).await {
        tracing::warn!(error = %e, "Essentials expand control missing");
    }
    pause(timings.essentials_settle).await;

    for section in EssentialsSection::ALL {
        let raw: Vec<RawChecklistRow> = query_as(
            page,
            &CHECKLIST_ROWS,
            json!({ "rows": rows_selector(section) }),
        )
        .await?;
        let rows = raw.into_iter().map(ChecklistRow::from).collect();
        match section {
            EssentialsSection::Financials => report.financials = rows,
            EssentialsSection::Ownership => report.ownership = rows,
            EssentialsSection::IndustryComparison => report.industry_comparison = rows,
            EssentialsSection::Others => report.others = rows,
        }
    }
    Ok(report)
}
