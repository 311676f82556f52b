//! Best-effort extraction stages.
//!
//! Each extractor returns `Result<T, ExtractionError>`. [`settle`] is the
//! stage boundary: it turns that result into [`Extracted`] and logs why a
//! section came back absent. Nothing past this boundary sees an error.

pub mod essentials;
pub mod insights;
pub mod news;
pub mod profile;
pub mod swot;

use std::time::Duration;

use mcscrape_core::{Extracted, Target};

use crate::error::{ExtractionError, PageError};
use crate::page::BrowserPage;

pub use essentials::extract_essentials;
pub use insights::extract_insights;
pub use news::extract_news;
pub use profile::extract_profile;
pub use swot::extract_swot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Profile,
    Swot,
    Essentials,
    Insights,
    News,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Profile => "profile",
            Stage::Swot => "swot",
            Stage::Essentials => "essentials",
            Stage::Insights => "insights",
            Stage::News => "news",
        }
    }
}

/// Convert a stage result into [`Extracted`], logging the absence reason.
pub fn settle<T>(target: &Target, stage: Stage, result: Result<T, ExtractionError>) -> Extracted<T> {
    match result {
        Ok(value) => {
            tracing::debug!(symbol = %target, stage = stage.as_str(), "stage complete");
            Extracted::Present(value)
        }
        Err(e) => {
            tracing::warn!(
                symbol = %target,
                stage = stage.as_str(),
                error = %e,
                "section unavailable"
            );
            Extracted::Absent
        }
    }
}

/// Wait for a section's root element, mapping a timeout to
/// [`ExtractionError::SectionMissing`].
pub(crate) async fn require_section(
    page: &dyn BrowserPage,
    selector: &'static str,
    timeout: Duration,
) -> Result<(), ExtractionError> {
    match page.wait_for_selector(selector, timeout).await {
        Ok(()) => Ok(()),
        Err(PageError::SelectorTimeout { .. }) => Err(ExtractionError::SectionMissing { selector }),
        Err(e) => Err(e.into()),
    }
}

/// Fixed pause between UI actions. Zero durations return immediately.
pub(crate) async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
