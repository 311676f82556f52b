//! Record Assembler: merges per-stage results for one target into an
//! [`OutputRecord`] with every field defaulted.

use std::sync::LazyLock;

use regex::Regex;

use crate::company::{
    CompanyProfile, EssentialsReport, Extracted, FinancialInsights, NewsItem, SwotCategory,
    SwotKind,
};
use crate::targets::Target;

static PERCENT_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*%").expect("valid regex"));
static FIRST_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Everything the extractors produced for one target.
#[derive(Debug, Clone)]
pub struct AssemblyInput {
    pub target: Target,
    pub profile_url: String,
    pub profile: Extracted<CompanyProfile>,
    pub swot: Extracted<Vec<SwotCategory>>,
    pub essentials: Extracted<EssentialsReport>,
    pub insights: Extracted<FinancialInsights>,
    pub news: Extracted<Vec<NewsItem>>,
}

impl AssemblyInput {
    /// An input with every stage absent.
    #[must_use]
    pub fn empty(target: Target, profile_url: impl Into<String>) -> Self {
        Self {
            target,
            profile_url: profile_url.into(),
            profile: Extracted::Absent,
            swot: Extracted::Absent,
            essentials: Extracted::Absent,
            insights: Extracted::Absent,
            news: Extracted::Absent,
        }
    }
}

/// Which stages returned data. Only the text report reads these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionAvailability {
    pub profile: bool,
    pub swot: bool,
    pub essentials: bool,
    pub insights: bool,
    pub news: bool,
}

/// One fully-defaulted record. `swot` always holds the four categories in
/// [`SwotKind::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub symbol: String,
    pub profile_url: String,
    pub profile: CompanyProfile,
    pub swot: [SwotCategory; 4],
    pub essentials: EssentialsReport,
    pub insights: FinancialInsights,
    pub news: Vec<NewsItem>,
    pub available: SectionAvailability,
}

impl OutputRecord {
    #[must_use]
    pub fn swot_category(&self, kind: SwotKind) -> &SwotCategory {
        &self.swot[kind_index(kind)]
    }

    /// Numeric Essentials score derived from the raw score text.
    #[must_use]
    pub fn essentials_score(&self) -> u32 {
        essentials_score(&self.essentials.pass_percentage)
    }

    #[must_use]
    pub fn piotroski(&self) -> Option<u8> {
        self.insights
            .piotroski_score
            .as_deref()
            .and_then(piotroski_score)
    }
}

fn kind_index(kind: SwotKind) -> usize {
    match kind {
        SwotKind::Strengths => 0,
        SwotKind::Weaknesses => 1,
        SwotKind::Opportunities => 2,
        SwotKind::Threats => 3,
    }
}

/// Merge stage results, defaulting anything absent.
#[must_use]
pub fn assemble(input: AssemblyInput) -> OutputRecord {
    let available = SectionAvailability {
        profile: input.profile.is_present(),
        swot: input.swot.is_present(),
        essentials: input.essentials.is_present(),
        insights: input.insights.is_present(),
        news: input.news.is_present(),
    };

    let symbol = input.target.as_str().to_string();
    let profile = input
        .profile
        .into_option()
        .unwrap_or_else(|| CompanyProfile::fallback(&symbol));

    let mut swot = SwotKind::ALL.map(SwotCategory::empty);
    if let Extracted::Present(categories) = input.swot {
        for category in categories {
            let slot = kind_index(category.kind);
            swot[slot] = category;
        }
    }

    OutputRecord {
        symbol,
        profile_url: input.profile_url,
        profile,
        swot,
        essentials: input.essentials.into_option().unwrap_or_default(),
        insights: input.insights.into_option().unwrap_or_default(),
        news: input.news.into_option().unwrap_or_default(),
        available,
    }
}

/// Percentage embedded in a score string such as `"Pass 10/12 (83%)"`.
///
/// Prefers the digits directly before `%`, then the first digit run, then 0.
#[must_use]
pub fn essentials_score(text: &str) -> u32 {
    PERCENT_DIGITS
        .captures(text)
        .and_then(|c| c.get(1))
        .or_else(|| FIRST_DIGITS.find(text))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Parse a Piotroski score (0 to 9) from page text.
#[must_use]
pub fn piotroski_score(text: &str) -> Option<u8> {
    text.trim().parse::<u8>().ok().filter(|score| *score <= 9)
}

/// Digits inside the first `(...)` of a SWOT title, e.g. `"Strengths (12)"`.
#[must_use]
pub fn swot_count(title: &str) -> u32 {
    static PAREN_DIGITS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("valid regex"));
    PAREN_DIGITS
        .captures(title)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
