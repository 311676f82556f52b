//! Per-symbol domain types produced by the extractors.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Outcome of one best-effort extraction stage.
///
/// `Absent` means the section could not be read, for whatever reason; the
/// reason is logged at the stage boundary and is not carried further.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    Present(T),
    Absent,
}

impl<T> Extracted<T> {
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Extracted::Present(_))
    }

    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Extracted::Present(value) => Some(value),
            Extracted::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for Extracted<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Extracted::Absent, Extracted::Present)
    }
}

/// Header facts from the company profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub price: String,
    pub change: String,
}

impl CompanyProfile {
    pub const NOT_AVAILABLE: &'static str = "N/A";

    /// The profile used when the page yields nothing: the symbol stands in for the name.
    #[must_use]
    pub fn fallback(symbol: &str) -> Self {
        Self {
            name: symbol.to_string(),
            price: Self::NOT_AVAILABLE.to_string(),
            change: Self::NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwotKind {
    Strengths,
    Weaknesses,
    Opportunities,
    Threats,
}

impl SwotKind {
    pub const ALL: [SwotKind; 4] = [
        SwotKind::Strengths,
        SwotKind::Weaknesses,
        SwotKind::Opportunities,
        SwotKind::Threats,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SwotKind::Strengths => "Strengths",
            SwotKind::Weaknesses => "Weaknesses",
            SwotKind::Opportunities => "Opportunities",
            SwotKind::Threats => "Threats",
        }
    }
}

impl std::fmt::Display for SwotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwotCategory {
    pub kind: SwotKind,
    pub count: u32,
    pub summary: String,
    /// Expanded bullet list; empty unless the detailed SWOT mode ran.
    pub details: Vec<String>,
}

impl SwotCategory {
    #[must_use]
    pub fn empty(kind: SwotKind) -> Self {
        Self {
            kind,
            count: 0,
            summary: String::new(),
            details: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EssentialsSection {
    Financials,
    Ownership,
    IndustryComparison,
    Others,
}

impl EssentialsSection {
    pub const ALL: [EssentialsSection; 4] = [
        EssentialsSection::Financials,
        EssentialsSection::Ownership,
        EssentialsSection::IndustryComparison,
        EssentialsSection::Others,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            EssentialsSection::Financials => "Financials",
            EssentialsSection::Ownership => "Ownership",
            EssentialsSection::IndustryComparison => "Industry Comparison",
            EssentialsSection::Others => "Others",
        }
    }
}

/// One checklist line. `passed` reflects the checkmark icon, never the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistRow {
    pub text: String,
    pub passed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssentialsReport {
    /// Raw score text, e.g. `"Pass 10/12 (83%)"`.
    pub pass_percentage: String,
    pub financials: Vec<ChecklistRow>,
    pub ownership: Vec<ChecklistRow>,
    pub industry_comparison: Vec<ChecklistRow>,
    pub others: Vec<ChecklistRow>,
}

impl EssentialsReport {
    #[must_use]
    pub fn section(&self, section: EssentialsSection) -> &[ChecklistRow] {
        match section {
            EssentialsSection::Financials => &self.financials,
            EssentialsSection::Ownership => &self.ownership,
            EssentialsSection::IndustryComparison => &self.industry_comparison,
            EssentialsSection::Others => &self.others,
        }
    }

    #[must_use]
    pub fn has_details(&self) -> bool {
        EssentialsSection::ALL
            .iter()
            .any(|s| !self.section(*s).is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightStatus {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl InsightStatus {
    /// Map a row's CSS class list to a status. Green is positive, red is
    /// negative, grey/neutral is neutral; anything else is unknown.
    #[must_use]
    pub fn from_class(class_list: &str) -> Self {
        let lower = class_list.to_ascii_lowercase();
        if lower.contains("green") {
            InsightStatus::Positive
        } else if lower.contains("red") {
            InsightStatus::Negative
        } else if lower.contains("grey") || lower.contains("gray") || lower.contains("neutral") {
            InsightStatus::Neutral
        } else {
            InsightStatus::Unknown
        }
    }

    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            InsightStatus::Positive => "+",
            InsightStatus::Negative => "-",
            InsightStatus::Neutral => "=",
            InsightStatus::Unknown => "?",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusItem {
    pub text: String,
    pub status: InsightStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialInsights {
    /// Score text as shown on the page, e.g. `"7"`.
    pub piotroski_score: Option<String>,
    pub piotroski_indicates: String,
    /// Metric label to value, in document order.
    pub three_year_cagr: IndexMap<String, String>,
    pub price: Vec<StatusItem>,
    pub industry_comparison: Vec<StatusItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub time: String,
    pub content: String,
}
