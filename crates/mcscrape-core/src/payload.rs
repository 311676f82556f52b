//! JSON bodies posted by the API profiles.

use indexmap::IndexMap;
use serde::Serialize;

use crate::company::{ChecklistRow, EssentialsSection, StatusItem, SwotKind};
use crate::record::OutputRecord;

/// Summary SWOT payload for the `swot-api` profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwotPayload {
    pub symbol: String,
    pub strengths_count: u32,
    pub strengths_summary: String,
    pub weaknesses_count: u32,
    pub weaknesses_summary: String,
    pub opportunities_count: u32,
    pub opportunities_summary: String,
    pub threats_count: u32,
    pub threats_summary: String,
    pub mc_essentials_score: u32,
    /// Raw score text; empty when the page had none.
    pub piotroski_score: String,
    pub piotroski_indicates: String,
    pub three_year_cagr: IndexMap<String, String>,
}

impl SwotPayload {
    #[must_use]
    pub fn from_record(record: &OutputRecord) -> Self {
        let cat = move |kind| record.swot_category(kind);
        Self {
            symbol: record.symbol.clone(),
            strengths_count: cat(SwotKind::Strengths).count,
            strengths_summary: cat(SwotKind::Strengths).summary.clone(),
            weaknesses_count: cat(SwotKind::Weaknesses).count,
            weaknesses_summary: cat(SwotKind::Weaknesses).summary.clone(),
            opportunities_count: cat(SwotKind::Opportunities).count,
            opportunities_summary: cat(SwotKind::Opportunities).summary.clone(),
            threats_count: cat(SwotKind::Threats).count,
            threats_summary: cat(SwotKind::Threats).summary.clone(),
            mc_essentials_score: record.essentials_score(),
            piotroski_score: record
                .insights
                .piotroski_score
                .clone()
                .unwrap_or_default(),
            piotroski_indicates: record.insights.piotroski_indicates.clone(),
            three_year_cagr: record.insights.three_year_cagr.clone(),
        }
    }
}

/// Flattened payload for the `insights-api` profile.
///
/// SWOT detail lists are sent as JSON-encoded strings (`"[]"` when empty)
/// because the receiving endpoint stores them in text columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightsPayload {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Company_Name")]
    pub company_name: String,
    #[serde(rename = "Profile_URL")]
    pub profile_url: String,

    #[serde(rename = "Strengths_Count")]
    pub strengths_count: u32,
    #[serde(rename = "Strengths_Summary")]
    pub strengths_summary: String,
    #[serde(rename = "Strengths_Items")]
    pub strengths_items: String,
    #[serde(rename = "Weaknesses_Count")]
    pub weaknesses_count: u32,
    #[serde(rename = "Weaknesses_Summary")]
    pub weaknesses_summary: String,
    #[serde(rename = "Weaknesses_Items")]
    pub weaknesses_items: String,
    #[serde(rename = "Opportunities_Count")]
    pub opportunities_count: u32,
    #[serde(rename = "Opportunities_Summary")]
    pub opportunities_summary: String,
    #[serde(rename = "Opportunities_Items")]
    pub opportunities_items: String,
    #[serde(rename = "Threats_Count")]
    pub threats_count: u32,
    #[serde(rename = "Threats_Summary")]
    pub threats_summary: String,
    #[serde(rename = "Threats_Items")]
    pub threats_items: String,

    #[serde(rename = "MC_Essentials_Score")]
    pub mc_essentials_score: u32,
    #[serde(rename = "MC_Essentials_Text")]
    pub mc_essentials_text: String,
    #[serde(rename = "Essentials_Financials")]
    pub essentials_financials: IndexMap<String, bool>,
    #[serde(rename = "Essentials_Ownership")]
    pub essentials_ownership: IndexMap<String, bool>,
    #[serde(rename = "Essentials_Industry_Comparison")]
    pub essentials_industry_comparison: IndexMap<String, bool>,
    #[serde(rename = "Essentials_Others")]
    pub essentials_others: IndexMap<String, bool>,

    #[serde(rename = "Piotroski_Score")]
    pub piotroski_score: u8,
    #[serde(rename = "Piotroski_Indicates")]
    pub piotroski_indicates: String,
    #[serde(rename = "Three_Year_CAGR")]
    pub three_year_cagr: IndexMap<String, String>,
    #[serde(rename = "Price_Comparison")]
    pub price_comparison: Vec<StatusItem>,
    #[serde(rename = "Industry_Comparison")]
    pub industry_comparison: Vec<StatusItem>,
}

impl InsightsPayload {
    #[must_use]
    pub fn from_record(record: &OutputRecord) -> Self {
        let cat = move |kind| record.swot_category(kind);
        let items = |kind| encode_items(&cat(kind).details);
        let checklist = |section| checklist_map(record.essentials.section(section));

        Self {
            symbol: record.symbol.clone(),
            company_name: record.profile.name.clone(),
            profile_url: record.profile_url.clone(),
            strengths_count: cat(SwotKind::Strengths).count,
            strengths_summary: cat(SwotKind::Strengths).summary.clone(),
            strengths_items: items(SwotKind::Strengths),
            weaknesses_count: cat(SwotKind::Weaknesses).count,
            weaknesses_summary: cat(SwotKind::Weaknesses).summary.clone(),
            weaknesses_items: items(SwotKind::Weaknesses),
            opportunities_count: cat(SwotKind::Opportunities).count,
            opportunities_summary: cat(SwotKind::Opportunities).summary.clone(),
            opportunities_items: items(SwotKind::Opportunities),
            threats_count: cat(SwotKind::Threats).count,
            threats_summary: cat(SwotKind::Threats).summary.clone(),
            threats_items: items(SwotKind::Threats),
            mc_essentials_score: record.essentials_score(),
            mc_essentials_text: record.essentials.pass_percentage.clone(),
            essentials_financials: checklist(EssentialsSection::Financials),
            essentials_ownership: checklist(EssentialsSection::Ownership),
            essentials_industry_comparison: checklist(EssentialsSection::IndustryComparison),
            essentials_others: checklist(EssentialsSection::Others),
            piotroski_score: record.piotroski().unwrap_or(0),
            piotroski_indicates: record.insights.piotroski_indicates.clone(),
            three_year_cagr: record.insights.three_year_cagr.clone(),
            price_comparison: record.insights.price.clone(),
            industry_comparison: record.insights.industry_comparison.clone(),
        }
    }
}

fn encode_items(details: &[String]) -> String {
    serde_json::to_string(details).unwrap_or_else(|_| "[]".to_string())
}

fn checklist_map(rows: &[ChecklistRow]) -> IndexMap<String, bool> {
    rows.iter().map(|row| (row.text.clone(), row.passed)).collect()
}
