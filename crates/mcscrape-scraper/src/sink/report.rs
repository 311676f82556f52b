//! Cumulative UTF-8 text report.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use mcscrape_core::{EssentialsSection, OutputRecord, ReportFormat, StatusItem, SwotKind, Target};

use super::{RecordSink, SEPARATOR_WIDTH};
use crate::error::SinkError;

pub const REPORT_TITLE: &str = "Moneycontrol Data Scrape";

/// Appends one block per record to `W`, flushing after every block.
pub struct TextReportSink<W: Write + Send> {
    writer: W,
    format: ReportFormat,
    label: String,
}

impl TextReportSink<File> {
    /// Create (truncating) the report file and write its header.
    ///
    /// # Errors
    ///
    /// [`SinkError::Io`] when the file cannot be created or written.
    pub fn create(path: &Path, format: ReportFormat) -> Result<Self, SinkError> {
        let label = path.display().to_string();
        let file = File::create(path).map_err(|source| SinkError::Io {
            path: label.clone(),
            source,
        })?;
        Self::with_label(file, format, label)
    }
}

impl<W: Write + Send> TextReportSink<W> {
    /// Wrap an arbitrary writer and write the report header to it.
    ///
    /// # Errors
    ///
    /// [`SinkError::Io`] when the header cannot be written.
    pub fn new(writer: W, format: ReportFormat) -> Result<Self, SinkError> {
        Self::with_label(writer, format, "<report>".to_string())
    }

    fn with_label(writer: W, format: ReportFormat, label: String) -> Result<Self, SinkError> {
        let mut sink = Self {
            writer,
            format,
            label,
        };
        let started = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        sink.write_block(|w| write!(w, "{REPORT_TITLE} - {started}\n\n"))?;
        Ok(sink)
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_block(
        &mut self,
        render: impl FnOnce(&mut W) -> io::Result<()>,
    ) -> Result<(), SinkError> {
        render(&mut self.writer)
            .and_then(|()| self.writer.flush())
            .map_err(|source| SinkError::Io {
                path: self.label.clone(),
                source,
            })
    }
}

#[async_trait]
impl<W: Write + Send> RecordSink for TextReportSink<W> {
    async fn emit(&mut self, record: &OutputRecord) -> Result<(), SinkError> {
        let format = self.format;
        self.write_block(|w| match format {
            ReportFormat::Full => write_full(w, record),
            ReportFormat::Summary => write_summary(w, record),
        })?;
        tracing::debug!(symbol = %record.symbol, "record appended to report");
        Ok(())
    }

    async fn record_failure(&mut self, target: &Target, message: &str) -> Result<(), SinkError> {
        self.write_block(|w| write!(w, "\nERROR PROCESSING {target}: {message}\n\n"))
    }
}

fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

/// `Key: value` block used by the API profiles' backup report.
///
/// # Errors
///
/// Any error from the underlying writer.
pub fn write_summary<W: Write>(w: &mut W, record: &OutputRecord) -> io::Result<()> {
    write!(w, "\n{}\nSymbol: {}\n\n", separator(), record.symbol)?;

    for kind in SwotKind::ALL {
        let category = record.swot_category(kind);
        writeln!(w, "{kind}_Count: {}", category.count)?;
        if !category.summary.is_empty() {
            writeln!(w, "{kind}_Summary: {}", category.summary)?;
        }
    }

    writeln!(w, "MC_Essentials_Score: {}", record.essentials_score())?;

    let insights = &record.insights;
    if let Some(score) = &insights.piotroski_score {
        writeln!(w, "Piotroski_Score: {score}")?;
    }
    if !insights.piotroski_indicates.is_empty() {
        writeln!(w, "Piotroski_Indicates: {}", insights.piotroski_indicates)?;
    }
    if !insights.three_year_cagr.is_empty() {
        writeln!(w, "Three_Year_CAGR:")?;
        for (label, value) in &insights.three_year_cagr {
            writeln!(w, "  {label}: {value}")?;
        }
    }

    write!(w, "{}\n\n", separator())
}

/// Human-readable block with every section the run collected.
///
/// # Errors
///
/// Any error from the underlying writer.
pub fn write_full<W: Write>(w: &mut W, record: &OutputRecord) -> io::Result<()> {
    let sep = separator();
    writeln!(w, "{sep}")?;
    writeln!(
        w,
        "Company: {} ({})",
        record.profile.name.to_uppercase(),
        record.symbol
    )?;
    writeln!(w, "Profile URL: {}", record.profile_url)?;
    writeln!(w, "Price: {}", record.profile.price)?;
    writeln!(w, "Change: {}", record.profile.change)?;
    writeln!(w, "{sep}")?;

    write_essentials(w, record)?;
    write_swot(w, record)?;
    write_insights(w, record)?;
    if record.available.news {
        write_news(w, record)?;
    }

    write!(w, "\n{sep}\n\n")
}

fn write_essentials<W: Write>(w: &mut W, record: &OutputRecord) -> io::Result<()> {
    writeln!(w, "\nMC Essentials:")?;
    if !record.available.essentials {
        return writeln!(w, "  No MC Essentials data available");
    }
    let essentials = &record.essentials;
    writeln!(w, "  Overall Score: {}", essentials.pass_percentage)?;
    for section in EssentialsSection::ALL {
        let rows = essentials.section(section);
        if rows.is_empty() {
            continue;
        }
        writeln!(w, "\n  {}:", section.label())?;
        for row in rows {
            let mark = if row.passed { '✓' } else { '✗' };
            writeln!(w, "    {mark} {}", row.text)?;
        }
    }
    Ok(())
}

fn write_swot<W: Write>(w: &mut W, record: &OutputRecord) -> io::Result<()> {
    writeln!(w, "\nSWOT Analysis:")?;
    if !record.available.swot {
        return writeln!(w, "  No SWOT analysis data available");
    }
    for category in &record.swot {
        writeln!(w, "\n  {} ({})", category.kind, category.count)?;
        if !category.summary.is_empty() {
            writeln!(w, "     Summary: {}", category.summary)?;
        }
        if !category.details.is_empty() {
            writeln!(w, "     Details:")?;
            for (i, detail) in category.details.iter().enumerate() {
                writeln!(w, "       {}. {detail}", i + 1)?;
            }
        }
    }
    Ok(())
}

fn write_insights<W: Write>(w: &mut W, record: &OutputRecord) -> io::Result<()> {
    writeln!(w, "\nFinancial Insights:")?;
    if !record.available.insights {
        return writeln!(w, "  No financial insights available");
    }
    let insights = &record.insights;
    if let Some(score) = &insights.piotroski_score {
        writeln!(w, "  Piotroski Score: {score}")?;
    }
    if !insights.piotroski_indicates.is_empty() {
        writeln!(w, "  Piotroski Indicates: {}", insights.piotroski_indicates)?;
    }
    if !insights.three_year_cagr.is_empty() {
        writeln!(w, "  3 Year CAGR:")?;
        for (label, value) in &insights.three_year_cagr {
            writeln!(w, "    {label}: {value}")?;
        }
    }
    write_status_items(w, "Price", &insights.price)?;
    write_status_items(w, "Industry Comparison", &insights.industry_comparison)
}

fn write_status_items<W: Write>(
    w: &mut W,
    heading: &str,
    items: &[StatusItem],
) -> io::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(w, "  {heading}:")?;
    for item in items {
        writeln!(w, "    [{}] {}", item.status.marker(), item.text)?;
    }
    Ok(())
}

fn write_news<W: Write>(w: &mut W, record: &OutputRecord) -> io::Result<()> {
    writeln!(w, "\nRecent News ({} items):", record.news.len())?;
    for (i, item) in record.news.iter().enumerate() {
        writeln!(w, "\n  {}. [{}] {}", i + 1, item.time, item.title)?;
        writeln!(w, "     {}", item.content)?;
        writeln!(w, "     Read more: {}", item.url)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
