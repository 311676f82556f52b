//! Run profiles: which extractors run for each target and where records go.

use std::str::FromStr;
use std::time::Duration;

use crate::ConfigError;

/// Delivery endpoint used by [`RunProfile::SwotApi`] when `MCSCRAPE_API_URL` is unset.
pub const DEFAULT_SWOT_ENDPOINT: &str =
    "https://profitbooking.in/wp-json/scraper/v1/moneycontrol_swot";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunProfile {
    /// Full text report with news, screenshots on.
    Report,
    /// SWOT summary payload posted to the remote endpoint.
    SwotApi,
    /// Flattened insights payload posted to the remote endpoint.
    InsightsApi,
}

impl RunProfile {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RunProfile::Report => "report",
            RunProfile::SwotApi => "swot-api",
            RunProfile::InsightsApi => "insights-api",
        }
    }
}

impl std::fmt::Display for RunProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "report" => Ok(RunProfile::Report),
            "swot-api" => Ok(RunProfile::SwotApi),
            "insights-api" => Ok(RunProfile::InsightsApi),
            other => Err(format!(
                "unknown profile '{other}' (expected report, swot-api or insights-api)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwotMode {
    /// Titles and summaries only.
    Summary,
    /// Expand each category and collect its bullet list.
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EssentialsMode {
    ScoreOnly,
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Full,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Swot,
    Insights,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkStrategy {
    TextReport(ReportFormat),
    /// POST each record; the backup report receives every record as well.
    Api {
        shape: PayloadShape,
        default_endpoint: Option<&'static str>,
        backup: ReportFormat,
    },
}

/// Stage selection and pacing for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub profile: RunProfile,
    pub swot: SwotMode,
    pub essentials: EssentialsMode,
    pub insights: bool,
    pub news: bool,
    pub screenshots: bool,
    pub sink: SinkStrategy,
    pub pacing: Duration,
}

impl Pipeline {
    #[must_use]
    pub fn for_profile(profile: RunProfile) -> Self {
        match profile {
            RunProfile::Report => Self {
                profile,
                swot: SwotMode::Detailed,
                essentials: EssentialsMode::Detailed,
                insights: true,
                news: true,
                screenshots: true,
                sink: SinkStrategy::TextReport(ReportFormat::Full),
                pacing: Duration::from_secs(5),
            },
            RunProfile::SwotApi => Self {
                profile,
                swot: SwotMode::Summary,
                essentials: EssentialsMode::ScoreOnly,
                insights: true,
                news: false,
                screenshots: false,
                sink: SinkStrategy::Api {
                    shape: PayloadShape::Swot,
                    default_endpoint: Some(DEFAULT_SWOT_ENDPOINT),
                    backup: ReportFormat::Summary,
                },
                pacing: Duration::from_secs(3),
            },
            RunProfile::InsightsApi => Self {
                profile,
                swot: SwotMode::Detailed,
                essentials: EssentialsMode::Detailed,
                insights: true,
                news: false,
                screenshots: false,
                sink: SinkStrategy::Api {
                    shape: PayloadShape::Insights,
                    default_endpoint: None,
                    backup: ReportFormat::Full,
                },
                pacing: Duration::from_secs(3),
            },
        }
    }

    /// Replace the profile's pacing delay when an override is configured.
    #[must_use]
    pub fn with_pacing_override(mut self, pacing_delay_ms: Option<u64>) -> Self {
        if let Some(ms) = pacing_delay_ms {
            self.pacing = Duration::from_millis(ms);
        }
        self
    }

    /// Resolve the delivery endpoint for API profiles.
    ///
    /// Returns `Ok(None)` for the text-report profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when the profile has no built-in
    /// endpoint and `configured` is `None`.
    pub fn endpoint(&self, configured: Option<&str>) -> Result<Option<String>, ConfigError> {
        match &self.sink {
            SinkStrategy::TextReport(_) => Ok(None),
            SinkStrategy::Api {
                default_endpoint, ..
            } => configured
                .or(*default_endpoint)
                .map(|url| Some(url.to_string()))
                .ok_or_else(|| ConfigError::MissingEnvVar("MCSCRAPE_API_URL".to_string())),
        }
    }

    /// Format of the local text report for this run.
    #[must_use]
    pub fn report_format(&self) -> ReportFormat {
        match &self.sink {
            SinkStrategy::TextReport(format) => *format,
            SinkStrategy::Api { backup, .. } => *backup,
        }
    }
}
