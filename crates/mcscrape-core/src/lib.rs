//! Shared types, configuration, and pure data shaping for the symbol scraper.
//!
//! Nothing in this crate touches a browser or the network: it loads the
//! target list and configuration, defines the per-symbol domain types, and
//! merges extractor results into output records and delivery payloads.

pub mod app_config;
pub mod company;
mod config;
pub mod payload;
pub mod pipeline;
pub mod record;
pub mod targets;

use thiserror::Error;

pub use app_config::{AppConfig, BrowserSettings, Credentials, Timings};
pub use company::{
    ChecklistRow, CompanyProfile, EssentialsReport, EssentialsSection, Extracted,
    FinancialInsights, InsightStatus, NewsItem, StatusItem, SwotCategory, SwotKind,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use payload::{InsightsPayload, SwotPayload};
pub use pipeline::{
    EssentialsMode, PayloadShape, Pipeline, ReportFormat, RunProfile, SinkStrategy, SwotMode,
};
pub use record::{assemble, AssemblyInput, OutputRecord, SectionAvailability};
pub use targets::{load_targets, parse_targets, InputError, Target};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
