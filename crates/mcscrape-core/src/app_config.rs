use std::path::PathBuf;
use std::time::Duration;

/// Login credentials for the target site. Sourced from the environment only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Client identity and launch options for the browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

/// Every bounded wait and fixed settle delay used by the pipeline.
///
/// `Default` carries the production values. [`Timings::zero`] collapses all
/// of them so scripted pages can drive the pipeline without sleeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Wait for an extractor's root selector before declaring the section absent.
    pub section_wait: Duration,
    /// Navigation bound for search and profile pages; also bounds the page header wait.
    pub navigation: Duration,
    /// Wait for the search engine's organic result list.
    pub search_results_wait: Duration,
    /// Pause between resolver attempts.
    pub search_retry_delay: Duration,
    pub swot_expand_settle: Duration,
    pub swot_collapse_settle: Duration,
    pub essentials_settle: Duration,
    /// Navigation bound for news article pages on the auxiliary page.
    pub article_navigation: Duration,
    pub login_navigation: Duration,
    pub consent_wait: Duration,
    pub login_tab_wait: Duration,
    pub login_field_wait: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            section_wait: Duration::from_secs(5),
            navigation: Duration::from_secs(60),
            search_results_wait: Duration::from_secs(15),
            search_retry_delay: Duration::from_secs(2),
            swot_expand_settle: Duration::from_secs(5),
            swot_collapse_settle: Duration::from_millis(500),
            essentials_settle: Duration::from_secs(2),
            article_navigation: Duration::from_secs(30),
            login_navigation: Duration::from_secs(30),
            consent_wait: Duration::from_secs(5),
            login_tab_wait: Duration::from_secs(15),
            login_field_wait: Duration::from_secs(30),
        }
    }
}

impl Timings {
    #[must_use]
    pub fn zero() -> Self {
        Self {
            section_wait: Duration::ZERO,
            navigation: Duration::ZERO,
            search_results_wait: Duration::ZERO,
            search_retry_delay: Duration::ZERO,
            swot_expand_settle: Duration::ZERO,
            swot_collapse_settle: Duration::ZERO,
            essentials_settle: Duration::ZERO,
            article_navigation: Duration::ZERO,
            login_navigation: Duration::ZERO,
            consent_wait: Duration::ZERO,
            login_tab_wait: Duration::ZERO,
            login_field_wait: Duration::ZERO,
        }
    }
}

/// Runtime configuration. `Debug` is safe to log: [`Credentials`] redacts the password.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub symbols_path: PathBuf,
    pub output_path: PathBuf,
    pub screenshot_dir: PathBuf,
    pub credentials: Option<Credentials>,
    pub login_url: String,
    pub search_url: String,
    pub site_domain: String,
    pub api_url: Option<String>,
    pub browser: BrowserSettings,
    pub search_max_attempts: u32,
    pub pacing_delay_ms: Option<u64>,
    pub request_timeout_secs: u64,
    pub timings: Timings,
}
