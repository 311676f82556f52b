//! Best-effort sign-in.
//!
//! A failed login never stops the run: profile pages are still partly
//! readable without a session.

use std::path::Path;

use mcscrape_core::{Credentials, Timings};

use crate::error::PageError;
use crate::page::BrowserPage;

pub const CONSENT_DISMISS: &str = "#wzrk-cancel";
pub const PASSWORD_TAB: &str = r##"li.signup_ctc[data-target="#mc_login"]"##;
pub const LOGIN_FORM: &str = "#mc_login";
pub const EMAIL_FIELD: &str = r#"#mc_login input[name="email"]"#;
pub const PASSWORD_FIELD: &str = r#"#mc_login input[name="pwd"]"#;
pub const SUBMIT_BUTTON: &str = "#mc_login .login_verify_btn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated,
    /// No credentials configured.
    Skipped,
    Failed(String),
}

/// Sign in when credentials are configured.
///
/// On failure a `login_error_<millis>.png` screenshot is saved under
/// `screenshot_dir` when one is given.
pub async fn login(
    page: &dyn BrowserPage,
    login_url: &str,
    credentials: Option<&Credentials>,
    timings: &Timings,
    screenshot_dir: Option<&Path>,
) -> LoginOutcome {
    let Some(credentials) = credentials else {
        tracing::info!("no credentials configured, continuing without login");
        return LoginOutcome::Skipped;
    };

    match submit_login_form(page, login_url, credentials, timings).await {
        Ok(()) => {
            tracing::info!("login submitted");
            LoginOutcome::Authenticated
        }
        Err(e) => {
            tracing::error!(error = %e, "login failed, continuing without a session");
            if let Some(dir) = screenshot_dir {
                let path = dir.join(format!(
                    "login_error_{}.png",
                    chrono::Utc::now().timestamp_millis()
                ));
                if let Err(shot) = page.screenshot(&path).await {
                    tracing::warn!(error = %shot, "failed to save login error screenshot");
                }
            }
            LoginOutcome::Failed(e.to_string())
        }
    }
}

async fn submit_login_form(
    page: &dyn BrowserPage,
    login_url: &str,
    credentials: &Credentials,
    timings: &Timings,
) -> Result<(), PageError> {
    page.goto(login_url, timings.login_navigation).await?;

    if page
        .wait_for_selector(CONSENT_DISMISS, timings.consent_wait)
        .await
        .is_ok()
    {
        if let Err(e) = page.click(CONSENT_DISMISS).await {
            tracing::debug!(error = %e, "consent dialog vanished before dismissal");
        }
    }

    page.wait_for_selector(PASSWORD_TAB, timings.login_tab_wait).await?;
    page.click(PASSWORD_TAB).await?;

    for selector in [LOGIN_FORM, EMAIL_FIELD, PASSWORD_FIELD, SUBMIT_BUTTON] {
        page.wait_for_selector(selector, timings.login_field_wait).await?;
    }
    page.type_text(EMAIL_FIELD, &credentials.email).await?;
    page.type_text(PASSWORD_FIELD, &credentials.password).await?;
    page.click(SUBMIT_BUTTON).await?;

    if let Err(e) = page.wait_for_navigation(timings.login_navigation).await {
        tracing::warn!(error = %e, "no navigation after login submit");
    }
    Ok(())
}
