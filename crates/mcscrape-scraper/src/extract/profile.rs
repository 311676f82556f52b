//! Company header: display name, last price and change.

use mcscrape_core::{CompanyProfile, Target};
use serde_json::json;

use crate::error::ExtractionError;
use crate::page::{query_as, BrowserPage};
use crate::scripts::FIRST_TEXT;

/// Present once the quote page has rendered its company header.
pub const PROFILE_HEADER: &str = ".pcstname, h1";
pub const NAME_SELECTORS: &[&str] = &[".pcstname", "h1"];
pub const PRICE_SELECTORS: &[&str] = &["#nsecp", "#bsecp"];
pub const CHANGE_SELECTORS: &[&str] = &["#nsechange", "#bsechange"];

/// Read the header, falling back to the symbol for the name and `N/A`
/// for price and change.
///
/// # Errors
///
/// Returns [`ExtractionError::Page`] if the page cannot be queried.
pub async fn extract_profile(
    page: &dyn BrowserPage,
    target: &Target,
) -> Result<CompanyProfile, ExtractionError> {
    let name = first_text(page, NAME_SELECTORS).await?;
    let price = first_text(page, PRICE_SELECTORS).await?;
    let change = first_text(page, CHANGE_SELECTORS).await?;

    Ok(CompanyProfile {
        name: name.unwrap_or_else(|| target.as_str().to_string()),
        price: price.unwrap_or_else(|| CompanyProfile::NOT_AVAILABLE.to_string()),
        change: change.unwrap_or_else(|| CompanyProfile::NOT_AVAILABLE.to_string()),
    })
}

async fn first_text(
    page: &dyn BrowserPage,
    selectors: &[&str],
) -> Result<Option<String>, ExtractionError> {
    let text: Option<String> =
        query_as(page, &FIRST_TEXT, json!({ "selectors": selectors })).await?;
    Ok(text.filter(|t| !t.trim().is_empty()))
}
