//! The browser capability every stage is written against.
//!
//! Stages never touch the browser engine directly. They call [`BrowserPage`],
//! which the chromiumoxide session implements in production and
//! [`crate::testing::ScriptedPage`] implements in tests.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::PageError;

/// A named in-page function. The engine evaluates `(script)(args)` and
/// returns the JSON-serialisable result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub name: &'static str,
    pub script: &'static str,
}

#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Navigate and wait for the load to settle.
    ///
    /// # Errors
    ///
    /// [`PageError::NavigationTimeout`] when `timeout` elapses first.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), PageError>;

    /// # Errors
    ///
    /// [`PageError::SelectorTimeout`] when no element matches within `timeout`.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration)
        -> Result<(), PageError>;

    /// # Errors
    ///
    /// [`PageError::ElementNotFound`] when nothing matches `selector`.
    async fn click(&self, selector: &str) -> Result<(), PageError>;

    /// # Errors
    ///
    /// [`PageError::ElementNotFound`] when nothing matches `selector`.
    async fn type_text(&self, selector: &str, text: &str) -> Result<(), PageError>;

    /// # Errors
    ///
    /// [`PageError::ElementNotFound`] when nothing matches `selector`.
    async fn press_key(&self, selector: &str, key: &str) -> Result<(), PageError>;

    /// # Errors
    ///
    /// [`PageError::NavigationTimeout`] when no navigation completes within `timeout`.
    async fn wait_for_navigation(&self, timeout: Duration) -> Result<(), PageError>;

    /// Evaluate a named in-page function with JSON arguments.
    ///
    /// # Errors
    ///
    /// [`PageError::Evaluate`] when the script throws or cannot be run.
    async fn query(&self, query: &PageQuery, args: Value) -> Result<Value, PageError>;

    /// Save a full-page PNG screenshot.
    ///
    /// # Errors
    ///
    /// [`PageError::Io`] or [`PageError::Protocol`] on capture failure.
    async fn screenshot(&self, path: &Path) -> Result<(), PageError>;

    /// Open a second page in the same session, for transient fetches.
    ///
    /// # Errors
    ///
    /// [`PageError::Protocol`] when the engine cannot create the page.
    async fn open_auxiliary(&self) -> Result<Box<dyn BrowserPage>, PageError>;

    /// # Errors
    ///
    /// [`PageError::Protocol`] when the engine rejects the close.
    async fn close(&self) -> Result<(), PageError>;
}

/// Run `query` and decode its result into `T`.
///
/// # Errors
///
/// Propagates the query error, or [`PageError::Decode`] on a shape mismatch.
pub async fn query_as<T: DeserializeOwned>(
    page: &dyn BrowserPage,
    query: &PageQuery,
    args: Value,
) -> Result<T, PageError> {
    let value = page.query(query, args).await?;
    serde_json::from_value(value).map_err(|source| PageError::Decode {
        query: query.name.to_string(),
        source,
    })
}
