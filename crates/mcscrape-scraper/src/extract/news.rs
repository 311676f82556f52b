//! Recent news with article ledes fetched on a transient auxiliary page.

use mcscrape_core::{NewsItem, Timings};
use serde::Deserialize;
use serde_json::json;

use crate::error::{ExtractionError, PageError};
use crate::page::{query_as, BrowserPage};
use crate::scripts::{ARTICLE_TEXT, NEWS_LIST};

pub const NEWS_ITEMS: &str = ".newsblock1, .news_list li";
pub const ARTICLE_SELECTOR: &str = "h2.article_desc";
pub const MAX_NEWS_ITEMS: usize = 5;

pub const NO_TITLE: &str = "No title";
pub const NO_URL: &str = "#";
pub const NO_TIME: &str = "N/A";
pub const NO_CONTENT: &str = "No content available";
pub const CONTENT_FAILED: &str = "Failed to retrieve article content";

#[derive(Debug, Deserialize)]
struct RawNewsItem {
    title: Option<String>,
    url: Option<String>,
    time: Option<String>,
}

fn non_blank(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Read up to [`MAX_NEWS_ITEMS`] headlines and fetch each article's lede.
///
/// A failed article fetch only affects that item's content.
///
/// # Errors
///
/// [`ExtractionError::Page`] when the headline list cannot be read.
pub async fn extract_news(
    page: &dyn BrowserPage,
    timings: &Timings,
) -> Result<Vec<NewsItem>, ExtractionError> {
    let raw: Vec<RawNewsItem> = query_as(
        page,
        &NEWS_LIST,
        json!({ "items": NEWS_ITEMS, "limit": MAX_NEWS_ITEMS }),
    )
    .await?;

    let mut items = Vec::with_capacity(raw.len().min(MAX_NEWS_ITEMS));
    for entry in raw.into_iter().take(MAX_NEWS_ITEMS) {
        let url = non_blank(entry.url, NO_URL);
        let content = if url == NO_URL {
            NO_CONTENT.to_string()
        } else {
            match fetch_article(page, &url, timings).await {
                Ok(Some(text)) if !text.is_empty() => text,
                Ok(_) => NO_CONTENT.to_string(),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "article fetch failed");
                    CONTENT_FAILED.to_string()
                }
            }
        };
        items.push(NewsItem {
            title: non_blank(entry.title, NO_TITLE),
            url,
            time: non_blank(entry.time, NO_TIME),
            content,
        });
    }
    Ok(items)
}

/// Open an auxiliary page, read the lede, and close the page whatever the outcome.
async fn fetch_article(
    page: &dyn BrowserPage,
    url: &str,
    timings: &Timings,
) -> Result<Option<String>, PageError> {
    let article = page.open_auxiliary().await?;
    let result = read_article(article.as_ref(), url, timings).await;
    if let Err(e) = article.close().await {
        tracing::debug!(url, error = %e, "auxiliary page close failed");
    }
    result
}

async fn read_article(
    article: &dyn BrowserPage,
    url: &str,
    timings: &Timings,
) -> Result<Option<String>, PageError> {
    article.goto(url, timings.article_navigation).await?;
    let text: Option<String> =
        query_as(article, &ARTICLE_TEXT, json!({ "selector": ARTICLE_SELECTOR })).await?;
    match text {
        Some(text) => Ok(Some(text)),
        None => Err(PageError::ElementNotFound {
            selector: ARTICLE_SELECTOR.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use serde_json::Value;

    use super::*;
    use crate::testing::{QueryRule, ScriptedPage};

    fn article_template() -> ScriptedPage {
        ScriptedPage::new()
            .failing_goto("/slow-article")
            .on_query(
                QueryRule::new(&ARTICLE_TEXT)
                    .after_goto("/results-story")
                    .returns(json!("Quarterly profit rose 9%.")),
            )
            .on_query(
                QueryRule::new(&ARTICLE_TEXT)
                    .after_goto("/empty-story")
                    .returns(json!("")),
            )
            .on_query(
                QueryRule::new(&ARTICLE_TEXT)
                    .after_goto("/no-lede")
                    .returns(Value::Null),
            )
    }

    fn list_page(items: Value) -> ScriptedPage {
        ScriptedPage::new()
            .on_query(QueryRule::new(&NEWS_LIST).returns(items))
            .with_auxiliary(&article_template())
    }

    #[tokio::test]
    async fn fills_defaults_and_fetches_content() {
        let page = list_page(json!([
            { "title": "Q2 results beat estimates", "url": "https://news.example/results-story", "time": "Oct 12, 2026" },
            { "title": null, "url": null, "time": null },
        ]));

        let news = extract_news(&page, &Timings::zero()).await.unwrap();
        assert_eq!(news.len(), 2);
        assert_eq!(news[0].content, "Quarterly profit rose 9%.");
        assert_eq!(news[0].time, "Oct 12, 2026");
        assert_eq!(news[1].title, NO_TITLE);
        assert_eq!(news[1].url, NO_URL);
        assert_eq!(news[1].time, NO_TIME);
        assert_eq!(news[1].content, NO_CONTENT);
    }

    #[tokio::test]
    async fn article_failures_are_isolated_per_item() {
        let page = list_page(json!([
            { "title": "Slow", "url": "https://news.example/slow-article", "time": "1h" },
            { "title": "Empty", "url": "https://news.example/empty-story", "time": "2h" },
            { "title": "No lede", "url": "https://news.example/no-lede", "time": "3h" },
            { "title": "Good", "url": "https://news.example/results-story", "time": "4h" },
        ]));

        let news = extract_news(&page, &Timings::zero()).await.unwrap();
        let contents: Vec<&str> = news.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![CONTENT_FAILED, NO_CONTENT, CONTENT_FAILED, "Quarterly profit rose 9%."]
        );
    }

    #[tokio::test]
    async fn auxiliary_page_is_closed_after_every_fetch() {
        let page = list_page(json!([
            { "title": "Slow", "url": "https://news.example/slow-article", "time": "1h" },
            { "title": "Good", "url": "https://news.example/results-story", "time": "4h" },
            { "title": "Anchor only", "url": "#", "time": "5h" },
        ]));

        extract_news(&page, &Timings::zero()).await.unwrap();
        let stats = page.auxiliary_stats();
        assert_eq!(stats.opened.load(Ordering::SeqCst), 2);
        assert_eq!(stats.closed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn takes_at_most_five_items() {
        let items: Vec<Value> = (0..8)
            .map(|i| json!({ "title": format!("Story {i}"), "url": "#", "time": "now" }))
            .collect();
        let page = list_page(Value::Array(items));

        let news = extract_news(&page, &Timings::zero()).await.unwrap();
        assert_eq!(news.len(), MAX_NEWS_ITEMS);
        assert_eq!(news[4].title, "Story 4");
    }

    #[tokio::test]
    async fn unreadable_list_is_an_error() {
        let page = ScriptedPage::new();
        assert!(extract_news(&page, &Timings::zero()).await.is_err());
    }
}
