//! Resolver: symbol to profile URL through a site-scoped web search.

use mcscrape_core::{Target, Timings};
use serde_json::json;

use crate::error::ResolveError;
use crate::page::{query_as, BrowserPage};
use crate::retry::retry_with_fixed_delay;
use crate::scripts::SEARCH_RESULT_LINK;

pub const SEARCH_INPUT: &str = "#searchbox_input";
pub const ORGANIC_RESULTS: &str = r#"[data-testid="mainline"] li[data-layout="organic"]"#;

/// Search engine settings for one run.
#[derive(Debug, Clone)]
pub struct Resolver {
    search_url: String,
    site_domain: String,
    max_attempts: u32,
}

/// A target paired with its profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub target: Target,
    pub url: String,
}

impl Resolver {
    #[must_use]
    pub fn new(search_url: &str, site_domain: &str, max_attempts: u32) -> Self {
        Self {
            search_url: search_url.to_string(),
            site_domain: site_domain.to_string(),
            max_attempts,
        }
    }

    #[must_use]
    pub fn search_query(&self, target: &Target) -> String {
        format!("site:{} {} stock price", self.site_domain, target)
    }

    /// Take the first organic result for the target's search.
    ///
    /// # Errors
    ///
    /// [`ResolveError::Exhausted`] wrapping the last attempt's failure once
    /// every attempt has failed.
    pub async fn resolve(
        &self,
        page: &dyn BrowserPage,
        target: &Target,
        timings: &Timings,
    ) -> Result<ResolvedLink, ResolveError> {
        let url = retry_with_fixed_delay(
            self.max_attempts,
            timings.search_retry_delay,
            target.as_str(),
            |attempt| async move {
                tracing::debug!(symbol = %target, attempt, "searching for profile page");
                self.attempt(page, target, timings).await
            },
        )
        .await
        .map_err(|last| ResolveError::Exhausted {
            target: target.to_string(),
            attempts: self.max_attempts.max(1),
            last: Box::new(last),
        })?;

        tracing::info!(symbol = %target, url = %url, "resolved profile page");
        Ok(ResolvedLink {
            target: target.clone(),
            url,
        })
    }

    async fn attempt(
        &self,
        page: &dyn BrowserPage,
        target: &Target,
        timings: &Timings,
    ) -> Result<String, ResolveError> {
        page.goto(&self.search_url, timings.navigation).await?;
        page.type_text(SEARCH_INPUT, &self.search_query(target)).await?;
        page.press_key(SEARCH_INPUT, "Enter").await?;
        if let Err(e) = page.wait_for_navigation(timings.navigation).await {
            tracing::debug!(symbol = %target, error = %e, "no navigation event after search submit");
        }
        page.wait_for_selector(ORGANIC_RESULTS, timings.search_results_wait).await?;

        let link: Option<String> = query_as(
            page,
            &SEARCH_RESULT_LINK,
            json!({ "results": ORGANIC_RESULTS }),
        )
        .await?;
        link.filter(|href| !href.trim().is_empty())
            .ok_or_else(|| ResolveError::NoResult {
                target: target.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::error::PageError;
    use crate::testing::{PageEvent, QueryRule, ScriptedPage};

    const SEARCH_URL: &str = "https://duckduckgo.com/";

    fn resolver() -> Resolver {
        Resolver::new(SEARCH_URL, "moneycontrol.com", 3)
    }

    fn search_page() -> ScriptedPage {
        ScriptedPage::new().with_selectors([SEARCH_INPUT, ORGANIC_RESULTS])
    }

    fn tcs() -> Target {
        Target::new("TCS").unwrap()
    }

    #[test]
    fn builds_site_scoped_query() {
        assert_eq!(
            resolver().search_query(&tcs()),
            "site:moneycontrol.com TCS stock price"
        );
    }

    #[tokio::test]
    async fn first_attempt_success() {
        let page = search_page().on_query(
            QueryRule::new(&SEARCH_RESULT_LINK)
                .returns(json!("https://www.moneycontrol.com/india/stockpricequote/tcs/TCS")),
        );

        let link = resolver().resolve(&page, &tcs(), &Timings::zero()).await.unwrap();
        assert_eq!(link.url, "https://www.moneycontrol.com/india/stockpricequote/tcs/TCS");
        assert_eq!(link.target, tcs());
        assert!(page.events().contains(&PageEvent::Type {
            selector: SEARCH_INPUT.to_string(),
            text: "site:moneycontrol.com TCS stock price".to_string(),
        }));
    }

    #[tokio::test]
    async fn succeeds_on_third_attempt_after_two_transient_failures() {
        let page = search_page()
            .on_query(QueryRule::new(&SEARCH_RESULT_LINK).times(2).fails("results not rendered"))
            .on_query(QueryRule::new(&SEARCH_RESULT_LINK).returns(json!("https://mc.example/infy")));

        let link = resolver().resolve(&page, &tcs(), &Timings::zero()).await.unwrap();
        assert_eq!(link.url, "https://mc.example/infy");
        assert_eq!(page.visited(), vec![SEARCH_URL; 3]);
    }

    #[tokio::test]
    async fn three_failures_exhaust_the_resolver() {
        let page = search_page()
            .on_query(QueryRule::new(&SEARCH_RESULT_LINK).times(3).fails("results not rendered"))
            .on_query(QueryRule::new(&SEARCH_RESULT_LINK).returns(json!("https://too.late/")));

        let err = resolver().resolve(&page, &tcs(), &Timings::zero()).await.unwrap_err();
        assert!(
            matches!(err, ResolveError::Exhausted { ref target, attempts: 3, .. } if target == "TCS"),
            "got: {err:?}"
        );
        assert_eq!(page.visited().len(), 3);
    }

    #[tokio::test]
    async fn empty_result_list_is_no_result() {
        let page = search_page().on_query(QueryRule::new(&SEARCH_RESULT_LINK).returns(Value::Null));
        let err = Resolver::new(SEARCH_URL, "moneycontrol.com", 1)
            .resolve(&page, &tcs(), &Timings::zero())
            .await
            .unwrap_err();
        match err {
            ResolveError::Exhausted { last, .. } => {
                assert!(matches!(*last, ResolveError::NoResult { .. }), "got: {last:?}");
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn results_that_never_render_time_out() {
        let page = ScriptedPage::new().with_selectors([SEARCH_INPUT]);
        let err = Resolver::new(SEARCH_URL, "moneycontrol.com", 2)
            .resolve(&page, &tcs(), &Timings::zero())
            .await
            .unwrap_err();
        match err {
            ResolveError::Exhausted { last, attempts, .. } => {
                assert_eq!(attempts, 2);
                assert!(
                    matches!(*last, ResolveError::Page(PageError::SelectorTimeout { .. })),
                    "got: {last:?}"
                );
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }
}
