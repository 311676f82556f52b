//! chromiumoxide-backed implementation of [`BrowserPage`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Handler, Page};
use futures::StreamExt;
use mcscrape_core::BrowserSettings;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::PageError;
use crate::page::{BrowserPage, PageQuery};

/// Bound on a single in-page evaluation.
const EVALUATE_TIMEOUT: Duration = Duration::from_secs(30);
/// Interval between element polls while waiting for a selector.
const SELECTOR_POLL: Duration = Duration::from_millis(250);

/// One browser process, its CDP handler task and the primary page.
pub struct ChromeSession {
    browser: Arc<Mutex<Browser>>,
    handler_task: JoinHandle<()>,
    page: ChromePage,
}

impl ChromeSession {
    /// Launch the browser and open the primary page with the configured
    /// viewport and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Launch`] if the browser cannot be started or the
    /// primary page cannot be configured.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, PageError> {
        let viewport = Viewport {
            width: settings.viewport_width,
            height: settings.viewport_height,
            ..Viewport::default()
        };
        let mut builder = BrowserConfig::builder()
            .window_size(settings.viewport_width, settings.viewport_height)
            .viewport(viewport)
            .no_sandbox();
        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &settings.chrome_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(PageError::Launch)?;

        let (browser, handler) = Browser::launch(config)
            .await
            .map_err(|e| PageError::Launch(e.to_string()))?;
        let handler_task = spawn_handler_task(handler);

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(PageError::Launch(e.to_string()));
            }
        };
        if let Err(e) = page
            .set_user_agent(SetUserAgentOverrideParams::new(settings.user_agent.clone()))
            .await
        {
            handler_task.abort();
            return Err(PageError::Launch(e.to_string()));
        }

        let browser = Arc::new(Mutex::new(browser));
        tracing::info!(
            headless = settings.headless,
            width = settings.viewport_width,
            height = settings.viewport_height,
            "browser session started"
        );
        Ok(Self {
            page: ChromePage {
                page,
                browser: Arc::clone(&browser),
            },
            browser,
            handler_task,
        })
    }

    #[must_use]
    pub fn page(&self) -> &ChromePage {
        &self.page
    }

    /// Close the browser and stop the handler task. Errors are logged only.
    pub async fn shutdown(self) {
        let mut browser = self.browser.lock().await;
        if let Err(e) = browser.close().await {
            tracing::warn!(error = %e, "browser close failed");
        }
        if let Err(e) = browser.wait().await {
            tracing::warn!(error = %e, "browser process wait failed");
        }
        self.handler_task.abort();
        tracing::info!("browser session closed");
    }
}

fn spawn_handler_task(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::warn!(error = %e, "chromiumoxide handler event error");
            }
        }
    })
}

/// A page in the shared session.
pub struct ChromePage {
    page: Page,
    browser: Arc<Mutex<Browser>>,
}

impl ChromePage {
    async fn element(&self, selector: &str) -> Result<chromiumoxide::element::Element, PageError> {
        self.page
            .find_element(selector)
            .await
            .map_err(|_| PageError::ElementNotFound {
                selector: selector.to_string(),
            })
    }
}

#[async_trait]
impl BrowserPage for ChromePage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), PageError> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(result) => result.map(|_| ()).map_err(PageError::from),
            Err(_) => Err(PageError::NavigationTimeout {
                url: url.to_string(),
                timeout,
            }),
        }
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), PageError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(PageError::SelectorTimeout {
                    selector: selector.to_string(),
                    timeout,
                });
            }
            tokio::time::sleep(SELECTOR_POLL).await;
        }
    }

    async fn click(&self, selector: &str) -> Result<(), PageError> {
        self.element(selector).await?.click().await?;
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), PageError> {
        let element = self.element(selector).await?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn press_key(&self, selector: &str, key: &str) -> Result<(), PageError> {
        self.element(selector).await?.press_key(key).await?;
        Ok(())
    }

    async fn wait_for_navigation(&self, timeout: Duration) -> Result<(), PageError> {
        match tokio::time::timeout(timeout, self.page.wait_for_navigation()).await {
            Ok(result) => result.map(|_| ()).map_err(PageError::from),
            Err(_) => Err(PageError::NavigationTimeout {
                url: self.page.url().await.ok().flatten().unwrap_or_default(),
                timeout,
            }),
        }
    }

    async fn query(&self, query: &PageQuery, args: Value) -> Result<Value, PageError> {
        // Stringify in-page so `null` and `undefined` survive the CDP round trip.
        let expression = format!(
            "(() => {{ const r = ({})({}); return JSON.stringify(r === undefined ? null : r); }})()",
            query.script, args
        );
        let evaluate_err = |reason: String| PageError::Evaluate {
            query: query.name.to_string(),
            reason,
        };
        let result = tokio::time::timeout(EVALUATE_TIMEOUT, self.page.evaluate(expression))
            .await
            .map_err(|_| evaluate_err(format!("timed out after {EVALUATE_TIMEOUT:?}")))?
            .map_err(|e| evaluate_err(e.to_string()))?;
        let raw: String = result
            .into_value()
            .map_err(|source| PageError::Decode {
                query: query.name.to_string(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| PageError::Decode {
            query: query.name.to_string(),
            source,
        })
    }

    async fn screenshot(&self, path: &Path) -> Result<(), PageError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        self.page
            .save_screenshot(ScreenshotParams::builder().full_page(true).build(), path)
            .await?;
        Ok(())
    }

    async fn open_auxiliary(&self) -> Result<Box<dyn BrowserPage>, PageError> {
        let page = self.browser.lock().await.new_page("about:blank").await?;
        Ok(Box::new(ChromePage {
            page,
            browser: Arc::clone(&self.browser),
        }))
    }

    async fn close(&self) -> Result<(), PageError> {
        self.page.clone().close().await?;
        Ok(())
    }
}
