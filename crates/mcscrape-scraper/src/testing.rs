//! Scripted in-memory [`BrowserPage`] for unit and driver tests.
//!
//! Selectors are either present or absent; waits on absent selectors fail
//! immediately. Queries are answered by the first matching [`QueryRule`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::PageError;
use crate::page::{BrowserPage, PageQuery};

/// One recorded interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Goto(String),
    Click(String),
    Type { selector: String, text: String },
    Key { selector: String, key: String },
    Query { name: String, args: Value },
    Screenshot(PathBuf),
    Closed,
}

/// Canned answer for a named query, optionally conditioned on arguments or
/// on what the page last navigated to or typed.
#[derive(Debug, Clone)]
pub struct QueryRule {
    name: String,
    args: Option<Value>,
    after_goto: Option<String>,
    after_typing: Option<String>,
    remaining: Option<usize>,
    response: Result<Value, String>,
}

impl QueryRule {
    #[must_use]
    pub fn new(query: &PageQuery) -> Self {
        Self {
            name: query.name.to_string(),
            args: None,
            after_goto: None,
            after_typing: None,
            remaining: None,
            response: Ok(Value::Null),
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: Value) -> Self {
        self.args = Some(args);
        self
    }

    /// Match only when the last visited URL contains `fragment`.
    #[must_use]
    pub fn after_goto(mut self, fragment: &str) -> Self {
        self.after_goto = Some(fragment.to_string());
        self
    }

    /// Match only when the last typed text contains `fragment`.
    #[must_use]
    pub fn after_typing(mut self, fragment: &str) -> Self {
        self.after_typing = Some(fragment.to_string());
        self
    }

    /// Stop matching after `n` uses.
    #[must_use]
    pub fn times(mut self, n: usize) -> Self {
        self.remaining = Some(n);
        self
    }

    #[must_use]
    pub fn returns(mut self, value: Value) -> Self {
        self.response = Ok(value);
        self
    }

    #[must_use]
    pub fn fails(mut self, reason: &str) -> Self {
        self.response = Err(reason.to_string());
        self
    }

    fn matches(&self, name: &str, args: &Value, state: &State) -> bool {
        self.name == name
            && self.remaining != Some(0)
            && self.args.as_ref().is_none_or(|a| a == args)
            && self
                .after_goto
                .as_ref()
                .is_none_or(|f| state.last_goto.as_deref().is_some_and(|u| u.contains(f.as_str())))
            && self
                .after_typing
                .as_ref()
                .is_none_or(|f| state.last_typed.as_deref().is_some_and(|t| t.contains(f.as_str())))
    }
}

#[derive(Debug, Clone, Default)]
struct Config {
    selectors: HashSet<String>,
    rules: Vec<QueryRule>,
    failing_gotos: Vec<String>,
    failing_navigation_wait: bool,
}

#[derive(Debug, Default)]
struct State {
    config: Config,
    last_goto: Option<String>,
    last_typed: Option<String>,
    events: Vec<PageEvent>,
    waits: Vec<String>,
}

/// Counters shared by every auxiliary page opened from one parent.
#[derive(Debug, Default)]
pub struct AuxiliaryStats {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
}

#[derive(Clone, Default)]
pub struct ScriptedPage {
    state: Arc<Mutex<State>>,
    auxiliary: Option<Arc<Config>>,
    aux_stats: Arc<AuxiliaryStats>,
    is_auxiliary: bool,
}

impl ScriptedPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_selectors<I, S>(self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock()
            .config
            .selectors
            .extend(selectors.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn on_query(self, rule: QueryRule) -> Self {
        self.lock().config.rules.push(rule);
        self
    }

    /// Navigations to URLs containing `fragment` time out.
    #[must_use]
    pub fn failing_goto(self, fragment: &str) -> Self {
        self.lock().config.failing_gotos.push(fragment.to_string());
        self
    }

    #[must_use]
    pub fn failing_navigation_wait(self) -> Self {
        self.lock().config.failing_navigation_wait = true;
        self
    }

    /// Pages returned by [`BrowserPage::open_auxiliary`] start from `template`'s script.
    #[must_use]
    pub fn with_auxiliary(mut self, template: &ScriptedPage) -> Self {
        self.auxiliary = Some(Arc::new(template.lock().config.clone()));
        self
    }

    #[must_use]
    pub fn events(&self) -> Vec<PageEvent> {
        self.lock().events.clone()
    }

    /// Selectors passed to `wait_for_selector`, in order.
    #[must_use]
    pub fn waited_for(&self) -> Vec<String> {
        self.lock().waits.clone()
    }

    /// URLs passed to `goto`, in order.
    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                PageEvent::Goto(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn queried(&self, query: &PageQuery) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|e| matches!(e, PageEvent::Query { name, .. } if name == query.name))
            .count()
    }

    #[must_use]
    pub fn auxiliary_stats(&self) -> &AuxiliaryStats {
        &self.aux_stats
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn require(&self, selector: &str) -> Result<(), PageError> {
        if self.lock().config.selectors.contains(selector) {
            Ok(())
        } else {
            Err(PageError::ElementNotFound {
                selector: selector.to_string(),
            })
        }
    }

    fn record(&self, event: PageEvent) {
        self.lock().events.push(event);
    }
}

#[async_trait]
impl BrowserPage for ScriptedPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), PageError> {
        let mut state = self.lock();
        state.events.push(PageEvent::Goto(url.to_string()));
        state.last_goto = Some(url.to_string());
        if state
            .config
            .failing_gotos
            .iter()
            .any(|f| url.contains(f.as_str()))
        {
            return Err(PageError::NavigationTimeout {
                url: url.to_string(),
                timeout,
            });
        }
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), PageError> {
        let mut state = self.lock();
        state.waits.push(selector.to_string());
        if state.config.selectors.contains(selector) {
            Ok(())
        } else {
            Err(PageError::SelectorTimeout {
                selector: selector.to_string(),
                timeout,
            })
        }
    }

    async fn click(&self, selector: &str) -> Result<(), PageError> {
        self.require(selector)?;
        self.record(PageEvent::Click(selector.to_string()));
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), PageError> {
        self.require(selector)?;
        let mut state = self.lock();
        state.last_typed = Some(text.to_string());
        state.events.push(PageEvent::Type {
            selector: selector.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn press_key(&self, selector: &str, key: &str) -> Result<(), PageError> {
        self.require(selector)?;
        self.record(PageEvent::Key {
            selector: selector.to_string(),
            key: key.to_string(),
        });
        Ok(())
    }

    async fn wait_for_navigation(&self, timeout: Duration) -> Result<(), PageError> {
        let state = self.lock();
        if state.config.failing_navigation_wait {
            return Err(PageError::NavigationTimeout {
                url: state.last_goto.clone().unwrap_or_default(),
                timeout,
            });
        }
        Ok(())
    }

    async fn query(&self, query: &PageQuery, args: Value) -> Result<Value, PageError> {
        let mut state = self.lock();
        state.events.push(PageEvent::Query {
            name: query.name.to_string(),
            args: args.clone(),
        });
        let index = state
            .config
            .rules
            .iter()
            .position(|rule| rule.matches(query.name, &args, &state));
        let Some(index) = index else {
            return Err(PageError::Evaluate {
                query: query.name.to_string(),
                reason: format!("no scripted response for args {args}"),
            });
        };
        let rule = &mut state.config.rules[index];
        if let Some(remaining) = rule.remaining.as_mut() {
            *remaining -= 1;
        }
        rule.response.clone().map_err(|reason| PageError::Evaluate {
            query: query.name.to_string(),
            reason,
        })
    }

    async fn screenshot(&self, path: &Path) -> Result<(), PageError> {
        self.record(PageEvent::Screenshot(path.to_path_buf()));
        Ok(())
    }

    async fn open_auxiliary(&self) -> Result<Box<dyn BrowserPage>, PageError> {
        let Some(template) = &self.auxiliary else {
            return Err(PageError::Protocol(
                "no auxiliary page scripted".to_string(),
            ));
        };
        self.aux_stats.opened.fetch_add(1, Ordering::SeqCst);
        let page = ScriptedPage {
            state: Arc::new(Mutex::new(State {
                config: (**template).clone(),
                ..State::default()
            })),
            auxiliary: None,
            aux_stats: Arc::clone(&self.aux_stats),
            is_auxiliary: true,
        };
        Ok(Box::new(page))
    }

    async fn close(&self) -> Result<(), PageError> {
        self.record(PageEvent::Closed);
        if self.is_auxiliary {
            self.aux_stats.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
