pub mod browser;
pub mod error;
pub mod extract;
pub mod login;
pub mod page;
pub mod resolver;
mod retry;
pub mod scripts;
pub mod sink;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use browser::{ChromePage, ChromeSession};
pub use error::{DeliveryError, ExtractionError, PageError, ResolveError, SinkError};
pub use extract::{settle, Stage};
pub use login::{login, LoginOutcome};
pub use page::{query_as, BrowserPage, PageQuery};
pub use resolver::{ResolvedLink, Resolver};
pub use sink::{ApiSink, DeliveryCounts, RecordSink, TextReportSink};
