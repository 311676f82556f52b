//! Where assembled records go.
//!
//! A run writes to exactly one [`RecordSink`]. The text report is always
//! present; API profiles wrap it in an [`ApiSink`] that also POSTs each record.

pub mod api;
pub mod report;

use async_trait::async_trait;
use mcscrape_core::{OutputRecord, Target};

use crate::error::SinkError;

pub use api::ApiSink;
pub use report::TextReportSink;

/// Fixed-width separator between report blocks.
pub const SEPARATOR_WIDTH: usize = 80;

/// Records accepted and rejected by a remote endpoint during one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryCounts {
    pub delivered: usize,
    pub rejected: usize,
}

#[async_trait]
pub trait RecordSink: Send {
    /// Emit one assembled record.
    ///
    /// # Errors
    ///
    /// [`SinkError::Io`] when the local report cannot be written. Remote
    /// delivery failures are logged by the sink and never surface here.
    async fn emit(&mut self, record: &OutputRecord) -> Result<(), SinkError>;

    /// Record that processing `target` failed.
    ///
    /// # Errors
    ///
    /// [`SinkError::Io`] when the local report cannot be written.
    async fn record_failure(&mut self, target: &Target, message: &str) -> Result<(), SinkError>;

    /// Remote delivery tally, for sinks that deliver anywhere but local files.
    fn deliveries(&self) -> Option<DeliveryCounts> {
        None
    }
}
