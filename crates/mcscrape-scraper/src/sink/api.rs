//! HTTP delivery of assembled records.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use mcscrape_core::{InsightsPayload, OutputRecord, PayloadShape, SwotPayload, Target};
use reqwest::Client;

use super::report::TextReportSink;
use super::{DeliveryCounts, RecordSink};
use crate::error::{DeliveryError, SinkError};

/// POSTs every record as JSON and mirrors it into a backup text report.
pub struct ApiSink<W: Write + Send + Sync> {
    client: Client,
    endpoint: String,
    shape: PayloadShape,
    backup: TextReportSink<W>,
    delivered: usize,
    rejected: usize,
}

impl<W: Write + Send + Sync> ApiSink<W> {
    /// # Errors
    ///
    /// [`SinkError::Client`] if the `reqwest::Client` cannot be constructed.
    pub fn new(
        endpoint: &str,
        shape: PayloadShape,
        timeout_secs: u64,
        backup: TextReportSink<W>,
    ) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("mcscrape/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SinkError::Client)?;

        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
            shape,
            backup,
            delivered: 0,
            rejected: 0,
        })
    }

    /// POST one record in this sink's payload shape.
    ///
    /// # Errors
    ///
    /// - [`DeliveryError::Status`] when the endpoint answers with a non-2xx status.
    /// - [`DeliveryError::Http`] on connection failure or timeout.
    pub async fn deliver(&self, record: &OutputRecord) -> Result<(), DeliveryError> {
        let request = self.client.post(&self.endpoint);
        let request = match self.shape {
            PayloadShape::Swot => request.json(&SwotPayload::from_record(record)),
            PayloadShape::Insights => request.json(&InsightsPayload::from_record(record)),
        };
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Status {
            status: status.as_u16(),
            body,
        })
    }

    #[must_use]
    pub fn into_backup(self) -> TextReportSink<W> {
        self.backup
    }
}

#[async_trait]
impl<W: Write + Send + Sync> RecordSink for ApiSink<W> {
    async fn emit(&mut self, record: &OutputRecord) -> Result<(), SinkError> {
        match self.deliver(record).await {
            Ok(()) => {
                self.delivered += 1;
                tracing::info!(
                    symbol = %record.symbol,
                    endpoint = %self.endpoint,
                    "record delivered"
                );
            }
            Err(DeliveryError::Status { status, body }) => {
                self.rejected += 1;
                tracing::error!(
                    symbol = %record.symbol,
                    status,
                    body = %body,
                    "delivery endpoint rejected record"
                );
            }
            Err(e) => {
                self.rejected += 1;
                tracing::error!(symbol = %record.symbol, error = %e, "record delivery failed");
            }
        }
        self.backup.emit(record).await
    }

    async fn record_failure(&mut self, target: &Target, message: &str) -> Result<(), SinkError> {
        self.backup.record_failure(target, message).await
    }

    fn deliveries(&self) -> Option<DeliveryCounts> {
        Some(DeliveryCounts {
            delivered: self.delivered,
            rejected: self.rejected,
        })
    }
}
