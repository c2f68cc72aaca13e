//! Two-phase upload pipeline: ticket acquisition, then a direct-to-storage
//! transfer.
//!
//! The transfer is issued only after the ticket resolves; a failure in either
//! phase fails the whole attempt. Transient failures are retried with bounded
//! exponential backoff, terminal (4xx) failures are not.

use crate::api::ApiTransport;
use crate::config::Config;
use crate::error::{ApiError, UploadError};
use crate::models::FileAttachment;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Executes the upload protocol against an [`ApiTransport`].
pub struct UploadOrchestrator {
    transport: Arc<dyn ApiTransport>,
    max_attempts: u32,
    backoff_base: Duration,
}

impl UploadOrchestrator {
    pub fn new(transport: Arc<dyn ApiTransport>, config: &Config) -> Self {
        Self {
            transport,
            max_attempts: config.upload_max_attempts.max(1),
            backoff_base: Duration::from_millis(config.upload_backoff_base_ms),
        }
    }

    /// Upload a file and return its public resource locator.
    ///
    /// The locator comes straight from the ticket, unvalidated; the trust
    /// boundary is the backend. When the transfer phase fails after a ticket
    /// was issued, the ticket is simply abandoned — the backend contract has
    /// no release call for it.
    pub async fn upload_resource(&self, file: &FileAttachment) -> Result<String, UploadError> {
        let request = file.upload_request();

        let ticket = self
            .with_retry("ticket", || self.transport.request_upload_ticket(&request))
            .await
            .map_err(UploadError::TicketAcquisition)?;
        debug!(
            target_address = %ticket.upload_target_address,
            locator = %ticket.public_resource_locator,
            "upload ticket acquired"
        );

        match self
            .with_retry("transfer", || {
                self.transport
                    .transfer(&ticket.upload_target_address, &file.mime_type, &file.bytes)
            })
            .await
        {
            Ok(()) => {
                debug!(locator = %ticket.public_resource_locator, "transfer complete");
                Ok(ticket.public_resource_locator)
            }
            Err(err) => {
                warn!(
                    locator = %ticket.public_resource_locator,
                    "transfer failed after ticket issuance; the unused ticket is not released upstream"
                );
                Err(UploadError::Transfer(err))
            }
        }
    }

    /// Run a phase with bounded exponential backoff.
    ///
    /// Only transient failures (connection, timeout, 5xx) are retried; the
    /// delay doubles after each attempt.
    async fn with_retry<T, F, Fut>(&self, phase: &str, mut call: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut delay = self.backoff_base;
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        phase,
                        attempt,
                        backoff = ?delay,
                        error = %err,
                        "transient failure, backing off before retry"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
