//! Backend transport: the `ApiTransport` contract and its reqwest implementation.
//!
//! Everything above this layer works in terms of [`ApiTransport`]; the trait
//! is the seam used to mock the backend in tests. [`HttpTransport`] speaks the
//! actual wire protocol: JSON against the booking API, raw bytes against the
//! storage address named by an upload ticket.

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    Appointment, AppointmentDraft, Credentials, SignedUploadTicket, UploadRequest, UserIdentity,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, info};

/// Successful authentication payload: bearer token plus the backend identity.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthOutcome {
    pub token: String,
    #[serde(rename = "user")]
    pub identity: UserIdentity,
}

/// Authenticated HTTP transport consumed by the orchestration core.
///
/// One method per backend call, plus bearer-token installation. Implementations
/// must not retry on their own; retry policy belongs to the callers.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthOutcome, ApiError>;

    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError>;

    async fn end_session(&self) -> Result<(), ApiError>;

    async fn request_upload_ticket(
        &self,
        request: &UploadRequest,
    ) -> Result<SignedUploadTicket, ApiError>;

    /// Raw-byte transfer directly to blob storage. `target` is the absolute
    /// address from a ticket, not a path under the API base.
    async fn transfer(&self, target: &str, mime_type: &str, bytes: &[u8]) -> Result<(), ApiError>;

    async fn create_appointment(
        &self,
        draft: &AppointmentDraft,
        idempotency_key: &str,
    ) -> Result<Appointment, ApiError>;

    async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError>;

    /// Install or clear the bearer token used for authenticated calls.
    fn set_auth_token(&self, token: Option<String>);
}

/// Error body shape used by the booking API (`{"error": "..."}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// reqwest-backed implementation of [`ApiTransport`].
pub struct HttpTransport {
    client: Client,
    api_base: String,
    token: Mutex<Option<String>>,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn current_token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Attach the bearer token, if one is installed.
    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.current_token() {
            Some(token) => request.header("Authorization", token),
            None => request,
        }
    }

    /// Map a non-success response to `ApiError::Status`, pulling the backend's
    /// error message out of the body when it has one.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body),
            Err(_) => "Unknown error".to_string(),
        };
        error!("API request failed with status {}: {}", status, message);

        Err(ApiError::Status {
            code: status.as_u16(),
            message,
        })
    }

    async fn decode<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T, ApiError> {
        response.json().await.map_err(ApiError::Decode)
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthOutcome, ApiError> {
        let url = self.endpoint("/auth/login");
        debug!(%url, email = %credentials.email, "sending login request");

        let response = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let response = Self::check(response).await?;
        Self::decode(response).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let url = self.endpoint("/auth/signup");
        debug!(%url, email = %credentials.email, "sending signup request");

        let response = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        Self::check(response).await?;
        Ok(())
    }

    async fn end_session(&self) -> Result<(), ApiError> {
        let url = self.endpoint("/auth/logout");
        debug!(%url, "sending logout request");

        let response = self
            .authed(self.client.post(&url))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        Self::check(response).await?;
        Ok(())
    }

    async fn request_upload_ticket(
        &self,
        request: &UploadRequest,
    ) -> Result<SignedUploadTicket, ApiError> {
        let url = self.endpoint("/upload-url");
        debug!(%url, file_name = %request.file_name, mime_type = %request.mime_type, "requesting upload ticket");

        let response = self
            .authed(self.client.post(&url).json(request))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let response = Self::check(response).await?;
        Self::decode(response).await
    }

    async fn transfer(&self, target: &str, mime_type: &str, bytes: &[u8]) -> Result<(), ApiError> {
        debug!(size = bytes.len(), mime_type, "transferring bytes to storage");

        // Presigned target: no Authorization header, content type must match
        // what the ticket was requested for.
        let response = self
            .client
            .put(target)
            .header("Content-Type", mime_type)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        Self::check(response).await?;
        Ok(())
    }

    async fn create_appointment(
        &self,
        draft: &AppointmentDraft,
        idempotency_key: &str,
    ) -> Result<Appointment, ApiError> {
        let url = self.endpoint("/appointments");
        debug!(%url, idempotency_key, "sending appointment creation request");

        let response = self
            .authed(
                self.client
                    .post(&url)
                    .header("Idempotency-Key", idempotency_key)
                    .json(draft),
            )
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let response = Self::check(response).await?;
        Self::decode(response).await
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        let url = self.endpoint("/appointments");
        debug!(%url, "fetching appointments");

        let response = self
            .authed(self.client.get(&url))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let response = Self::check(response).await?;
        Self::decode(response).await
    }

    fn set_auth_token(&self, token: Option<String>) {
        if token.is_some() {
            info!("bearer token installed");
        } else {
            info!("bearer token cleared");
        }
        *self
            .token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = token;
    }
}
