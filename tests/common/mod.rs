//! Shared test utilities for the workflow integration tests.
//!
//! Provides `MockTransport` - a mockall mock of the `ApiTransport` seam - plus
//! fixture builders and a `TestHarness` wiring a `SessionManager` and
//! `BookingService` against the mock. Retry backoff is configured to 1ms so
//! retry-path tests stay fast.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Notify;

use autocare_client::api::{ApiTransport, AuthOutcome};
use autocare_client::booking::BookingService;
use autocare_client::config::Config;
use autocare_client::error::ApiError;
use autocare_client::models::{
    Appointment, AppointmentDraft, Credentials, FileAttachment, SignedUploadTicket, UploadRequest,
    UserIdentity,
};
use autocare_client::session::SessionManager;

mockall::mock! {
    pub Transport {}

    #[async_trait]
    impl ApiTransport for Transport {
        async fn authenticate(&self, credentials: &Credentials) -> Result<AuthOutcome, ApiError>;
        async fn register(&self, credentials: &Credentials) -> Result<(), ApiError>;
        async fn end_session(&self) -> Result<(), ApiError>;
        async fn request_upload_ticket(
            &self,
            request: &UploadRequest,
        ) -> Result<SignedUploadTicket, ApiError>;
        async fn transfer(&self, target: &str, mime_type: &str, bytes: &[u8]) -> Result<(), ApiError>;
        async fn create_appointment(
            &self,
            draft: &AppointmentDraft,
            idempotency_key: &str,
        ) -> Result<Appointment, ApiError>;
        async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError>;
        fn set_auth_token(&self, token: Option<String>);
    }
}

/// Config with a 1ms retry backoff so upload retry tests run fast.
pub fn test_config() -> Config {
    Config {
        api_base: "http://localhost:5000/api".to_string(),
        request_timeout_secs: 5,
        upload_max_attempts: 3,
        upload_backoff_base_ms: 1,
        notice_duration_secs: 5,
    }
}

pub fn identity() -> UserIdentity {
    UserIdentity {
        id: "1".to_string(),
        email: "a@b.com".to_string(),
    }
}

pub fn auth_outcome() -> AuthOutcome {
    AuthOutcome {
        token: "tok-1".to_string(),
        identity: identity(),
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("a@b.com", "pw")
}

pub fn draft() -> AppointmentDraft {
    AppointmentDraft {
        car_make: "Toyota".to_string(),
        car_model: "Corolla".to_string(),
        car_year: "2020".to_string(),
        service_type: "Oil Change".to_string(),
        date: "2026-09-01".to_string(),
        time: "10:00".to_string(),
        description: "routine service".to_string(),
        notification_preference: true,
        image_locator: None,
    }
}

pub fn attachment() -> FileAttachment {
    FileAttachment::new("car.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF])
}

pub fn ticket() -> SignedUploadTicket {
    SignedUploadTicket {
        upload_target_address: "https://bucket.example/put/car.jpg".to_string(),
        public_resource_locator: "https://bucket.example/car.jpg".to_string(),
    }
}

/// A persisted appointment echoing the submitted draft, as the backend does.
pub fn appointment_from(draft: &AppointmentDraft) -> Appointment {
    Appointment {
        id: "apt-1".to_string(),
        status: "Pending".to_string(),
        draft: draft.clone(),
    }
}

pub fn server_error() -> ApiError {
    ApiError::Status {
        code: 500,
        message: "internal server error".to_string(),
    }
}

pub fn bad_request() -> ApiError {
    ApiError::Status {
        code: 400,
        message: "bad request".to_string(),
    }
}

pub fn unauthorized() -> ApiError {
    ApiError::Status {
        code: 401,
        message: "invalid token".to_string(),
    }
}

/// Transport that parks `create_appointment` until released, so tests can
/// observe a submission while it is still in flight.
///
/// `entered` is notified when the creation call starts; `release` lets it
/// complete. Every other call resolves immediately with a fixture value.
#[derive(Default)]
pub struct GatedTransport {
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl ApiTransport for GatedTransport {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<AuthOutcome, ApiError> {
        Ok(auth_outcome())
    }

    async fn register(&self, _credentials: &Credentials) -> Result<(), ApiError> {
        Ok(())
    }

    async fn end_session(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn request_upload_ticket(
        &self,
        _request: &UploadRequest,
    ) -> Result<SignedUploadTicket, ApiError> {
        Ok(ticket())
    }

    async fn transfer(&self, _target: &str, _mime_type: &str, _bytes: &[u8]) -> Result<(), ApiError> {
        Ok(())
    }

    async fn create_appointment(
        &self,
        draft: &AppointmentDraft,
        _idempotency_key: &str,
    ) -> Result<Appointment, ApiError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(appointment_from(draft))
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        Ok(Vec::new())
    }

    fn set_auth_token(&self, _token: Option<String>) {}
}

/// Session manager and booking service wired against one mock transport.
pub struct TestHarness {
    pub session: Arc<SessionManager>,
    pub booking: BookingService,
}

impl TestHarness {
    /// Wire the services; all expectations must be set on `mock` beforehand.
    pub fn new(mock: MockTransport) -> Self {
        let transport: Arc<dyn ApiTransport> = Arc::new(mock);
        let session = Arc::new(SessionManager::new(Arc::clone(&transport)));
        let booking = BookingService::new(transport, Arc::clone(&session), &test_config());
        Self { session, booking }
    }

    /// Log in through the session manager; panics if the mock rejects it.
    pub async fn login(&self) {
        self.session
            .login(&credentials())
            .await
            .expect("test login should succeed");
    }
}

/// Add the expectations a successful login needs.
pub fn expect_login_success(mock: &mut MockTransport) {
    mock.expect_authenticate()
        .returning(|_| Ok(auth_outcome()));
    mock.expect_set_auth_token().returning(|_| ());
}
