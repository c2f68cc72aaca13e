//! AutoCare Client - orchestration layer for the service-appointment booking API
//!
//! This library tracks authentication state and coordinates the dependent
//! booking workflow: acquire a single-use upload authorization, transfer the
//! bytes directly to blob storage, then submit a creation request referencing
//! the uploaded resource. Presentation is the consumer's concern; this crate
//! exposes plain data and typed failures only.

// Core modules
pub mod api;
pub mod app;
pub mod booking;
pub mod config;
pub mod error;
pub mod models;
pub mod notice;
pub mod session;
pub mod upload;

// Re-exports for convenience
pub use api::{ApiTransport, AuthOutcome, HttpTransport};
pub use app::{App, Command};
pub use booking::BookingService;
pub use config::Config;
pub use error::{ApiError, AuthError, BookingError, FetchError, UploadError, ValidationError};
pub use models::{
    Appointment, AppointmentDraft, Credentials, FileAttachment, Session, SessionState,
    SignedUploadTicket, UploadRequest, UserIdentity,
};
pub use notice::{Notice, NoticeKind};
pub use session::SessionManager;
pub use upload::UploadOrchestrator;
