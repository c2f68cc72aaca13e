//! Appointment creation and listing.
//!
//! `create_appointment` is the composition point of the workflow: it gates on
//! the session state, runs the upload pipeline when a file is attached, and
//! only then issues the creation call. A booking that requested an image is
//! never created without one.

use crate::api::ApiTransport;
use crate::config::Config;
use crate::error::{BookingError, FetchError, ValidationError};
use crate::models::{Appointment, AppointmentDraft, FileAttachment};
use crate::session::SessionManager;
use crate::upload::UploadOrchestrator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Coordinates drafts, uploads and the creation endpoint.
pub struct BookingService {
    transport: Arc<dyn ApiTransport>,
    session: Arc<SessionManager>,
    uploader: UploadOrchestrator,
    in_flight: AtomicBool,
}

/// The backend validates drafts too; this mirrors the required form fields so
/// an obviously incomplete draft never costs a network round-trip.
fn validate_draft(draft: &AppointmentDraft) -> Result<(), ValidationError> {
    for (field, value) in [
        ("serviceType", &draft.service_type),
        ("date", &draft.date),
        ("time", &draft.time),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyField(field));
        }
    }
    Ok(())
}

/// Releases the in-flight flag when dropped, so an abandoned (cancelled)
/// submission cannot wedge the service.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl BookingService {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        session: Arc<SessionManager>,
        config: &Config,
    ) -> Self {
        let uploader = UploadOrchestrator::new(Arc::clone(&transport), config);
        Self {
            transport,
            session,
            uploader,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Submit a draft, uploading the attachment first when one is present.
    ///
    /// Preconditions are checked before any network call: the session must be
    /// Authenticated and no other submission may be in flight. An upload
    /// failure aborts the whole attempt — the creation call is never issued
    /// with a partially-completed upload. Each submission carries a fresh
    /// idempotency key so a duplicate request cannot create two appointments.
    pub async fn create_appointment(
        &self,
        mut draft: AppointmentDraft,
        attachment: Option<&FileAttachment>,
    ) -> Result<Appointment, BookingError> {
        if !self.session.current_session().is_authenticated() {
            return Err(BookingError::Unauthenticated);
        }

        validate_draft(&draft)?;

        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(BookingError::SubmissionInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        if let Some(file) = attachment.filter(|file| !file.is_empty()) {
            let locator = self.uploader.upload_resource(file).await?;
            draft.image_locator = Some(locator);
        }

        let idempotency_key = Uuid::new_v4().to_string();
        debug!(%idempotency_key, service_type = %draft.service_type, "submitting appointment");

        let appointment = self
            .transport
            .create_appointment(&draft, &idempotency_key)
            .await?;
        info!(id = %appointment.id, status = %appointment.status, "appointment created");
        Ok(appointment)
    }

    /// Fetch the authoritative appointment list.
    ///
    /// Single full read, backend ordering preserved as-is. There is no local
    /// cache; callers re-fetch after a successful creation instead of
    /// inserting optimistically.
    pub async fn fetch_appointments(&self) -> Result<Vec<Appointment>, FetchError> {
        if !self.session.current_session().is_authenticated() {
            return Err(FetchError::Unauthenticated);
        }

        let appointments = self.transport.list_appointments().await?;
        debug!(count = appointments.len(), "appointments fetched");
        Ok(appointments)
    }
}
