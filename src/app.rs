//! Named command handlers: the orchestration boundary.
//!
//! [`App`] owns the services and is the only place typed failures are turned
//! into transient [`Notice`]s. Presentation code dispatches a [`Command`] per
//! user action and reads back the session, the appointment list and the
//! pending notices; it never mutates core state itself.

use crate::api::{ApiTransport, HttpTransport};
use crate::booking::BookingService;
use crate::config::Config;
use crate::error::{FetchError, ValidationError};
use crate::models::{Appointment, AppointmentDraft, Credentials, FileAttachment, Session};
use crate::notice::Notice;
use crate::session::SessionManager;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Semantic user actions, one per UI trigger.
#[derive(Debug, Clone)]
pub enum Command {
    /// Authenticate with email and password
    Login { email: String, password: String },
    /// Create an account; `confirm_password` is validated locally first
    Signup {
        email: String,
        password: String,
        confirm_password: String,
    },
    /// End the session
    Logout,
    /// Book an appointment, uploading the attachment first if present
    Submit {
        draft: AppointmentDraft,
        attachment: Option<FileAttachment>,
    },
    /// Re-read the appointment list from the backend
    Refresh,
}

/// Application facade owning the session and booking services.
pub struct App {
    session: Arc<SessionManager>,
    booking: BookingService,
    appointments: Vec<Appointment>,
    notices: Vec<Notice>,
    notice_duration: Duration,
}

impl App {
    /// Build the app against the real HTTP transport.
    pub fn new(config: &Config) -> Result<Self> {
        let transport: Arc<dyn ApiTransport> = Arc::new(HttpTransport::new(config)?);
        Ok(Self::with_transport(transport, config))
    }

    /// Build the app against any transport (used by tests).
    pub fn with_transport(transport: Arc<dyn ApiTransport>, config: &Config) -> Self {
        let session = Arc::new(SessionManager::new(Arc::clone(&transport)));
        let booking = BookingService::new(transport, Arc::clone(&session), config);
        Self {
            session,
            booking,
            appointments: Vec::new(),
            notices: Vec::new(),
            notice_duration: Duration::from_secs(config.notice_duration_secs),
        }
    }

    /// Run a single user-triggered command to completion.
    ///
    /// Dropping the returned future cancels whatever network call is in
    /// flight; a cancelled command leaves no partial state behind.
    pub async fn dispatch(&mut self, command: Command) {
        match command {
            Command::Login { email, password } => self.handle_login(email, password).await,
            Command::Signup {
                email,
                password,
                confirm_password,
            } => self.handle_signup(email, password, confirm_password).await,
            Command::Logout => self.handle_logout().await,
            Command::Submit { draft, attachment } => {
                self.handle_submit(draft, attachment.as_ref()).await;
            }
            Command::Refresh => self.handle_refresh().await,
        }
    }

    /// Current session (pure read).
    pub fn current_session(&self) -> Session {
        self.session.current_session()
    }

    /// Last fetched appointment list, in backend order.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Pending notices, with expired ones pruned.
    pub fn notices(&mut self) -> &[Notice] {
        self.notices.retain(|notice| !notice.is_expired());
        &self.notices
    }

    async fn handle_login(&mut self, email: String, password: String) {
        let credentials = Credentials::new(email, password);
        match self.session.login(&credentials).await {
            Ok(identity) => {
                self.push_success(format!("Logged in as {}", identity.email));
                // Transition into Authenticated triggers a refresh read
                self.handle_refresh().await;
            }
            Err(err) => {
                error!(error = %err, "login command failed");
                self.push_error("Login failed. Please check your credentials.");
            }
        }
    }

    async fn handle_signup(&mut self, email: String, password: String, confirm_password: String) {
        if password != confirm_password {
            let err = ValidationError::PasswordMismatch;
            info!(error = %err, "signup rejected locally");
            self.push_error("Passwords do not match");
            return;
        }

        let credentials = Credentials::new(email, password);
        match self.session.signup(&credentials).await {
            Ok(()) => {
                self.push_success("Account created! Please check your email for verification.");
            }
            Err(err) => {
                error!(error = %err, "signup command failed");
                self.push_error("Signup failed. Please try again.");
            }
        }
    }

    async fn handle_logout(&mut self) {
        let result = self.session.logout().await;
        // Local state is Anonymous either way; the stale list goes with it
        self.appointments.clear();
        if let Err(err) = result {
            error!(error = %err, "logout acknowledgement failed");
            self.push_error("Logout failed. Please try again.");
        }
    }

    async fn handle_submit(
        &mut self,
        draft: AppointmentDraft,
        attachment: Option<&FileAttachment>,
    ) {
        match self.booking.create_appointment(draft, attachment).await {
            Ok(_) => {
                self.push_success("Appointment booked successfully!");
                // No optimistic insert: re-read the authoritative list
                self.handle_refresh().await;
            }
            Err(err) => {
                error!(error = %err, "submit command failed");
                self.push_error("Failed to book appointment. Please try again.");
            }
        }
    }

    async fn handle_refresh(&mut self) {
        match self.booking.fetch_appointments().await {
            Ok(appointments) => self.appointments = appointments,
            // Nobody is logged in: nothing to load, nothing to report
            Err(FetchError::Unauthenticated) => {}
            Err(err) => {
                error!(error = %err, "refresh command failed");
                self.push_error("Failed to load appointments");
            }
        }
    }

    fn push_success(&mut self, message: impl Into<String>) {
        self.notices
            .push(Notice::success(message).with_duration(self.notice_duration));
    }

    fn push_error(&mut self, message: impl Into<String>) {
        self.notices
            .push(Notice::error(message).with_duration(self.notice_duration));
    }
}
