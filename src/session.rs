//! Session lifecycle: the only writer of authentication state.
//!
//! The session starts Anonymous at construction, transitions to Authenticated
//! on a successful login, and back to Anonymous on logout or a failed login.
//! Reads always observe a fully-transitioned value; the state is swapped as a
//! whole under the lock, never field by field.

use crate::api::ApiTransport;
use crate::error::{ApiError, AuthError};
use crate::models::{Credentials, Session, UserIdentity};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Owns the process-wide [`Session`] and performs the auth calls.
pub struct SessionManager {
    transport: Arc<dyn ApiTransport>,
    session: Mutex<Session>,
}

impl SessionManager {
    /// Create a manager starting in the Anonymous state.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            transport,
            session: Mutex::new(Session::anonymous()),
        }
    }

    /// Pure, idempotent read of the current session.
    pub fn current_session(&self) -> Session {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Authenticate against the backend.
    ///
    /// On success the bearer token is installed on the transport and the
    /// session transitions to Authenticated. On any failure the session is
    /// Anonymous afterwards, whatever it was before.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserIdentity, AuthError> {
        match self.transport.authenticate(credentials).await {
            Ok(outcome) => {
                self.transport.set_auth_token(Some(outcome.token));
                let identity = outcome.identity;
                *self
                    .session
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) =
                    Session::authenticated(identity.clone());
                info!(email = %identity.email, "login succeeded");
                Ok(identity)
            }
            Err(err) => {
                self.reset_to_anonymous();
                warn!(error = %err, "login failed");
                match err {
                    ApiError::Status { code: 401, .. } => Err(AuthError::InvalidCredentials),
                    other => Err(AuthError::Api(other)),
                }
            }
        }
    }

    /// Register a new account.
    ///
    /// Mutates no local state: success only confirms the backend accepted the
    /// account creation. The user still logs in separately.
    pub async fn signup(&self, credentials: &Credentials) -> Result<(), AuthError> {
        match self.transport.register(credentials).await {
            Ok(()) => {
                info!(email = %credentials.email, "signup accepted");
                Ok(())
            }
            Err(ApiError::Status { code, message })
                if code == 409 || message.to_lowercase().contains("already exists") =>
            {
                Err(AuthError::DuplicateAccount)
            }
            Err(other) => Err(AuthError::Api(other)),
        }
    }

    /// End the session.
    ///
    /// The backend call is best-effort: local state is cleared whether or not
    /// the acknowledgement arrives, so the caller is Anonymous afterwards
    /// even when an error is returned.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let result = self.transport.end_session().await;
        self.reset_to_anonymous();
        info!("logged out");

        result.map_err(|err| {
            warn!(error = %err, "logout acknowledgement failed; local state cleared anyway");
            AuthError::Api(err)
        })
    }

    fn reset_to_anonymous(&self) {
        self.transport.set_auth_token(None);
        *self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Session::anonymous();
    }
}
