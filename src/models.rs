//! Data model for the booking client.
//!
//! Wire names follow the backend contract (camelCase JSON), so the serde
//! renames here are part of the API surface, not cosmetics.

use serde::{Deserialize, Serialize};

/// Authentication state of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// Client-held record of the current authentication state.
///
/// Fields are private so the invariant holds by construction: an identity is
/// present if and only if the state is `Authenticated`. Only
/// [`SessionManager`](crate::session::SessionManager) creates non-anonymous
/// values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    state: SessionState,
    identity: Option<UserIdentity>,
}

impl Session {
    /// The state every process starts in.
    pub fn anonymous() -> Self {
        Self {
            state: SessionState::Anonymous,
            identity: None,
        }
    }

    /// An authenticated session carrying the backend-assigned identity.
    pub fn authenticated(identity: UserIdentity) -> Self {
        Self {
            state: SessionState::Authenticated,
            identity: Some(identity),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Backend-assigned identity; opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub id: String,
    pub email: String,
}

/// Login/signup request payload.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Describes a pending transfer when requesting an upload ticket.
/// Never persisted; `size_bytes` is client-side only.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRequest {
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "fileType")]
    pub mime_type: String,
    #[serde(skip)]
    pub size_bytes: u64,
}

/// Single-use, time-bounded authorization for a direct-to-storage transfer.
///
/// Issued by the backend for a specific file name and type; consumed at most
/// once. The public locator is returned to the caller unvalidated — the trust
/// boundary is the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedUploadTicket {
    #[serde(rename = "uploadUrl")]
    pub upload_target_address: String,
    #[serde(rename = "imageUrl")]
    pub public_resource_locator: String,
}

/// Binary content handed to the upload orchestrator.
#[derive(Debug, Clone)]
pub struct FileAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Empty attachments are treated as "no file selected".
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The ticket request describing this attachment.
    pub fn upload_request(&self) -> UploadRequest {
        UploadRequest {
            file_name: self.file_name.clone(),
            mime_type: self.mime_type.clone(),
            size_bytes: self.bytes.len() as u64,
        }
    }
}

/// User-submitted, not-yet-persisted appointment.
///
/// `image_locator` is set by the booking service if and only if the full
/// upload pipeline completed; a draft is never submitted with a
/// partially-completed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    pub car_make: String,
    pub car_model: String,
    pub car_year: String,
    pub service_type: String,
    /// Opaque date string; formatting is the presentation layer's concern.
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notification_preference: bool,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_locator: Option<String>,
}

/// A persisted appointment as returned by the backend.
///
/// `status` is an opaque display discriminator (e.g. "Pending"); the client
/// never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(alias = "appointment_id")]
    pub id: String,
    pub status: String,
    #[serde(flatten)]
    pub draft: AppointmentDraft,
}
