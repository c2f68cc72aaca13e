//! Typed failure taxonomy for the booking workflow.
//!
//! Every public operation returns one of these instead of raising; the app
//! boundary is the only place they are converted into user notices.

use thiserror::Error;

/// Transport-level failure from the backend API or blob storage.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("server returned {code}: {message}")]
    Status { code: u16, message: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Connection failures, timeouts and 5xx responses are transient;
    /// 4xx responses are terminal and must never be retried.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout => true,
            ApiError::Status { code, .. } => *code >= 500,
            ApiError::Decode(_) => false,
        }
    }

    /// Map a reqwest failure into the taxonomy, keeping timeouts distinct.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }
}

/// Authentication failures from login, signup or logout.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    DuplicateAccount,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Local precondition violations caught before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Failure of the two-phase upload pipeline.
///
/// The phase is preserved so callers can tell an authorization problem from
/// a storage problem; in both cases the attempt as a whole has failed.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("failed to acquire upload ticket: {0}")]
    TicketAcquisition(#[source] ApiError),

    #[error("failed to transfer file to storage: {0}")]
    Transfer(#[source] ApiError),
}

/// Failure of an appointment creation attempt.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("not logged in")]
    Unauthenticated,

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("upload failed: {0}")]
    UploadFailed(#[from] UploadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Failure of an appointment list read.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("not logged in")]
    Unauthenticated,

    #[error(transparent)]
    Api(#[from] ApiError),
}
