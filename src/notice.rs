//! Transient user notifications.
//!
//! A non-blocking message that the presentation layer shows briefly and
//! auto-dismisses after a configurable duration. Produced only at the app
//! boundary; the orchestration core never builds one itself.

use std::time::{Duration, Instant};

/// Notice variant for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Success notification
    Success,
    /// Error notification
    Error,
}

/// Notice data
#[derive(Debug, Clone)]
pub struct Notice {
    /// The message to display
    pub message: String,
    /// The variant (success or error)
    pub kind: NoticeKind,
    /// When the notice was created
    pub created_at: Instant,
    /// How long to show the notice
    pub duration: Duration,
}

impl Notice {
    /// Create a new notice
    pub fn new(message: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at: Instant::now(),
            duration: Duration::from_secs(5),
        }
    }

    /// Create a success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NoticeKind::Success)
    }

    /// Create an error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NoticeKind::Error)
    }

    /// Set a custom duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Check if the notice has expired
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}
