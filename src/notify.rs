//! Transient user-facing notices.
//!
//! A notice is raised when an operation succeeds or is rejected, and is
//! shown until a fixed expiry. Notices hold no task state and there is no
//! persistent log of them.

use std::time::{Duration, Instant};

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_millis(3000);

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message with a fixed expiry.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    raised_at: Instant,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            text: text.into(),
            raised_at: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            text: text.into(),
            raised_at: Instant::now(),
        }
    }

    /// True once the notice has outlived [`NOTICE_TTL`].
    pub fn is_expired(&self) -> bool {
        self.raised_at.elapsed() >= NOTICE_TTL
    }
}
