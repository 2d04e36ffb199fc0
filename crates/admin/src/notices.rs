//! Transient success/error notices shown after user actions.

use std::time::{Duration, Instant};

use crate::config::NoticeDurations;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A message that disappears after its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub created_at: Instant,
    pub expires_at: Instant,
}

impl Notice {
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Notices posted by a view, oldest first.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    durations: NoticeDurations,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    #[must_use]
    pub fn new(durations: NoticeDurations) -> Self {
        Self {
            durations,
            notices: Vec::new(),
        }
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.push(NoticeKind::Success, message.into(), self.durations.success, now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) {
        self.push(NoticeKind::Error, message.into(), self.durations.error, now);
    }

    fn push(&mut self, kind: NoticeKind, message: String, ttl: Duration, now: Instant) {
        self.notices.push(Notice {
            kind,
            message,
            created_at: now,
            expires_at: now + ttl,
        });
    }

    /// Notices still visible at `now`; expired ones are dropped.
    pub fn visible(&mut self, now: Instant) -> &[Notice] {
        self.notices.retain(|n| !n.is_expired(now));
        &self.notices
    }

    /// Most recent notice regardless of expiry.
    #[must_use]
    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn dismiss_all(&mut self) {
        self.notices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_and_error_lifetimes() {
        let mut board = NoticeBoard::new(NoticeDurations::default());
        let t0 = Instant::now();
        board.success("Order status updated", t0);
        board.error("Failed to process refund", t0);

        assert_eq!(board.visible(t0 + Duration::from_millis(2_999)).len(), 2);

        let at_4s = board.visible(t0 + Duration::from_secs(4)).to_vec();
        assert_eq!(at_4s.len(), 1);
        assert_eq!(at_4s[0].kind, NoticeKind::Error);

        assert!(board.visible(t0 + Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn test_latest() {
        let mut board = NoticeBoard::default();
        assert!(board.latest().is_none());
        board.success("a", Instant::now());
        assert_eq!(board.latest().map(|n| n.message.as_str()), Some("a"));
        board.dismiss_all();
        assert!(board.latest().is_none());
    }
}
