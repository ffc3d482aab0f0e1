//! Toast notifications
//!
//! The engine reports completion and "already completed" through a `Notifier`.
//! Host pages may bring their own; `ToastBoard` is the built-in fallback that
//! keeps toasts on screen for a fixed duration.

use tracing::debug;

use crate::clock::Clock;
use crate::types::NoticeKind;

/// Fire-and-forget notification sink
pub trait Notifier {
    fn notify(&mut self, message: &str, kind: NoticeKind);

    /// Drop anything whose display time has passed
    fn expire(&mut self, _now_ms: u64) {}
}

/// A toast currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: NoticeKind,
    pub expires_at: u64,
}

impl Toast {
    /// Icon shown next to the message
    pub fn icon(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "✔",
            NoticeKind::Info => "ℹ",
            NoticeKind::Error => "✖",
        }
    }
}

/// Default notifier: timed toasts stacked bottom-right
#[derive(Debug, Clone)]
pub struct ToastBoard<C: Clock> {
    clock: C,
    duration_ms: u64,
    toasts: Vec<Toast>,
}

impl<C: Clock> ToastBoard<C> {
    pub fn new(clock: C, duration_ms: u64) -> Self {
        Self {
            clock,
            duration_ms,
            toasts: Vec::new(),
        }
    }

    /// Toasts still visible, oldest first
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }
}

impl<C: Clock> Notifier for ToastBoard<C> {
    fn notify(&mut self, message: &str, kind: NoticeKind) {
        debug!(%kind, message, "Showing toast");
        let expires_at = self.clock.now_ms() + self.duration_ms;
        self.toasts.push(Toast {
            message: message.to_string(),
            kind,
            expires_at,
        });
    }

    fn expire(&mut self, now_ms: u64) {
        self.toasts.retain(|toast| toast.expires_at > now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_toast_expires_after_duration() {
        let clock = ManualClock::new();
        let mut board = ToastBoard::new(clock.clone(), 3000);
        board.notify("saved", NoticeKind::Success);
        assert_eq!(board.toasts().len(), 1);

        clock.advance(2999);
        board.expire(clock.now_ms());
        assert_eq!(board.toasts().len(), 1);

        clock.advance(1);
        board.expire(clock.now_ms());
        assert!(board.toasts().is_empty());
    }

    #[test]
    fn test_toast_icons_follow_kind() {
        let mut board = ToastBoard::new(ManualClock::new(), 3000);
        board.notify("oops", NoticeKind::Error);
        assert_eq!(board.latest().unwrap().icon(), "✖");
        board.notify("fyi", NoticeKind::Info);
        assert_eq!(board.latest().unwrap().icon(), "ℹ");
        assert_eq!(board.toasts().len(), 2);
    }
}
