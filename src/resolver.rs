//! Step target resolver
//!
//! Targets may render after the page loads, so a step's selector is probed
//! repeatedly until it matches or the timeout passes. The resolver holds no
//! timer of its own: the engine calls `poll` from `tick`, and a probe only
//! runs once its due time has been reached.

use crate::page::{ElementId, Page};

/// Outcome of one `poll`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStatus {
    /// Not found yet, keep polling
    Pending,
    Found(ElementId),
    /// Deadline passed without a match; the step should be skipped
    TimedOut { waited_ms: u64 },
    Cancelled,
}

/// An in-flight lookup of one selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolve {
    selector: String,
    started_at: u64,
    next_probe_at: u64,
    timeout_ms: u64,
    interval_ms: u64,
    cancelled: bool,
}

impl Resolve {
    /// Begin resolving; the first probe is due immediately
    pub fn start(selector: impl Into<String>, now: u64, timeout_ms: u64, interval_ms: u64) -> Self {
        Self {
            selector: selector.into(),
            started_at: now,
            next_probe_at: now,
            timeout_ms,
            interval_ms: interval_ms.max(1),
            cancelled: false,
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    /// When the next probe will run
    pub fn next_probe_at(&self) -> u64 {
        self.next_probe_at
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Probe the page if a probe is due.
    ///
    /// The element is checked before the deadline, so an element that shows up
    /// on the last probe still resolves. The timeout triggers once strictly more
    /// than `timeout_ms` has elapsed.
    pub fn poll<P: Page + ?Sized>(&mut self, page: &P, now: u64) -> ResolveStatus {
        if self.cancelled {
            return ResolveStatus::Cancelled;
        }
        if now < self.next_probe_at {
            return ResolveStatus::Pending;
        }

        if let Some(element) = page.query(&self.selector) {
            return ResolveStatus::Found(element);
        }

        let waited_ms = now.saturating_sub(self.started_at);
        if waited_ms > self.timeout_ms {
            return ResolveStatus::TimedOut { waited_ms };
        }

        self.next_probe_at = now + self.interval_ms;
        ResolveStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::VirtualPage;
    use crate::types::{Rect, Size};

    fn page() -> VirtualPage {
        VirtualPage::new("/dashboard", Size::new(1280.0, 800.0))
    }

    #[test]
    fn test_present_element_resolves_immediately() {
        let mut page = page();
        let id = page.insert(".stats-grid", Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut resolve = Resolve::start(".stats-grid", 0, 5000, 100);
        assert_eq!(resolve.poll(&page, 0), ResolveStatus::Found(id));
    }

    #[test]
    fn test_late_element_found_on_next_probe() {
        let mut page = page();
        let mut resolve = Resolve::start(".stats-grid", 0, 5000, 100);
        assert_eq!(resolve.poll(&page, 0), ResolveStatus::Pending);

        let id = page.insert(".stats-grid", Rect::new(0.0, 0.0, 10.0, 10.0));
        // Not due yet
        assert_eq!(resolve.poll(&page, 50), ResolveStatus::Pending);
        assert_eq!(resolve.poll(&page, 100), ResolveStatus::Found(id));
    }

    #[test]
    fn test_times_out_after_deadline() {
        let page = page();
        let mut resolve = Resolve::start(".missing", 1000, 5000, 100);
        let mut now = 1000;
        loop {
            match resolve.poll(&page, now) {
                ResolveStatus::Pending => now += 100,
                ResolveStatus::TimedOut { waited_ms } => {
                    assert_eq!(waited_ms, 5100);
                    break;
                }
                other => panic!("unexpected status {other:?}"),
            }
        }
        assert_eq!(now, 6100);
    }

    #[test]
    fn test_cancelled_resolve_stops() {
        let page = page();
        let mut resolve = Resolve::start(".missing", 0, 5000, 100);
        resolve.cancel();
        assert!(resolve.is_cancelled());
        assert_eq!(resolve.poll(&page, 10_000), ResolveStatus::Cancelled);
    }
}
