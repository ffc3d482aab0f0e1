//! Tour engine
//!
//! Owns the script, the single optional session and the entry prompt, and
//! drives them against a host `Page`. All waiting is deadline based: hosts call
//! `tick` from their event loop and forward clicks and key presses.
//!
//! # Session lifecycle
//!
//! - `start` mounts the overlay and popup, registers the escape listener and
//!   begins resolving step 0.
//! - Each step goes `Resolving` → `Settling` (scrolled, waiting for layout) →
//!   `Presented` (highlighted, popup rendered).
//! - `finish`, `close`, `end` and the escape key all tear down through one path
//!   that unmounts both surfaces, clears highlights, cancels the resolver and
//!   releases the listener. Teardown is idempotent.

pub mod state;

use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::config::TourConfig;
use crate::error::TourError;
use crate::notify::Notifier;
use crate::page::{ElementId, ListenerId, Page, ScrollBehavior, Surface};
use crate::placement::{PopupLayout, place_popup};
use crate::popup::{PopupControl, PopupView};
use crate::prompt::{PromptChoice, PromptPhase, PromptView, should_offer};
use crate::resolver::{Resolve, ResolveStatus};
use crate::script::TourScript;
use crate::store::{CompletionFlag, FlagStore};
use crate::styles::{STYLESHEET_ID, TOUR_STYLESHEET};
use crate::types::NoticeKind;

pub use state::{NavEvent, TourState, TourTransitionError};

pub const ALREADY_COMPLETED_MESSAGE: &str =
    "Tour already completed! You can restart from settings.";
pub const COMPLETED_MESSAGE: &str = "🎉 Tour completed! You're ready to boost your sales!";

/// Key name that aborts the tour, as reported by `KeyboardEvent.key`
pub const ESCAPE_KEY: &str = "Escape";

/// Result of a `start` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A session is already running
    AlreadyActive,
    /// The completion flag is set
    AlreadyCompleted,
    /// The current route never hosts the tour
    ExcludedRoute,
    EmptyScript,
    /// Mounting failed; everything was torn down again
    Aborted,
}

/// Progress of the current step
#[derive(Debug, Clone, PartialEq)]
pub enum StepPhase {
    /// Waiting for the target to appear
    Resolving(Resolve),
    /// Scrolled to the target, waiting for layout to settle
    Settling { element: ElementId, until: u64 },
    /// Highlighted with the popup rendered
    Presented {
        element: ElementId,
        view: PopupView,
        layout: PopupLayout,
    },
}

/// Escape-key registration held by a session. Released by teardown, which
/// also runs when the engine is dropped.
#[derive(Debug)]
struct EscapeListener {
    id: ListenerId,
}

impl EscapeListener {
    fn register<P: Page + ?Sized>(page: &mut P) -> Self {
        Self {
            id: page.add_key_listener(),
        }
    }

    fn release<P: Page + ?Sized>(self, page: &mut P) {
        page.remove_key_listener(self.id);
    }
}

/// Runtime state of one walkthrough
#[derive(Debug)]
struct TourSession {
    current: usize,
    phase: StepPhase,
    escape: Option<EscapeListener>,
}

// What `drive_session` should do next, computed while the session is borrowed
enum PhaseAction {
    Wait,
    Scroll(ElementId),
    Skip(u64),
    Present(ElementId),
}

/// The guided tour
pub struct TourEngine<P, S, N, C>
where
    P: Page,
    S: FlagStore,
    N: Notifier,
    C: Clock,
{
    script: TourScript,
    config: TourConfig,
    page: P,
    store: S,
    notifier: N,
    clock: C,
    flag: CompletionFlag,
    state: TourState,
    session: Option<TourSession>,
    history: Vec<usize>,
    prompt: PromptPhase,
    prompt_view: PromptView,
}

impl<P, S, N, C> TourEngine<P, S, N, C>
where
    P: Page,
    S: FlagStore,
    N: Notifier,
    C: Clock,
{
    /// Create the engine and inject the tour stylesheet if the page lacks it
    pub fn new(
        script: TourScript,
        config: TourConfig,
        mut page: P,
        store: S,
        notifier: N,
        clock: C,
    ) -> Self {
        if page.inject_stylesheet(STYLESHEET_ID, TOUR_STYLESHEET) {
            debug!("Tour stylesheet injected");
        }
        let flag = config.completion_flag();

        Self {
            script,
            config,
            page,
            store,
            notifier,
            clock,
            flag,
            state: TourState::Idle,
            session: None,
            history: Vec::new(),
            prompt: PromptPhase::Idle,
            prompt_view: PromptView::default(),
        }
    }

    pub fn script(&self) -> &TourScript {
        &self.script
    }

    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn state(&self) -> TourState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Step cursor, None outside a session
    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.current)
    }

    pub fn phase(&self) -> Option<&StepPhase> {
        self.session.as_ref().map(|s| &s.phase)
    }

    /// Popup content of the presented step
    pub fn popup_view(&self) -> Option<&PopupView> {
        match self.phase()? {
            StepPhase::Presented { view, .. } => Some(view),
            _ => None,
        }
    }

    /// Steps presented by the latest session, in order
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn prompt_phase(&self) -> PromptPhase {
        self.prompt
    }

    pub fn prompt_view(&self) -> &PromptView {
        &self.prompt_view
    }

    /// True once the tour was finished or declined
    pub fn is_completed(&self) -> bool {
        self.flag.is_set(&self.store)
    }

    /// Earliest time at which `tick` has work to do
    pub fn next_wakeup(&self) -> Option<u64> {
        let prompt = match self.prompt {
            PromptPhase::Scheduled { due_at } => Some(due_at),
            _ => None,
        };
        let step = match self.phase() {
            Some(StepPhase::Resolving(resolve)) => Some(resolve.next_probe_at()),
            Some(StepPhase::Settling { until, .. }) => Some(*until),
            _ => None,
        };
        match (prompt, step) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // -------------------------------------------------------------------------
    // Entry prompt
    // -------------------------------------------------------------------------

    /// Schedule the entry prompt for first-time visitors of the dashboard.
    /// Returns true if the prompt was scheduled.
    pub fn on_page_load(&mut self) -> bool {
        let path = self.page.current_path();
        if !should_offer(&path, self.is_completed(), &self.config) {
            debug!(%path, "Entry prompt not offered");
            return false;
        }

        let due_at = self.clock.now_ms() + self.config.prompt_delay_ms;
        self.prompt = PromptPhase::Scheduled { due_at };
        debug!(due_at, "Entry prompt scheduled");
        true
    }

    fn tick_prompt(&mut self, now: u64) {
        let PromptPhase::Scheduled { due_at } = self.prompt else {
            return;
        };
        if now < due_at {
            return;
        }
        if self.is_completed() || self.is_active() {
            self.prompt = PromptPhase::Idle;
            return;
        }

        match self.page.mount(Surface::Prompt) {
            Ok(()) => {
                self.page.render_prompt(&self.prompt_view);
                self.prompt = PromptPhase::Shown;
                info!("Entry prompt shown");
            }
            Err(e) => {
                error!(error = %e, "Failed to show entry prompt");
                self.prompt = PromptPhase::Idle;
            }
        }
    }

    /// Answer the visible prompt. Accepting starts the tour; declining marks
    /// the tour as done without showing any step.
    pub fn answer_prompt(&mut self, choice: PromptChoice) -> Option<StartOutcome> {
        if self.prompt != PromptPhase::Shown {
            debug!(?choice, "No prompt to answer");
            return None;
        }
        self.page.unmount(Surface::Prompt);
        self.prompt = PromptPhase::Dismissed(choice);

        match choice {
            PromptChoice::Accept => Some(self.start()),
            PromptChoice::Decline => {
                info!("Tour declined");
                if let Err(e) = self.flag.mark(&mut self.store) {
                    error!(error = %e, "Failed to persist tour decline");
                }
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Session control
    // -------------------------------------------------------------------------

    /// Start a tour from step 0
    pub fn start(&mut self) -> StartOutcome {
        if self.is_active() {
            debug!(state = %self.state, "Tour already active");
            return StartOutcome::AlreadyActive;
        }
        if self.is_completed() {
            self.notifier.notify(ALREADY_COMPLETED_MESSAGE, NoticeKind::Info);
            return StartOutcome::AlreadyCompleted;
        }
        let path = self.page.current_path();
        if path == self.config.landing_route {
            debug!(%path, "Tour disabled on landing route");
            return StartOutcome::ExcludedRoute;
        }
        if let Err(e) = self.state.transition(NavEvent::Start, self.script.len()) {
            warn!(error = %e, "Tour not started");
            return StartOutcome::EmptyScript;
        }

        match self.open_session() {
            Ok(()) => {
                info!(steps = self.script.len(), "Tour started");
                StartOutcome::Started
            }
            Err(e) => {
                error!(error = %e, "Tour error");
                self.teardown(TourState::Aborted);
                self.state = TourState::Aborted;
                StartOutcome::Aborted
            }
        }
    }

    /// Clear the completion flag and start over
    pub fn restart(&mut self) -> StartOutcome {
        self.end();
        if let Err(e) = self.flag.clear(&mut self.store) {
            error!(error = %e, "Failed to clear completion flag");
        }
        self.start()
    }

    fn open_session(&mut self) -> Result<(), TourError> {
        self.page.mount(Surface::Overlay)?;
        self.page.mount(Surface::Popup)?;

        let escape = EscapeListener::register(&mut self.page);
        let resolve = self.resolve_step(0);
        self.session = Some(TourSession {
            current: 0,
            phase: StepPhase::Resolving(resolve),
            escape: Some(escape),
        });
        self.history.clear();
        self.state = TourState::ShowingStep(0);
        self.drive_session(self.clock.now_ms());
        Ok(())
    }

    fn resolve_step(&self, index: usize) -> Resolve {
        let selector = self
            .script
            .get(index)
            .map(|s| s.target.as_str())
            .unwrap_or_default();
        Resolve::start(
            selector,
            self.clock.now_ms(),
            self.config.resolve_timeout_ms,
            self.config.poll_interval_ms,
        )
    }

    fn begin_step(&mut self, index: usize) {
        let resolve = self.resolve_step(index);
        if let Some(session) = self.session.as_mut() {
            if let StepPhase::Resolving(previous) = &mut session.phase {
                previous.cancel();
            }
            session.current = index;
            session.phase = StepPhase::Resolving(resolve);
        }
        self.state = TourState::ShowingStep(index);
        debug!(step = index, "Resolving step target");
        self.drive_session(self.clock.now_ms());
    }

    /// Advance time-based work: prompt delay, target polling, scroll settle,
    /// toast expiry.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        self.notifier.expire(now);
        self.tick_prompt(now);
        self.drive_session(now);
    }

    fn drive_session(&mut self, now: u64) {
        loop {
            let action = {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                match &mut session.phase {
                    StepPhase::Resolving(resolve) => match resolve.poll(&self.page, now) {
                        ResolveStatus::Pending | ResolveStatus::Cancelled => PhaseAction::Wait,
                        ResolveStatus::Found(element) => PhaseAction::Scroll(element),
                        ResolveStatus::TimedOut { waited_ms } => PhaseAction::Skip(waited_ms),
                    },
                    StepPhase::Settling { element, until } if now >= *until => {
                        PhaseAction::Present(*element)
                    }
                    StepPhase::Settling { .. } | StepPhase::Presented { .. } => PhaseAction::Wait,
                }
            };

            match action {
                PhaseAction::Wait => return,
                PhaseAction::Scroll(element) => self.scroll_to_target(element, now),
                PhaseAction::Skip(waited_ms) => self.skip_step(waited_ms),
                PhaseAction::Present(element) => self.present(element),
            }
        }
    }

    fn scroll_to_target(&mut self, element: ElementId, now: u64) {
        let Some(index) = self.current_index() else {
            return;
        };
        let Some(rect) = self.page.bounding_rect(element) else {
            self.skip_step(0);
            return;
        };
        let offset = self
            .script
            .get(index)
            .map(|s| f64::from(s.scroll_offset))
            .unwrap_or_default();

        let absolute_top = self.page.scroll_y() + rect.top;
        self.page
            .scroll_to(absolute_top - offset, ScrollBehavior::Smooth);

        let until = now + self.config.settle_delay_ms;
        if let Some(session) = self.session.as_mut() {
            session.phase = StepPhase::Settling { element, until };
        }
    }

    fn present(&mut self, element: ElementId) {
        let Some(index) = self.current_index() else {
            return;
        };
        let (Some(step), Some(rect)) = (self.script.get(index), self.page.bounding_rect(element))
        else {
            self.skip_step(0);
            return;
        };
        let Some(view) = PopupView::for_step(&self.script, index) else {
            return;
        };

        self.page.clear_highlights();
        self.page.highlight(element);

        let layout = place_popup(
            rect,
            self.page.popup_size(),
            step.placement,
            self.page.viewport(),
            &self.config.placement,
        );
        self.page.render_popup(&view, &layout);

        if let Some(session) = self.session.as_mut() {
            session.phase = StepPhase::Presented {
                element,
                view,
                layout,
            };
        }
        self.history.push(index);
        debug!(step = index, top = layout.top, left = layout.left, "Step presented");
    }

    fn skip_step(&mut self, waited_ms: u64) {
        let Some(index) = self.current_index() else {
            return;
        };
        let selector = self
            .script
            .get(index)
            .map(|s| s.target.clone())
            .unwrap_or_default();
        let err = TourError::TargetNotFound {
            selector,
            waited_ms,
        };
        warn!(step = index, "{err}, skipping step");

        match self.state.transition(NavEvent::Skip, self.script.len()) {
            Ok(TourState::ShowingStep(next)) => self.begin_step(next),
            Ok(_) => self.complete(),
            Err(e) => warn!(error = %e, "Unexpected skip"),
        }
    }

    fn is_presented(&self) -> bool {
        matches!(self.phase(), Some(StepPhase::Presented { .. }))
    }

    /// Move to the next step. Ignored until the current step is presented.
    pub fn next(&mut self) -> bool {
        self.navigate(NavEvent::Next)
    }

    /// Move back one step. Ignored until the current step is presented.
    pub fn prev(&mut self) -> bool {
        self.navigate(NavEvent::Previous)
    }

    fn navigate(&mut self, event: NavEvent) -> bool {
        if !self.is_presented() {
            debug!(%event, "Navigation ignored while step is loading");
            return false;
        }
        match self.state.transition(event, self.script.len()) {
            Ok(TourState::ShowingStep(index)) => {
                self.begin_step(index);
                true
            }
            Ok(other) => {
                warn!(%event, state = %other, "Unexpected navigation result");
                false
            }
            Err(e) => {
                debug!(error = %e, "Navigation rejected");
                false
            }
        }
    }

    /// Finish the tour: persist completion and say so
    pub fn finish(&mut self) -> bool {
        match self.state.transition(NavEvent::Finish, self.script.len()) {
            Ok(_) if self.is_active() => {
                self.complete();
                true
            }
            Ok(_) => false,
            Err(e) => {
                debug!(error = %e, "Finish rejected");
                false
            }
        }
    }

    fn complete(&mut self) {
        if let Err(e) = self.flag.mark(&mut self.store) {
            error!(error = %e, "Failed to persist tour completion");
        }
        self.teardown(TourState::Completed);
        self.state = TourState::Completed;
        info!(presented = self.history.len(), "Tour completed");
        self.notifier.notify(COMPLETED_MESSAGE, NoticeKind::Success);
    }

    /// Close control: abort without marking the tour done
    pub fn close(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        info!(step = ?self.current_index(), "Tour closed");
        self.teardown(TourState::Aborted);
        true
    }

    /// Forward a keydown from the host. Returns true if the tour consumed it.
    pub fn handle_keydown(&mut self, key: &str) -> bool {
        let listening = self
            .session
            .as_ref()
            .is_some_and(|s| s.escape.is_some());
        if key != ESCAPE_KEY || !listening {
            return false;
        }
        info!(step = ?self.current_index(), "Tour escaped");
        self.teardown(TourState::Aborted);
        true
    }

    /// Dispatch a popup button click. Only controls the presented popup shows
    /// are honoured; close works in every phase.
    pub fn handle_control(&mut self, control: PopupControl) -> bool {
        let offered = self.popup_view().is_some_and(|v| v.has_control(control));
        if control != PopupControl::Close && !offered {
            debug!(?control, "Control not offered by the current popup");
            return false;
        }
        match control {
            PopupControl::Close => self.close(),
            PopupControl::Previous => self.prev(),
            PopupControl::Next => self.next(),
            PopupControl::Finish => self.finish(),
        }
    }

    /// Tear the tour down. Safe to call any number of times.
    pub fn end(&mut self) {
        self.teardown(TourState::Aborted);
    }

    fn teardown(&mut self, outcome: TourState) {
        if let Some(mut session) = self.session.take() {
            if let StepPhase::Resolving(resolve) = &mut session.phase {
                resolve.cancel();
            }
            if let Some(listener) = session.escape.take() {
                listener.release(&mut self.page);
            }
            self.state = outcome;
            debug!(state = %outcome, "Tour session closed");
        }
        self.page.unmount(Surface::Popup);
        self.page.unmount(Surface::Overlay);
        self.page.clear_highlights();
    }
}

impl<P, S, N, C> Drop for TourEngine<P, S, N, C>
where
    P: Page,
    S: FlagStore,
    N: Notifier,
    C: Clock,
{
    fn drop(&mut self) {
        if self.session.is_some() {
            self.teardown(TourState::Aborted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notify::ToastBoard;
    use crate::page::VirtualPage;
    use crate::script::TourStep;
    use crate::store::MemoryStore;
    use crate::types::{Placement, Rect, Size};

    type TestEngine = TourEngine<VirtualPage, MemoryStore, ToastBoard<ManualClock>, ManualClock>;

    fn script() -> TourScript {
        TourScript::new(vec![
            TourStep::new("#a", "A", "first", Placement::Bottom, 100),
            TourStep::new("#b", "B", "second", Placement::Top, 100),
        ])
    }

    fn engine() -> (TestEngine, ManualClock) {
        let clock = ManualClock::new();
        let mut page = VirtualPage::new("/dashboard", Size::new(1280.0, 800.0));
        page.insert("#a", Rect::new(100.0, 300.0, 200.0, 50.0));
        page.insert("#b", Rect::new(100.0, 1500.0, 200.0, 50.0));
        let engine = TourEngine::new(
            script(),
            TourConfig::default(),
            page,
            MemoryStore::new(),
            ToastBoard::new(clock.clone(), 3000),
            clock.clone(),
        );
        (engine, clock)
    }

    #[test]
    fn test_stylesheet_injected_once() {
        let (engine, _) = engine();
        assert!(engine.page().has_stylesheet(STYLESHEET_ID));
        assert_eq!(engine.page().stylesheet_count(), 1);
    }

    #[test]
    fn test_step_waits_for_settle_delay() {
        let (mut engine, clock) = engine();
        assert_eq!(engine.start(), StartOutcome::Started);
        assert!(matches!(engine.phase(), Some(StepPhase::Settling { until: 500, .. })));
        assert_eq!(engine.next_wakeup(), Some(500));
        assert!(engine.page().highlighted().is_empty());

        clock.advance(499);
        engine.tick();
        assert!(engine.popup_view().is_none());

        clock.advance(1);
        engine.tick();
        assert_eq!(engine.popup_view().unwrap().title, "A");
        assert_eq!(engine.page().highlighted().len(), 1);
    }

    #[test]
    fn test_scroll_uses_step_offset() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance(500);
        engine.tick();
        assert!(engine.next());
        // Absolute top 1500 minus the step offset
        assert_eq!(engine.page().scroll_log().last(), Some(&1400.0));
    }

    #[test]
    fn test_navigation_ignored_while_loading() {
        let (mut engine, _) = engine();
        engine.start();
        assert!(!engine.next());
        assert_eq!(engine.current_index(), Some(0));
    }

    #[test]
    fn test_finish_control_refused_before_last_step() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance(500);
        engine.tick();
        assert!(!engine.popup_view().unwrap().has_control(PopupControl::Finish));

        assert!(!engine.handle_control(PopupControl::Finish));
        assert_eq!(engine.state(), TourState::ShowingStep(0));
        assert!(!engine.is_completed());
        assert!(!engine.handle_control(PopupControl::Previous));
        assert_eq!(engine.current_index(), Some(0));
    }

    #[test]
    fn test_close_control_works_while_loading() {
        let (mut engine, _) = engine();
        engine.start();
        assert!(engine.popup_view().is_none());
        assert!(engine.handle_control(PopupControl::Close));
        assert_eq!(engine.state(), TourState::Aborted);
    }

    #[test]
    fn test_finish_requires_session() {
        let (mut engine, _) = engine();
        assert!(!engine.finish());
        assert!(!engine.is_completed());
        assert_eq!(engine.state(), TourState::Idle);
    }

    #[test]
    fn test_mount_failure_aborts_cleanly() {
        let (mut engine, _) = engine();
        engine.page_mut().fail_mount(Surface::Popup);
        assert_eq!(engine.start(), StartOutcome::Aborted);
        assert_eq!(engine.state(), TourState::Aborted);
        assert!(!engine.is_active());
        assert!(!engine.page().is_mounted(Surface::Overlay));
        assert_eq!(engine.page().listener_count(), 0);

        // The next attempt works
        assert_eq!(engine.start(), StartOutcome::Started);
    }

    #[test]
    fn test_restart_clears_flag() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance(500);
        engine.tick();
        engine.next();
        clock.advance(500);
        engine.tick();
        assert!(engine.finish());
        assert!(engine.is_completed());

        assert_eq!(engine.start(), StartOutcome::AlreadyCompleted);
        assert_eq!(engine.restart(), StartOutcome::Started);
        assert!(!engine.is_completed());
    }
}
