//! Application module
//!
//! Owns the tour engine for the terminal dashboard and runs the event loop:
//! tick the engine, poll for input, redraw.

use anyhow::Result;
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use std::time::Duration;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::TourConfig;
use crate::engine::{ESCAPE_KEY, TourEngine};
use crate::input::{KeyAction, KeybindingContext};
use crate::notify::ToastBoard;
use crate::page::{Page, ScrollBehavior};
use crate::popup::PopupControl;
use crate::prompt::PromptChoice;
use crate::script::TourScript;
use crate::store::FlagStore;
use crate::types::Size;
use crate::ui::{self, Dashboard, TerminalEngine};

/// Rows scrolled per key press on the idle dashboard
const SCROLL_STEP: f64 = 3.0;

/// Input poll timeout of the main loop
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main application struct
pub struct App<C: Clock = SystemClock> {
    engine: TerminalEngine<Box<dyn FlagStore>, C>,
    dashboard: Dashboard,
    keybinding_context: KeybindingContext,
}

impl App<SystemClock> {
    /// Create the application for a terminal of `width` x `height` cells
    pub fn new(
        script: TourScript,
        config: TourConfig,
        path: &str,
        store: Box<dyn FlagStore>,
        (width, height): (u16, u16),
    ) -> Self {
        Self::with_clock(script, config, path, store, (width, height), SystemClock::new())
    }
}

impl<C: Clock + Clone> App<C> {
    pub fn with_clock(
        script: TourScript,
        config: TourConfig,
        path: &str,
        store: Box<dyn FlagStore>,
        (width, height): (u16, u16),
        clock: C,
    ) -> Self {
        info!(%path, width, height, "Creating new App instance");
        let viewport = viewport_for(width, height);
        let dashboard = Dashboard::layout(viewport.width);
        let page = dashboard.build_page(path, viewport);
        let notifier = ToastBoard::new(clock.clone(), config.toast_duration_ms);
        let engine = TourEngine::new(script, config, page, store, notifier, clock);

        Self {
            engine,
            dashboard,
            keybinding_context: KeybindingContext::new(),
        }
    }
}

impl<C: Clock> App<C> {
    pub fn engine(&self) -> &TerminalEngine<Box<dyn FlagStore>, C> {
        &self.engine
    }

    /// Simulate the page load: schedules the entry prompt when appropriate
    pub fn load(&mut self) {
        if self.engine.on_page_load() {
            debug!("Entry prompt scheduled");
        }
    }

    /// Advance timers without waiting for input
    pub fn tick(&mut self) {
        self.engine.tick();
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting main application loop");
        self.load();

        loop {
            self.engine.tick();

            if crossterm::event::poll(POLL_INTERVAL)? {
                match crossterm::event::read()? {
                    Event::Key(key_event) => {
                        if self.handle_key_event(key_event) {
                            break; // Exit requested
                        }
                    }
                    Event::Resize(width, height) => self.handle_resize(width, height),
                    _ => {}
                }
            }

            terminal.draw(|f| {
                ui::render(f, &self.engine, &self.dashboard, &self.keybinding_context)
            })?;
        }

        self.engine.end();
        Ok(())
    }

    /// Handle a key press. Returns true if the user asked to quit.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        let context = ui::key_context(&self.engine);
        let Some(action) = self.keybinding_context.resolve(context, &key) else {
            return false;
        };
        debug!(?action, ?context, "Key action");

        match action {
            KeyAction::Next => {
                self.engine.handle_control(PopupControl::Next);
            }
            KeyAction::Previous => {
                self.engine.handle_control(PopupControl::Previous);
            }
            KeyAction::Primary => {
                let finish = self
                    .engine
                    .popup_view()
                    .is_some_and(|v| v.has_control(PopupControl::Finish));
                let control = if finish {
                    PopupControl::Finish
                } else {
                    PopupControl::Next
                };
                self.engine.handle_control(control);
            }
            KeyAction::Close => {
                self.engine.handle_control(PopupControl::Close);
            }
            KeyAction::Escape => {
                self.engine.handle_keydown(ESCAPE_KEY);
            }
            KeyAction::Accept => {
                self.engine.answer_prompt(PromptChoice::Accept);
            }
            KeyAction::Decline => {
                self.engine.answer_prompt(PromptChoice::Decline);
            }
            KeyAction::StartTour => {
                let outcome = self.engine.start();
                debug!(?outcome, "Start requested from keyboard");
            }
            KeyAction::Restart => {
                let outcome = self.engine.restart();
                debug!(?outcome, "Restart requested from keyboard");
            }
            KeyAction::ScrollUp => self.scroll_by(-SCROLL_STEP),
            KeyAction::ScrollDown => self.scroll_by(SCROLL_STEP),
            KeyAction::Quit => return true,
        }
        false
    }

    fn scroll_by(&mut self, delta: f64) {
        let page = self.engine.page_mut();
        let top = page.scroll_y() + delta;
        page.scroll_to(top, ScrollBehavior::Instant);
    }

    /// Keep the page viewport in step with the terminal
    fn handle_resize(&mut self, width: u16, height: u16) {
        let viewport = viewport_for(width, height);
        debug!(width = viewport.width, height = viewport.height, "Viewport resized");
        self.engine.page_mut().set_viewport(viewport);
    }
}

/// Page viewport for a terminal size; the bottom row is the status bar
fn viewport_for(width: u16, height: u16) -> Size {
    Size::new(f64::from(width), f64::from(height.saturating_sub(1)))
}
