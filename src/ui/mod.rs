//! User interface rendering module
//!
//! - `dashboard` - the dashboard widgets and the page built from them
//! - `overlay` - tour surfaces drawn over the dashboard

pub mod dashboard;
pub mod overlay;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::clock::Clock;
use crate::engine::TourEngine;
use crate::input::{KeyContext, KeybindingContext};
use crate::notify::ToastBoard;
use crate::page::{Page, Surface, VirtualPage};
use crate::prompt::PromptPhase;
use crate::store::FlagStore;
use crate::theme::Styles;

pub use dashboard::Dashboard;

/// Engine as driven by the terminal front end
pub type TerminalEngine<S, C> = TourEngine<VirtualPage, S, ToastBoard<C>, C>;

/// Which keybindings apply right now
pub fn key_context<S: FlagStore, C: Clock>(engine: &TerminalEngine<S, C>) -> KeyContext {
    if engine.prompt_phase() == PromptPhase::Shown {
        KeyContext::Prompt
    } else if engine.is_active() {
        KeyContext::Touring
    } else {
        KeyContext::Idle
    }
}

/// Render the whole screen
pub fn render<S: FlagStore, C: Clock>(
    f: &mut Frame,
    engine: &TerminalEngine<S, C>,
    dashboard: &Dashboard,
    keys: &KeybindingContext,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());
    let (main, status) = (chunks[0], chunks[1]);
    let page = engine.page();

    dashboard::render_dashboard(f, dashboard, page, main);

    if page.is_mounted(Surface::Overlay) {
        overlay::render_overlay(f, dashboard, page, main);
    }
    if page.is_mounted(Surface::Popup) {
        if let Some((view, layout)) = page.popup() {
            overlay::render_popup(f, view, layout, main);
        }
    }
    if page.is_mounted(Surface::Prompt) {
        if let Some(view) = page.prompt() {
            overlay::render_prompt(f, view, main);
        }
    }

    overlay::render_toasts(f, engine.notifier().toasts(), main);
    render_status_bar(f, engine, keys, status);
}

fn render_status_bar<S: FlagStore, C: Clock>(
    f: &mut Frame,
    engine: &TerminalEngine<S, C>,
    keys: &KeybindingContext,
    area: ratatui::layout::Rect,
) {
    let mut spans = vec![Span::styled(
        format!(" {} │ {} │", engine.page().current_path(), engine.state()),
        Styles::status_bar(),
    )];
    for item in keys.get_nav_items(key_context(engine)) {
        spans.push(Span::styled(
            format!(" {}: {} ", item.key_display, item.action_label),
            Styles::status_bar(),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Styles::status_bar()),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::TourConfig;
    use crate::script::TourScript;
    use crate::store::MemoryStore;
    use crate::types::Size;
    use ratatui::{Terminal, backend::TestBackend};

    fn engine(clock: &ManualClock) -> TerminalEngine<MemoryStore, ManualClock> {
        let dashboard = Dashboard::layout(100.0);
        let page = dashboard.build_page("/dashboard", Size::new(100.0, 29.0));
        TourEngine::new(
            TourScript::default(),
            TourConfig::terminal(),
            page,
            MemoryStore::new(),
            ToastBoard::new(clock.clone(), 3000),
            clock.clone(),
        )
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_popup_drawn_once_step_presented() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);
        let dashboard = Dashboard::layout(100.0);
        let keys = KeybindingContext::new();

        engine.start();
        engine.tick();
        clock.advance(500);
        engine.tick();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| render(f, &engine, &dashboard, &keys))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(engine.popup_view().is_some());
        assert!(text.contains("Welcome to Klodev Apex!"));
        assert!(text.contains("1/6"));
        assert_eq!(key_context(&engine), KeyContext::Touring);
    }

    #[test]
    fn test_idle_dashboard_has_no_popup() {
        let clock = ManualClock::new();
        let engine = engine(&clock);
        let dashboard = Dashboard::layout(100.0);
        let keys = KeybindingContext::new();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| render(f, &engine, &dashboard, &keys))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Agent Pipeline"));
        assert!(!text.contains("Next"));
        assert_eq!(key_context(&engine), KeyContext::Idle);
    }
}
