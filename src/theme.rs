//! Centralized theme and styling for the terminal front end
//!
//! Colors mirror the literal fallbacks of the tour stylesheet so the terminal
//! tour looks like the web one.
//!
//! # Usage
//! ```rust
//! use dashtour::theme::{Colors, Styles};
//! use ratatui::style::Style;
//!
//! let style = Style::default().fg(Colors::PRIMARY);
//! let title_style = Styles::title();
//! ```

use ratatui::style::{Color, Modifier, Style};

use crate::types::NoticeKind;

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the application
pub struct Colors;

impl Colors {
    // -------------------------------------------------------------------------
    // Base Colors (backgrounds, foregrounds)
    // -------------------------------------------------------------------------

    /// Dashboard background
    pub const BG_PRIMARY: Color = Color::Rgb(15, 23, 42);

    /// Card/popup background (`--bg-card`)
    pub const BG_CARD: Color = Color::Rgb(255, 255, 255);

    /// Secondary button background (`--bg-tertiary`)
    pub const BG_TERTIARY: Color = Color::Rgb(248, 250, 252);

    /// Progress track (`--bg-tertiary` on the bar)
    pub const BG_TRACK: Color = Color::Rgb(226, 232, 240);

    /// Popup heading text (`--text-primary`)
    pub const FG_PRIMARY: Color = Color::Rgb(15, 23, 42);

    /// Popup body text (`--text-secondary`)
    pub const FG_SECONDARY: Color = Color::Rgb(71, 85, 105);

    /// Progress label and close button (`--text-tertiary`)
    pub const FG_MUTED: Color = Color::Rgb(100, 116, 139);

    /// Dashboard text on the dark background
    pub const FG_DASHBOARD: Color = Color::Rgb(226, 232, 240);

    // -------------------------------------------------------------------------
    // Accent Colors
    // -------------------------------------------------------------------------

    /// `--primary`
    pub const PRIMARY: Color = Color::Rgb(37, 99, 235);

    /// `--secondary`
    pub const SECONDARY: Color = Color::Rgb(6, 182, 212);

    /// `--border-light`
    pub const BORDER: Color = Color::Rgb(226, 232, 240);

    // -------------------------------------------------------------------------
    // Semantic Colors
    // -------------------------------------------------------------------------

    /// `--success`
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129);

    /// `--error`
    pub const ERROR: Color = Color::Rgb(239, 68, 68);

    /// Info toast background
    pub const INFO: Color = Color::Rgb(59, 130, 246);

    /// Dimmed content under the overlay
    pub const DIMMED: Color = Color::Rgb(71, 85, 105);
}

// =============================================================================
// PRE-BUILT STYLES
// =============================================================================

/// Pre-built styles for common UI patterns
pub struct Styles;

impl Styles {
    /// Dashboard text
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_DASHBOARD)
    }

    /// Muted dashboard text
    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    /// Main title style
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Dashboard panel border
    pub fn border() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    /// Border of the highlighted tour target
    pub fn highlight() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Everything under the overlay
    pub fn dimmed() -> Style {
        Style::default()
            .fg(Colors::DIMMED)
            .add_modifier(Modifier::DIM)
    }

    /// Popup surface
    pub fn popup() -> Style {
        Style::default().fg(Colors::FG_PRIMARY).bg(Colors::BG_CARD)
    }

    pub fn popup_title() -> Style {
        Style::default()
            .fg(Colors::FG_PRIMARY)
            .bg(Colors::BG_CARD)
            .add_modifier(Modifier::BOLD)
    }

    pub fn popup_body() -> Style {
        Style::default().fg(Colors::FG_SECONDARY).bg(Colors::BG_CARD)
    }

    pub fn popup_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED).bg(Colors::BG_CARD)
    }

    /// "Next" button
    pub fn button_primary() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// "Finish Tour" button
    pub fn button_success() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Colors::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    /// "Previous" button
    pub fn button_secondary() -> Style {
        Style::default()
            .fg(Colors::FG_SECONDARY)
            .bg(Colors::BG_TERTIARY)
    }

    /// Progress bar fill
    pub fn progress_fill() -> Style {
        Style::default().fg(Colors::PRIMARY).bg(Colors::BG_CARD)
    }

    pub fn progress_track() -> Style {
        Style::default().fg(Colors::BG_TRACK).bg(Colors::BG_CARD)
    }

    /// Toast colors by kind
    pub fn toast(kind: NoticeKind) -> Style {
        let bg = match kind {
            NoticeKind::Success => Colors::SUCCESS,
            NoticeKind::Info => Colors::INFO,
            NoticeKind::Error => Colors::ERROR,
        };
        Style::default().fg(Color::White).bg(bg)
    }

    /// Status bar at the bottom of the screen
    pub fn status_bar() -> Style {
        Style::default().fg(Colors::FG_DASHBOARD).bg(Colors::PRIMARY)
    }
}
