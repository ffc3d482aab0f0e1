//! Tour surfaces: dimming overlay, step popup, entry prompt and toasts

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect as Area},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::dashboard::{Dashboard, render_widget, to_area};
use crate::notify::Toast;
use crate::page::{Page, VirtualPage};
use crate::placement::PopupLayout;
use crate::popup::{PopupControl, PopupView, Progress};
use crate::prompt::{PromptChoice, PromptView};
use crate::theme::{Colors, Styles};
use crate::types::{Placement, Rect};

/// Dim everything, then redraw the highlighted widgets on top
pub fn render_overlay(f: &mut Frame, dashboard: &Dashboard, page: &VirtualPage, area: Area) {
    f.buffer_mut().set_style(area, Styles::dimmed());

    let highlighted = page.highlighted();
    for widget in dashboard.widgets() {
        let lit = page
            .query(&widget.selector)
            .is_some_and(|id| highlighted.contains(&id));
        if lit {
            render_widget(f, widget, page, area, true);
        }
    }
}

/// Draw the step popup where the engine placed it
pub fn render_popup(f: &mut Frame, view: &PopupView, layout: &PopupLayout, area: Area) {
    let Some(popup_area) = to_area(layout.rect(), area) else {
        return;
    };
    render_arrow(f, layout, area);

    f.render_widget(Clear, popup_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Styles::highlight().bg(Colors::BG_CARD))
        .style(Styles::popup());
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Description
            Constraint::Length(1), // Progress
            Constraint::Length(1), // Buttons
        ])
        .split(inner);

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(rows[0]);
    let title = Paragraph::new(view.title.as_str()).style(Styles::popup_title());
    f.render_widget(title, header[0]);
    let close = Paragraph::new(PopupControl::Close.label())
        .style(Styles::popup_muted())
        .alignment(Alignment::Right);
    f.render_widget(close, header[1]);

    let description = Paragraph::new(view.description.as_str())
        .style(Styles::popup_body())
        .wrap(Wrap { trim: true });
    f.render_widget(description, rows[2]);

    f.render_widget(Paragraph::new(progress_line(view.progress, rows[3].width)), rows[3]);
    f.render_widget(Paragraph::new(buttons_line(view)), rows[4]);
}

/// Progress bar followed by the "n/N" label
pub fn progress_line(progress: Progress, width: u16) -> Line<'static> {
    let label = format!(" {}", progress.label());
    let bar_width = usize::from(width).saturating_sub(label.chars().count());
    let filled = (bar_width as f64 * progress.percent() / 100.0).round() as usize;
    let filled = filled.min(bar_width);

    Line::from(vec![
        Span::styled("━".repeat(filled), Styles::progress_fill()),
        Span::styled("━".repeat(bar_width - filled), Styles::progress_track()),
        Span::styled(label, Styles::popup_muted()),
    ])
}

fn buttons_line(view: &PopupView) -> Line<'static> {
    let mut spans = Vec::new();
    for control in view.buttons() {
        if !spans.is_empty() {
            spans.push(Span::styled(" ", Styles::popup()));
        }
        let style = match control {
            PopupControl::Next => Styles::button_primary(),
            PopupControl::Finish => Styles::button_success(),
            _ => Styles::button_secondary(),
        };
        spans.push(Span::styled(format!(" {} ", control.label()), style));
    }
    Line::from(spans)
}

/// Arrow glyph pointing from the popup toward the target
pub fn arrow_glyph(placement: Placement) -> &'static str {
    match placement {
        Placement::Top => "▼",
        Placement::Bottom => "▲",
        Placement::Left => "▶",
        Placement::Right => "◀",
    }
}

fn render_arrow(f: &mut Frame, layout: &PopupLayout, area: Area) {
    let x = layout.left + layout.arrow.offset.x;
    let y = layout.top + layout.arrow.offset.y;
    let cell = Rect::new(x.floor(), y.floor(), 1.0, 1.0);
    let Some(cell) = to_area(cell, area) else {
        return;
    };
    let glyph = Paragraph::new(arrow_glyph(layout.placement)).style(Styles::highlight());
    f.render_widget(glyph, cell);
}

/// Centered welcome modal
pub fn render_prompt(f: &mut Frame, view: &PromptView, area: Area) {
    let width = 52.min(area.width);
    let height = 9.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let modal = Area::new(x, y, width, height);

    f.buffer_mut().set_style(area, Styles::dimmed());
    f.render_widget(Clear, modal);

    let lines = vec![
        Line::from(view.icon.as_str()).alignment(Alignment::Center),
        Line::from(Span::styled(view.heading.as_str(), Styles::popup_title()))
            .alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled(view.message.as_str(), Styles::popup_body()))
            .alignment(Alignment::Center),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!(" [Y] {} ", view.label(PromptChoice::Accept)),
                Styles::button_primary(),
            ),
            Span::styled("  ", Styles::popup()),
            Span::styled(
                format!(" [N] {} ", view.label(PromptChoice::Decline)),
                Styles::button_secondary(),
            ),
        ])
        .alignment(Alignment::Center),
    ];

    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Styles::highlight())
                .style(Styles::popup()),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(body, modal);
}

/// Toasts stacked upward from the bottom-right corner of `area`
pub fn render_toasts(f: &mut Frame, toasts: &[Toast], area: Area) {
    let mut bottom = area.bottom();
    for toast in toasts.iter().rev() {
        let text = format!(" {} {} ", toast.icon(), toast.message);
        let width = (text.chars().count() as u16 + 2).min(area.width);
        if bottom < area.y + 3 {
            break;
        }
        let toast_area = Area::new(
            area.right().saturating_sub(width + 1),
            bottom - 3,
            width,
            3,
        );
        f.render_widget(Clear, toast_area);
        let widget = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
            .style(Styles::toast(toast.kind));
        f.render_widget(widget, toast_area);
        bottom -= 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_progress_line_fills_proportionally() {
        let line = progress_line(Progress { current: 1, total: 2 }, 14);
        assert_eq!(line.spans[0].content.chars().count(), 5);
        assert_eq!(line.spans[1].content.chars().count(), 5);
        assert!(text(&line).ends_with(" 1/2"));
    }

    #[test]
    fn test_progress_line_full_on_last_step() {
        let line = progress_line(Progress { current: 6, total: 6 }, 20);
        assert_eq!(line.spans[1].content.chars().count(), 0);
    }

    #[test]
    fn test_arrow_points_back_at_target() {
        assert_eq!(arrow_glyph(Placement::Bottom), "▲");
        assert_eq!(arrow_glyph(Placement::Top), "▼");
        assert_eq!(arrow_glyph(Placement::Left), "▶");
        assert_eq!(arrow_glyph(Placement::Right), "◀");
    }
}
