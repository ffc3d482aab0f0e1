//! Terminal rendition of the dashboard
//!
//! The dashboard is laid out once in cell coordinates and loaded into a
//! `VirtualPage`, so the tour resolves the same selectors it would on the web.
//! One document unit is one terminal cell.

use ratatui::{
    Frame,
    layout::Rect as Area,
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::page::{Page, VirtualPage};
use crate::theme::Styles;
use crate::types::{Rect, Size};

/// Width of the sidebar column
pub const SIDEBAR_WIDTH: f64 = 22.0;

/// Narrowest content column the layout will produce
const MIN_CONTENT_WIDTH: f64 = 48.0;

/// Popup size in cells
pub const POPUP_SIZE: Size = Size::new(46.0, 12.0);

const NAV_ITEMS: [(&str, &str); 5] = [
    ("/dashboard", "Dashboard"),
    ("/agents/classification", "Classification"),
    ("/agents/pipeline", "Pipeline"),
    ("/insights", "Insights"),
    ("/settings", "Settings"),
];

/// A bordered panel bound to a selector
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub selector: String,
    pub title: String,
    pub lines: Vec<String>,
    /// Box in document coordinates
    pub rect: Rect,
}

impl Widget {
    fn new(selector: impl Into<String>, title: &str, lines: &[&str], rect: Rect) -> Self {
        Self {
            selector: selector.into(),
            title: title.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
            rect,
        }
    }
}

/// The dashboard's widgets and their boxes
#[derive(Debug, Clone)]
pub struct Dashboard {
    widgets: Vec<Widget>,
    document_height: f64,
}

impl Dashboard {
    /// Lay the dashboard out for a viewport `width` cells wide
    pub fn layout(width: f64) -> Self {
        let x0 = SIDEBAR_WIDTH + 1.0;
        let content = (width - x0).max(MIN_CONTENT_WIDTH);
        let mut widgets = Vec::new();

        for (i, (href, label)) in NAV_ITEMS.iter().enumerate() {
            widgets.push(Widget::new(
                format!(".nav-item[href=\"{href}\"]"),
                "",
                &[label],
                Rect::new(1.0, 3.0 + 3.0 * i as f64, SIDEBAR_WIDTH - 2.0, 3.0),
            ));
        }

        widgets.push(Widget::new(
            ".page-title",
            "",
            &["Sales Dashboard"],
            Rect::new(x0, 0.0, content - 24.0, 3.0),
        ));
        widgets.push(Widget::new(
            ".global-execute-btn",
            "",
            &["▶ Execute All Agents"],
            Rect::new(x0 + content - 22.0, 0.0, 22.0, 3.0),
        ));
        widgets.push(Widget::new(
            ".stats-grid",
            "Overview",
            &[
                "Leads today      128   ▲ 12%",
                "Qualified         47   ▲  4%",
                "Conversion      36.7%  ▼  1%",
                "Revenue      $48,210   ▲  9%",
            ],
            Rect::new(x0, 4.0, content, 7.0),
        ));
        widgets.push(Widget::new(
            ".agent-pipeline",
            "Agent Pipeline",
            &[
                "1. Classification   ● idle",
                "2. Enrichment       ● idle",
                "3. Scoring          ● idle",
                "4. Outreach         ● idle",
                "5. Follow-up        ● idle",
                "",
                "Run the pipeline to process new leads.",
            ],
            Rect::new(x0, 12.0, content, 10.0),
        ));
        widgets.push(Widget::new(
            ".ai-insights-panel",
            "AI Insights",
            &[
                "• Enterprise leads convert 2x faster this week.",
                "• 14 leads have gone quiet for 5+ days.",
                "• Best outreach window: Tue-Thu, 9-11am.",
                "",
                "Insights refresh after every pipeline run.",
            ],
            Rect::new(x0, 23.0, content, 12.0),
        ));
        widgets.push(Widget::new(
            ".recent-activity",
            "Recent Activity",
            &[
                "09:42  Lead #4821 qualified",
                "09:37  Outreach sent to Acme Corp",
                "09:15  Pipeline run finished",
            ],
            Rect::new(x0, 36.0, content, 8.0),
        ));

        let document_height = widgets
            .iter()
            .map(|w| w.rect.bottom())
            .fold(0.0, f64::max);

        Self {
            widgets,
            document_height,
        }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    /// Build the page the tour runs against
    pub fn build_page(&self, path: &str, viewport: Size) -> VirtualPage {
        let mut page = VirtualPage::new(path, viewport);
        for widget in &self.widgets {
            page.insert(widget.selector.clone(), widget.rect);
        }
        page.set_document_height(self.document_height);
        page.set_popup_size(POPUP_SIZE);
        page
    }
}

/// Convert a viewport box to a screen area, clipped to `bounds`
pub fn to_area(rect: Rect, bounds: Area) -> Option<Area> {
    let left = rect.left.round().max(0.0);
    let top = rect.top.round().max(0.0);
    let right = rect.right().round().min(f64::from(bounds.right()));
    let bottom = rect.bottom().round().min(f64::from(bounds.bottom()));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Area::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

/// Draw every widget at its current scroll position
pub fn render_dashboard(f: &mut Frame, dashboard: &Dashboard, page: &VirtualPage, area: Area) {
    f.render_widget(Block::default().style(Styles::text()), area);
    for widget in dashboard.widgets() {
        render_widget(f, widget, page, area, false);
    }
}

/// Draw one widget; `highlighted` switches to the tour border
pub fn render_widget(
    f: &mut Frame,
    widget: &Widget,
    page: &VirtualPage,
    area: Area,
    highlighted: bool,
) {
    let Some(id) = page.query(&widget.selector) else {
        return;
    };
    let Some(rect) = page.bounding_rect(id) else {
        return;
    };
    let Some(target) = to_area(rect, area) else {
        return;
    };

    let mut block = Block::default().borders(Borders::ALL);
    block = if highlighted {
        block
            .border_type(BorderType::Thick)
            .border_style(Styles::highlight())
    } else {
        block.border_style(Styles::border())
    };
    if !widget.title.is_empty() {
        block = block.title(widget.title.as_str()).title_style(Styles::title());
    }

    let lines: Vec<Line> = widget.lines.iter().map(|l| Line::from(l.as_str())).collect();
    let body = Paragraph::new(lines)
        .block(block)
        .style(Styles::text())
        .wrap(Wrap { trim: false });
    f.render_widget(body, target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::TourScript;

    #[test]
    fn test_every_default_target_exists() {
        let dashboard = Dashboard::layout(100.0);
        let page = dashboard.build_page("/dashboard", Size::new(100.0, 23.0));
        for step in TourScript::default().steps() {
            assert!(page.query(&step.target).is_some(), "missing {}", step.target);
        }
    }

    #[test]
    fn test_document_taller_than_terminal() {
        let dashboard = Dashboard::layout(100.0);
        assert!(dashboard.document_height() > 24.0);
    }

    #[test]
    fn test_narrow_terminal_keeps_minimum_width() {
        let dashboard = Dashboard::layout(30.0);
        let grid = dashboard
            .widgets()
            .iter()
            .find(|w| w.selector == ".stats-grid")
            .unwrap();
        assert_eq!(grid.rect.width, MIN_CONTENT_WIDTH);
    }

    #[test]
    fn test_to_area_clips_partially_visible_box() {
        let bounds = Area::new(0, 0, 80, 20);
        let area = to_area(Rect::new(10.0, -2.0, 20.0, 5.0), bounds).unwrap();
        assert_eq!(area, Area::new(10, 0, 20, 3));
        assert!(to_area(Rect::new(10.0, 25.0, 20.0, 5.0), bounds).is_none());
    }
}
