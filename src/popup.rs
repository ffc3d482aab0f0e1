//! Popup content model
//!
//! What the popup shows for a step: title, body, progress and the navigation
//! controls allowed at that position. Hosts render it however they like;
//! `to_html` produces the dashboard markup for DOM hosts.

use std::fmt::Write as _;

use crate::engine::state::NavEvent;
use crate::placement::PopupLayout;
use crate::script::TourScript;
use crate::types::Placement;

/// Position indicator, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn label(&self) -> String {
        format!("{}/{}", self.current, self.total)
    }

    /// Fill ratio of the progress bar in percent
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.current as f64 / self.total as f64 * 100.0
    }
}

/// A button in the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupControl {
    Close,
    Previous,
    Next,
    Finish,
}

impl PopupControl {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Close => "✕",
            Self::Previous => "Previous",
            Self::Next => "Next",
            Self::Finish => "Finish Tour",
        }
    }

    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Close => "tour-close",
            Self::Previous => "tour-prev",
            Self::Next => "tour-next",
            Self::Finish => "tour-complete",
        }
    }

    /// Navigation event fired when the control is activated
    pub const fn event(self) -> NavEvent {
        match self {
            Self::Close => NavEvent::Close,
            Self::Previous => NavEvent::Previous,
            Self::Next => NavEvent::Next,
            Self::Finish => NavEvent::Finish,
        }
    }
}

/// Everything the popup displays for one step
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub progress: Progress,
    /// Close first, then the footer buttons in display order
    pub controls: Vec<PopupControl>,
}

impl PopupView {
    /// Build the view for step `index`, None if out of range
    pub fn for_step(script: &TourScript, index: usize) -> Option<Self> {
        let step = script.get(index)?;

        let mut controls = vec![PopupControl::Close];
        if index > 0 {
            controls.push(PopupControl::Previous);
        }
        if script.is_last(index) {
            controls.push(PopupControl::Finish);
        } else {
            controls.push(PopupControl::Next);
        }

        Some(Self {
            index,
            title: step.title.clone(),
            description: step.description.clone(),
            progress: Progress {
                current: index + 1,
                total: script.len(),
            },
            controls,
        })
    }

    pub fn has_control(&self, control: PopupControl) -> bool {
        self.controls.contains(&control)
    }

    /// Footer buttons, without the close control
    pub fn buttons(&self) -> impl Iterator<Item = PopupControl> + '_ {
        self.controls
            .iter()
            .copied()
            .filter(|c| *c != PopupControl::Close)
    }

    /// Dashboard markup for the popup body, arrow included
    pub fn to_html(&self, layout: &PopupLayout) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<div class=\"tour-popup-header\"><h3>{}</h3>\
             <button class=\"{}\" data-tour-action=\"close\">{}</button></div>",
            escape_html(&self.title),
            PopupControl::Close.css_class(),
            PopupControl::Close.label(),
        );
        let _ = write!(
            html,
            "<div class=\"tour-popup-body\"><p>{}</p></div>",
            escape_html(&self.description)
        );
        let _ = write!(
            html,
            "<div class=\"tour-popup-footer\"><div class=\"tour-progress\"><span>{}</span>\
             <div class=\"tour-progress-bar\"><div class=\"tour-progress-fill\" style=\"width: {}%\"></div></div></div>\
             <div class=\"tour-buttons\">",
            self.progress.label(),
            self.progress.percent(),
        );
        for control in self.buttons() {
            let _ = write!(
                html,
                "<button class=\"{}\" data-tour-action=\"{}\">{}</button>",
                control.css_class(),
                control.event(),
                control.label()
            );
        }
        html.push_str("</div></div>");

        let _ = write!(
            html,
            "<div class=\"tour-popup-arrow tour-popup-arrow-{}\" style=\"left: {}px; top: {}px\"></div>",
            layout.placement, layout.arrow.offset.x, layout.arrow.offset.y
        );
        html
    }
}

/// Placement-specific arrow class, e.g. `tour-popup-arrow-left`
pub fn arrow_class(placement: Placement) -> String {
    format!("tour-popup-arrow-{placement}")
}

/// Minimal HTML text escaping for step copy
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
