//! Popup placement
//!
//! Places the popup on the requested side of its target, centred on the other
//! axis, then clamps it into the viewport. Clamping wins over centring, so the
//! arrow is computed afterwards from the final popup position and keeps
//! pointing at the middle of the target.

use crate::config::PlacementMetrics;
use crate::types::{Placement, Point, Rect, Size};

/// Where the arrow sits, in popup-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    /// Popup edge the arrow is drawn on
    pub edge: Placement,
    pub offset: Point,
}

/// Final popup position in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupLayout {
    pub placement: Placement,
    pub top: f64,
    pub left: f64,
    pub size: Size,
    pub arrow: Arrow,
}

impl PopupLayout {
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.size.width, self.size.height)
    }
}

/// Clamp into `[padding, extent - span - padding]`; the lower bound wins when
/// the popup does not fit.
pub fn clamp_axis(value: f64, span: f64, extent: f64, padding: f64) -> f64 {
    padding.max(value.min(extent - span - padding))
}

/// Compute the popup position for `target` (viewport coordinates)
pub fn place_popup(
    target: Rect,
    popup: Size,
    placement: Placement,
    viewport: Size,
    metrics: &PlacementMetrics,
) -> PopupLayout {
    let margin = metrics.margin;
    let centred_left = target.center_x() - popup.width / 2.0;
    let centred_top = target.center_y() - popup.height / 2.0;

    let (top, left) = match placement {
        Placement::Top => (target.top - popup.height - margin, centred_left),
        Placement::Bottom => (target.bottom() + margin, centred_left),
        Placement::Left => (centred_top, target.left - popup.width - margin),
        Placement::Right => (centred_top, target.right() + margin),
    };

    let padding = metrics.viewport_padding;
    let top = clamp_axis(top, popup.height, viewport.height, padding);
    let left = clamp_axis(left, popup.width, viewport.width, padding);

    PopupLayout {
        placement,
        top,
        left,
        size: popup,
        arrow: arrow_for(target, top, left, popup, placement, metrics.arrow_size),
    }
}

fn arrow_for(
    target: Rect,
    top: f64,
    left: f64,
    popup: Size,
    placement: Placement,
    arrow_size: f64,
) -> Arrow {
    let along_x = target.center_x() - left;
    let along_y = target.center_y() - top;

    let offset = match placement {
        Placement::Top => Point::new(along_x, popup.height),
        Placement::Bottom => Point::new(along_x, -arrow_size),
        Placement::Left => Point::new(popup.width, along_y),
        Placement::Right => Point::new(-arrow_size, along_y),
    };

    Arrow {
        edge: placement.facing_edge(),
        offset,
    }
}
