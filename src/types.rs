//! Core value types for the tour engine
//!
//! Geometry is expressed in page units (CSS pixels for DOM hosts, cells for the
//! terminal host). Placement and notification kinds are proper enums rather than
//! strings so every match over them is exhaustive.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Side of the target element the popup is rendered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "lowercase")]
pub enum Placement {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Placement {
    /// Lenient parse: anything unrecognised lands below the target.
    pub fn from_name(name: &str) -> Self {
        name.trim()
            .to_ascii_lowercase()
            .parse()
            .unwrap_or(Placement::Bottom)
    }

    /// True for placements that center the popup horizontally
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// The popup edge that faces the target
    pub const fn facing_edge(self) -> Placement {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl From<String> for Placement {
    fn from(value: String) -> Self {
        Placement::from_name(&value)
    }
}

impl From<Placement> for String {
    fn from(value: Placement) -> Self {
        value.to_string()
    }
}

/// Kind of toast notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NoticeKind {
    #[default]
    Success,
    Info,
    Error,
}

/// Width and height of a box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A point in page units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box, same shape as a DOM `getBoundingClientRect()`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Shift the box vertically (document → viewport coordinates and back)
    pub fn offset_y(&self, dy: f64) -> Self {
        Self {
            top: self.top + dy,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_placement_serialization() {
        assert_eq!(Placement::Top.to_string(), "top");
        assert_eq!(Placement::Right.to_string(), "right");
        assert_eq!(Placement::from_str("left").unwrap(), Placement::Left);
    }

    #[test]
    fn test_placement_unknown_falls_back_to_bottom() {
        assert_eq!(Placement::from_name("diagonal"), Placement::Bottom);
        assert_eq!(Placement::from_name(""), Placement::Bottom);
        assert_eq!(Placement::from_name(" TOP "), Placement::Top);
        assert!(Placement::from_str("diagonal").is_err());
    }

    #[test]
    fn test_placement_serde_is_lenient() {
        let parsed: Placement = serde_json::from_str("\"center\"").unwrap();
        assert_eq!(parsed, Placement::Bottom);
        let json = serde_json::to_string(&Placement::Left).unwrap();
        assert_eq!(json, "\"left\"");
    }

    #[test]
    fn test_facing_edge_is_opposite() {
        for placement in Placement::iter() {
            assert_ne!(placement.facing_edge(), placement);
            assert_eq!(placement.facing_edge().facing_edge(), placement);
        }
    }

    #[test]
    fn test_notice_kind_names() {
        let kinds: Vec<String> = NoticeKind::iter().map(|k| k.to_string()).collect();
        assert_eq!(kinds, vec!["success", "info", "error"]);
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.center_x(), 60.0);
        assert_eq!(rect.center_y(), 45.0);
        assert_eq!(rect.offset_y(-20.0).top, 0.0);
    }
}
