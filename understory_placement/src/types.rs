// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for placement: sides, requests, margins, inputs, and decisions.

use core::fmt;
use core::str::FromStr;

use kurbo::{Point, Rect, Size, Vec2};

/// An edge of the trigger that a floating panel is anchored to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    /// Above the trigger.
    Top,
    /// Below the trigger.
    Bottom,
    /// Left of the trigger.
    Left,
    /// Right of the trigger.
    Right,
}

impl Side {
    /// All sides in tie-break priority order (top > bottom > left > right).
    pub const PRIORITY: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// The side across the trigger.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// True for [`Side::Top`] and [`Side::Bottom`].
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Swap left and right; top and bottom are unchanged.
    ///
    /// This is the simple mirroring used for right-to-left documents.
    pub const fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            other => other,
        }
    }

    /// Lowercase name, as used in markup and class names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`Side`] or [`Placement`] from a string.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown placement")]
pub struct ParsePlacementError;

impl FromStr for Side {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(ParsePlacementError),
        }
    }
}

/// A requested placement: a fixed side or `Auto`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Placement {
    /// Pick the side with the most room.
    Auto,
    /// Prefer above the trigger.
    #[default]
    Top,
    /// Prefer below the trigger.
    Bottom,
    /// Prefer left of the trigger.
    Left,
    /// Prefer right of the trigger.
    Right,
}

impl Placement {
    /// The requested side, or `None` for `Auto`.
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Auto => None,
            Self::Top => Some(Side::Top),
            Self::Bottom => Some(Side::Bottom),
            Self::Left => Some(Side::Left),
            Self::Right => Some(Side::Right),
        }
    }

    /// Mirror the requested side for right-to-left documents.
    pub const fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            other => other,
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side() {
            Some(side) => f.write_str(side.as_str()),
            None => f.write_str("auto"),
        }
    }
}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "auto" {
            return Ok(Self::Auto);
        }
        s.parse::<Side>().map(Self::from)
    }
}

impl From<Side> for Placement {
    fn from(side: Side) -> Self {
        match side {
            Side::Top => Self::Top,
            Side::Bottom => Self::Bottom,
            Side::Left => Self::Left,
            Side::Right => Self::Right,
        }
    }
}

/// Free space around the trigger, measured against the viewport.
///
/// Values can be negative when the trigger is partially off-screen.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Margins {
    /// Space between the viewport top and the trigger top.
    pub top: f64,
    /// Space between the trigger bottom and the viewport bottom.
    pub bottom: f64,
    /// Space between the viewport left and the trigger left.
    pub left: f64,
    /// Space between the trigger right and the viewport right.
    pub right: f64,
}

impl Margins {
    /// Measure margins around `trigger` (viewport coordinates) within a viewport of `viewport` size.
    pub fn around(trigger: Rect, viewport: Size) -> Self {
        Self {
            top: trigger.y0,
            bottom: viewport.height - trigger.y1,
            left: trigger.x0,
            right: viewport.width - trigger.x1,
        }
    }

    /// Margin on the given side.
    pub const fn on(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.top,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// The side with the most room; ties go to the earlier side in [`Side::PRIORITY`].
    pub fn roomiest(&self) -> Side {
        let mut best = Side::Top;
        for side in Side::PRIORITY {
            if self.on(side) > self.on(best) {
                best = side;
            }
        }
        best
    }
}

/// Measured inputs for one positioning pass.
///
/// All rectangles are in viewport coordinates, as a host would report them from
/// layout (for example `getBoundingClientRect`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry {
    /// Bounds of the trigger element.
    pub trigger: Rect,
    /// Size of the floating panel as currently laid out.
    pub panel: Size,
    /// Bounds of the container the panel is appended to.
    pub container: Rect,
    /// Scroll offset of the container (window scroll for the document root).
    pub scroll: Vec2,
    /// Size of the viewport.
    pub viewport: Size,
}

impl Geometry {
    /// Offset that maps viewport coordinates to container coordinates.
    pub fn container_offset(&self) -> Vec2 {
        self.scroll - self.container.origin().to_vec2()
    }

    /// Margins around the trigger within the viewport.
    pub fn margins(&self) -> Margins {
        Margins::around(self.trigger, self.viewport)
    }
}

/// Final placement for one positioning pass.
///
/// `top`/`left` are container coordinates, ready to be written to the panel's inline style.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementDecision {
    /// Side the panel ended up on.
    pub side: Side,
    /// Top edge of the panel in container coordinates.
    pub top: f64,
    /// Left edge of the panel in container coordinates.
    pub left: f64,
    /// Whether the side was flipped away from the initial choice.
    pub flipped: bool,
}

impl PlacementDecision {
    /// Top-left corner as a point (`x = left`, `y = top`).
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Panel bounds in viewport coordinates, assuming layout honors the decision exactly.
    pub fn viewport_rect(&self, geometry: &Geometry) -> Rect {
        Rect::from_origin_size(self.origin() - geometry.container_offset(), geometry.panel)
    }

    /// Clamp the panel so it stays inside `bounds` (container coordinates).
    ///
    /// The resolver never clamps on its own; callers that want edge clamping layer this on top.
    /// When the panel is larger than `bounds`, its top-left edge is kept inside.
    pub fn clamp_within(self, bounds: Rect, panel: Size) -> Self {
        let max_left = bounds.x1 - panel.width;
        let max_top = bounds.y1 - panel.height;
        Self {
            left: self.left.min(max_left).max(bounds.x0),
            top: self.top.min(max_top).max(bounds.y0),
            ..self
        }
    }
}

/// Result of [`settle`](crate::settle): the decision plus the arrow offset along the panel edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Settled {
    /// Placement after flip and gap normalization.
    pub decision: PlacementDecision,
    /// Arrow offset from the panel's left (vertical sides) or top (horizontal sides).
    pub arrow: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parse_and_display() {
        for side in Side::PRIORITY {
            assert_eq!(side.as_str().parse::<Side>(), Ok(side));
        }
        assert_eq!(" left ".parse::<Side>(), Ok(Side::Left));
        assert_eq!("middle".parse::<Side>(), Err(ParsePlacementError));
    }

    #[test]
    fn placement_parse() {
        assert_eq!("auto".parse::<Placement>(), Ok(Placement::Auto));
        assert_eq!("bottom".parse::<Placement>(), Ok(Placement::Bottom));
        assert!("".parse::<Placement>().is_err());
        assert_eq!(Placement::default().side(), Some(Side::Top));
    }

    #[test]
    fn mirroring_swaps_horizontal_only() {
        assert_eq!(Side::Left.mirrored(), Side::Right);
        assert_eq!(Side::Top.mirrored(), Side::Top);
        assert_eq!(Placement::Auto.mirrored(), Placement::Auto);
        assert_eq!(Placement::Right.mirrored(), Placement::Left);
    }

    #[test]
    fn roomiest_prefers_priority_on_ties() {
        let even = Margins {
            top: 10.0,
            bottom: 10.0,
            left: 10.0,
            right: 10.0,
        };
        assert_eq!(even.roomiest(), Side::Top);
        let lr = Margins {
            top: 1.0,
            bottom: 1.0,
            left: 50.0,
            right: 50.0,
        };
        assert_eq!(lr.roomiest(), Side::Left);
        let right = Margins { right: 51.0, ..lr };
        assert_eq!(right.roomiest(), Side::Right);
    }

    #[test]
    fn clamp_within_keeps_panel_inside() {
        let d = PlacementDecision {
            side: Side::Top,
            top: -20.0,
            left: 190.0,
            flipped: false,
        };
        let c = d.clamp_within(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(40.0, 20.0));
        assert_eq!((c.left, c.top), (160.0, 0.0));

        // Oversized panels pin to the top-left edge.
        let c = d.clamp_within(Rect::new(0.0, 0.0, 20.0, 10.0), Size::new(40.0, 20.0));
        assert_eq!((c.left, c.top), (0.0, 0.0));
    }
}
