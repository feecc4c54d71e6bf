// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement resolution: side selection, flipping, coordinates, gap normalization, arrow alignment.

use kurbo::{Rect, Size};

use crate::types::{Geometry, Margins, Placement, PlacementDecision, Settled, Side};

/// Space kept between the trigger and a panel above or below it.
pub const VERTICAL_CLEARANCE: f64 = 10.0;

/// Target gap between the trigger and a panel left or right of it, after normalization.
pub const SIDE_GAP: f64 = 8.0;

/// Largest gap error left uncorrected by [`gap_correction`].
pub const GAP_TOLERANCE: f64 = 0.2;

/// Minimum distance between the arrow and either end of the panel edge.
pub const ARROW_INSET: f64 = 6.0;

/// Pick the side for a panel of `panel` size, flipping at most once.
///
/// `Auto` picks [`Margins::roomiest`]. The chosen side flips to its opposite when the
/// panel does not fit (height plus [`VERTICAL_CLEARANCE`] for vertical sides, width for
/// horizontal ones) and the opposite side has strictly more room.
///
/// Returns the side and whether it was flipped.
pub fn choose_side(margins: &Margins, panel: Size, requested: Placement) -> (Side, bool) {
    let side = requested.side().unwrap_or_else(|| margins.roomiest());
    let needed = if side.is_vertical() {
        panel.height + VERTICAL_CLEARANCE
    } else {
        panel.width
    };
    let opposite = side.opposite();
    if needed > margins.on(side) && margins.on(opposite) > margins.on(side) {
        (opposite, true)
    } else {
        (side, false)
    }
}

/// Resolve where to put the panel, before gap normalization.
///
/// Coordinates are in container space: the trigger's viewport position is shifted by the
/// container origin and scroll offset. The panel is centered on the trigger along the
/// edge it is attached to. Nothing is clamped to the viewport.
pub fn resolve(geometry: &Geometry, requested: Placement) -> PlacementDecision {
    let base = geometry.trigger.origin() + geometry.container_offset();
    let trigger = geometry.trigger.size();
    let panel = geometry.panel;
    let (side, flipped) = choose_side(&geometry.margins(), panel, requested);

    let centered_left = base.x + trigger.width / 2.0 - panel.width / 2.0;
    let centered_top = base.y + trigger.height / 2.0 - panel.height / 2.0;
    let (top, left) = match side {
        Side::Top => (base.y - panel.height - VERTICAL_CLEARANCE, centered_left),
        Side::Bottom => (base.y + trigger.height + VERTICAL_CLEARANCE, centered_left),
        Side::Left => (centered_top, base.x - panel.width),
        Side::Right => (centered_top, base.x + trigger.width),
    };

    PlacementDecision {
        side,
        top,
        left,
        flipped,
    }
}

/// Horizontal correction that brings the rendered gap to [`SIDE_GAP`].
///
/// `trigger` and `panel` are the rendered rects in the same (viewport) space. Returns the
/// delta to add to the decision's `left`, or `None` when the side is vertical or the gap
/// is already within [`GAP_TOLERANCE`].
pub fn gap_correction(side: Side, trigger: Rect, panel: Rect) -> Option<f64> {
    let gap = match side {
        Side::Left => trigger.x0 - panel.x1,
        Side::Right => panel.x0 - trigger.x1,
        Side::Top | Side::Bottom => return None,
    };
    let error = SIDE_GAP - gap;
    if (-GAP_TOLERANCE..=GAP_TOLERANCE).contains(&error) {
        return None;
    }
    Some(if side == Side::Right { error } else { -error })
}

/// Arrow offset along the panel edge that faces the trigger.
///
/// For vertical sides this is the distance from the panel's left edge, for horizontal
/// sides the distance from its top edge. The arrow is centered on the trigger's midpoint
/// and clamped to `[ARROW_INSET, extent - ARROW_INSET - arrow_size]`; when the panel is
/// too small for that range, the lower bound wins.
pub fn arrow_offset(side: Side, trigger: Rect, panel: Rect, arrow_size: f64) -> f64 {
    let center = trigger.center();
    let (midpoint, start, extent) = if side.is_vertical() {
        (center.x, panel.x0, panel.width())
    } else {
        (center.y, panel.y0, panel.height())
    };
    let offset = midpoint - start - arrow_size / 2.0;
    offset
        .min(extent - ARROW_INSET - arrow_size)
        .max(ARROW_INSET)
}

/// Run the whole pass for hosts whose layout honors the decision exactly.
///
/// Equivalent to [`resolve`], then [`gap_correction`] against the computed rect, then
/// [`arrow_offset`] on the final rect. Hosts with real layout should re-measure between
/// the steps instead.
pub fn settle(geometry: &Geometry, requested: Placement, arrow_size: f64) -> Settled {
    let mut decision = resolve(geometry, requested);
    if let Some(delta) = gap_correction(
        decision.side,
        geometry.trigger,
        decision.viewport_rect(geometry),
    ) {
        decision.left += delta;
    }
    let arrow = arrow_offset(
        decision.side,
        geometry.trigger,
        decision.viewport_rect(geometry),
        arrow_size,
    );
    Settled { decision, arrow }
}
