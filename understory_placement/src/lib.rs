// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_placement --heading-base-level=0

//! Understory Placement: where to draw a floating panel next to its trigger.
//!
//! Tooltips and popovers are detached panels anchored to a trigger element.
//! This crate decides, purely from measured geometry, which side of the trigger the panel goes on and where exactly.
//! It does no measurement and touches no DOM; hosts feed it rectangles and apply the result.
//!
//! ## Inputs
//!
//! A [`Geometry`] carries the trigger rect, the panel size, the container rect and its scroll offset, and the viewport size.
//! Rects are in viewport coordinates, as layout reports them.
//! The output [`PlacementDecision`] is in container coordinates, ready to be written to the panel's `top`/`left`.
//!
//! ## Algorithm
//!
//! 1) Shift the trigger into container space (container origin and scroll).
//! 2) Measure free space above, below, left and right of the trigger against the viewport ([`Margins`]).
//! 3) Pick a side: the requested one, or for [`Placement::Auto`] the roomiest ([`Margins::roomiest`]), ties broken top > bottom > left > right.
//! 4) Flip once to the opposite side if the panel does not fit and the opposite side has strictly more room ([`choose_side`]).
//!    Vertical sides need the panel height plus [`VERTICAL_CLEARANCE`]; horizontal sides need the panel width.
//! 5) Center the panel on the trigger along the attached edge ([`resolve`]).
//! 6) For left/right sides, re-measure the rendered panel and correct the horizontal gap to [`SIDE_GAP`] ([`gap_correction`]).
//! 7) Center the arrow on the trigger midpoint, clamped to [`ARROW_INSET`] from both panel ends ([`arrow_offset`]).
//!
//! Nothing is clamped to the viewport. Callers that want edge clamping can layer
//! [`PlacementDecision::clamp_within`] on top.
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::{Rect, Size, Vec2};
//! use understory_placement::{Geometry, Placement, Side, settle};
//!
//! let geometry = Geometry {
//!     trigger: Rect::from_origin_size((200.0, 300.0), (80.0, 40.0)),
//!     panel: Size::new(140.0, 36.0),
//!     container: Rect::new(0.0, 0.0, 1200.0, 800.0),
//!     scroll: Vec2::ZERO,
//!     viewport: Size::new(1200.0, 800.0),
//! };
//!
//! let settled = settle(&geometry, Placement::Top, 8.0);
//! assert_eq!(settled.decision.side, Side::Top);
//! assert_eq!(settled.decision.top, 254.0);
//! assert_eq!(settled.decision.left, 170.0);
//! ```
//!
//! Hosts with real layout run [`resolve`], write the coordinates, re-measure, apply
//! [`gap_correction`], and finally compute [`arrow_offset`] from the rendered rect.
//! [`settle`] runs the same steps when the computed rect can be trusted as rendered.
//!
//! This crate is `no_std`.

#![no_std]

mod resolve;
mod types;

pub use resolve::{
    ARROW_INSET, GAP_TOLERANCE, SIDE_GAP, VERTICAL_CLEARANCE, arrow_offset, choose_side,
    gap_correction, resolve, settle,
};
pub use types::{
    Geometry, Margins, ParsePlacementError, Placement, PlacementDecision, Settled, Side,
};
