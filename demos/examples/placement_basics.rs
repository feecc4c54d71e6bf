// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement basics.
//!
//! Resolve a panel next to a trigger, watch it flip near the viewport edge, and
//! settle the side gap and arrow.
//!
//! Run:
//! - `cargo run -p understory_demos --example placement_basics`

use kurbo::{Rect, Size, Vec2};
use understory_placement::{Geometry, Placement, resolve, settle};

fn main() {
    let viewport = Size::new(1200.0, 800.0);
    let document = Rect::from_origin_size((0.0, 0.0), viewport);

    // A button in the middle of the page with a small tooltip.
    let geometry = Geometry {
        trigger: Rect::from_origin_size((200.0, 300.0), (80.0, 40.0)),
        panel: Size::new(140.0, 36.0),
        container: document,
        scroll: Vec2::ZERO,
        viewport,
    };
    for placement in [
        Placement::Top,
        Placement::Bottom,
        Placement::Left,
        Placement::Right,
        Placement::Auto,
    ] {
        let d = resolve(&geometry, placement);
        println!(
            "{placement}: side={} top={} left={} flipped={}",
            d.side, d.top, d.left, d.flipped
        );
    }

    // Near the bottom edge a bottom request flips to the top.
    let low = Geometry {
        trigger: Rect::from_origin_size((200.0, 780.0), (80.0, 0.0)),
        panel: Size::new(140.0, 100.0),
        ..geometry
    };
    let d = resolve(&low, Placement::Bottom);
    println!(
        "near edge: side={} top={} flipped={}",
        d.side, d.top, d.flipped
    );

    // Settled placement: side gap normalized, arrow centered on the trigger.
    let s = settle(&geometry, Placement::Right, 8.0);
    println!(
        "settled right: left={} gap={} arrow={}",
        s.decision.left,
        s.decision.left - geometry.trigger.x1,
        s.arrow
    );

    // Inside a scrolled container, coordinates are container-relative.
    let scrolled = Geometry {
        container: Rect::from_origin_size((100.0, 50.0), (600.0, 400.0)),
        scroll: Vec2::new(0.0, 120.0),
        ..geometry
    };
    let d = resolve(&scrolled, Placement::Top);
    println!("scrolled container: top={} left={}", d.top, d.left);
}
