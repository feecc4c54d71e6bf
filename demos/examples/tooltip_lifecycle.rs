// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip lifecycle on the headless host.
//!
//! Drive a hover tooltip and a click popover through show, position, and hide,
//! printing the panel markup state along the way. Set `RUST_LOG=understory_tooltip=trace`
//! to see the state machine's own logging.
//!
//! Run:
//! - `cargo run -p understory_demos --example tooltip_lifecycle`

use kurbo::{Rect, Size};
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_tooltip::memory::MemoryDom;
use understory_tooltip::{HostEvent, PanelKind, Tooltip, TriggerEvent};

fn flush(dom: &mut MemoryDom, tip: &mut Tooltip<MemoryDom>) {
    for id in dom.take_frames() {
        tip.handle(dom, HostEvent::AnimationFrame(id));
    }
}

fn report(dom: &MemoryDom, tip: &Tooltip<MemoryDom>) {
    match tip.panel() {
        Some(panel) => {
            let root = *panel.root();
            println!(
                "  {:?}: class=\"{}\" position={:?} arrow={:?}",
                tip.state(),
                dom.class_name(root),
                dom.position(root),
                dom.arrow_offset(*panel.arrow()),
            );
        }
        None => println!("  {:?}", tip.state()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut dom = MemoryDom::new(Size::new(1200.0, 800.0));
    dom.set_intrinsic_size("tooltip", Size::new(140.0, 36.0));
    dom.set_intrinsic_size("popover", Size::new(220.0, 90.0));
    let root = dom.root();

    // Hover tooltip.
    let host = dom.append_element(root, "ui-tooltip");
    dom.set_attr(host, "title", "Save changes");
    let button = dom.append_element(host, "button");
    dom.set_rect(button, Rect::from_origin_size((200.0, 300.0), (80.0, 40.0)));
    let mut tip = Tooltip::new(host, PanelKind::Tooltip);
    tip.connect(&mut dom);

    info!("hover tooltip");
    tip.handle(&mut dom, HostEvent::Trigger(TriggerEvent::MouseEnter));
    report(&dom, &tip);
    flush(&mut dom, &mut tip);
    report(&dom, &tip);
    tip.handle(&mut dom, HostEvent::Trigger(TriggerEvent::MouseLeave));
    report(&dom, &tip);

    // Click popover near the right edge: requested right, flips left.
    let host = dom.append_element(root, "ui-popover");
    dom.set_attr(host, "data-original-title", "<b>Details</b> live here");
    let link = dom.append_element(host, "a");
    dom.set_rect(link, Rect::from_origin_size((1100.0, 200.0), (60.0, 20.0)));
    let mut pop = Tooltip::new(host, PanelKind::Popover);
    pop.connect(&mut dom);

    info!("click popover");
    pop.handle(&mut dom, HostEvent::Trigger(TriggerEvent::Click));
    flush(&mut dom, &mut pop);
    report(&dom, &pop);
    if let Some(panel) = pop.panel() {
        println!("  content html: {:?}", dom.inner_html(*panel.content()));
    }
    pop.handle(&mut dom, HostEvent::OutsideClick(Some(root)));
    report(&dom, &pop);

    tip.disconnect(&mut dom);
    pop.disconnect(&mut dom);
    println!("live listeners after disconnect: {}", dom.live_listeners());
}
