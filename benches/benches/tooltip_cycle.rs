// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_tooltip::memory::{ElementId, MemoryDom};
use understory_tooltip::{HostEvent, PanelKind, Tooltip, TriggerEvent};

fn setup(count: usize, trigger: &str) -> (MemoryDom, Vec<Tooltip<MemoryDom>>) {
    let mut dom = MemoryDom::new(Size::new(1440.0, 900.0));
    dom.set_intrinsic_size("tooltip", Size::new(140.0, 36.0));
    let root = dom.root();
    let mut tips = Vec::with_capacity(count);
    for i in 0..count {
        let host: ElementId = dom.append_element(root, "ui-tooltip");
        dom.set_attr(host, "title", "Tip");
        dom.set_attr(host, "data-trigger", trigger);
        let button = dom.append_element(host, "button");
        let x = (i % 16) as f64 * 90.0;
        let y = (i / 16) as f64 * 50.0;
        dom.set_rect(button, Rect::from_origin_size((x, y), (80.0, 40.0)));
        let mut tip = Tooltip::new(host, PanelKind::Tooltip);
        tip.connect(&mut dom);
        tips.push(tip);
    }
    (dom, tips)
}

fn bench_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("tooltip_cycle");
    for &n in &[16_usize, 256] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("hover_show_position_hide_n{n}"), |b| {
            b.iter_batched(
                || setup(n, "hover"),
                |(mut dom, mut tips)| {
                    for tip in &mut tips {
                        tip.handle(&mut dom, HostEvent::Trigger(TriggerEvent::MouseEnter));
                    }
                    // Frames come back in request order, one per instance.
                    for (tip, id) in tips.iter_mut().zip(dom.take_frames()) {
                        tip.handle(&mut dom, HostEvent::AnimationFrame(id));
                    }
                    for tip in &mut tips {
                        tip.handle(&mut dom, HostEvent::Trigger(TriggerEvent::MouseLeave));
                    }
                    (dom, tips)
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("click_toggle_n{n}"), |b| {
            b.iter_batched(
                || setup(n, "click"),
                |(mut dom, mut tips)| {
                    for tip in &mut tips {
                        tip.handle(&mut dom, HostEvent::Trigger(TriggerEvent::Click));
                        tip.handle(&mut dom, HostEvent::Trigger(TriggerEvent::Click));
                    }
                    (dom, tips)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cycle);
criterion_main!(benches);
