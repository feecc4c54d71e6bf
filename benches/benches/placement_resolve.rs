// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size, Vec2};
use understory_placement::{Geometry, Placement, resolve, settle};

const VIEWPORT: Size = Size::new(1440.0, 900.0);

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Triggers scattered over the viewport, including its edges, so flips happen.
fn gen_geometries(count: usize, container: Rect, scroll: Vec2) -> Vec<Geometry> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let w = 16.0 + rng.next_f64() * 160.0;
            let h = 16.0 + rng.next_f64() * 40.0;
            let x0 = rng.next_f64() * (VIEWPORT.width - w);
            let y0 = rng.next_f64() * (VIEWPORT.height - h);
            let pw = 60.0 + rng.next_f64() * 240.0;
            let ph = 24.0 + rng.next_f64() * 120.0;
            Geometry {
                trigger: Rect::from_origin_size((x0, y0), (w, h)),
                panel: Size::new(pw, ph),
                container,
                scroll,
                viewport: VIEWPORT,
            }
        })
        .collect()
}

const PLACEMENTS: [Placement; 5] = [
    Placement::Auto,
    Placement::Top,
    Placement::Bottom,
    Placement::Left,
    Placement::Right,
];

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let document = Rect::from_origin_size((0.0, 0.0), VIEWPORT);
    for &n in &[64_usize, 1024] {
        let geometries = gen_geometries(n, document, Vec2::ZERO);
        group.throughput(Throughput::Elements(n as u64));
        for placement in PLACEMENTS {
            group.bench_function(format!("{placement}_n{n}"), |b| {
                b.iter(|| {
                    for g in &geometries {
                        black_box(resolve(black_box(g), placement));
                    }
                });
            });
        }
    }
    group.finish();
}

fn bench_settle(c: &mut Criterion) {
    let mut group = c.benchmark_group("settle");
    let n = 1024_usize;
    group.throughput(Throughput::Elements(n as u64));

    let document = gen_geometries(n, Rect::from_origin_size((0.0, 0.0), VIEWPORT), Vec2::ZERO);
    group.bench_function("document", |b| {
        b.iter(|| {
            for g in &document {
                black_box(settle(black_box(g), Placement::Auto, 8.0));
            }
        });
    });

    let scrolled = gen_geometries(
        n,
        Rect::from_origin_size((120.0, 80.0), (800.0, 600.0)),
        Vec2::new(0.0, 2400.0),
    );
    group.bench_function("scrolled_container", |b| {
        b.iter(|| {
            for g in &scrolled {
                black_box(settle(black_box(g), Placement::Right, 8.0));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_settle);
criterion_main!(benches);
