// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mandelplot::{escape_iterations, RenderConfig, Renderer};
use num::Complex;

fn bench_escape(c: &mut Criterion) {
    let point = Complex::new(-0.75, 0.1);
    c.bench_function("escape_iterations", |b| {
        b.iter(|| escape_iterations(black_box(point), 5000))
    });
}

fn bench_render(c: &mut Criterion) {
    let config = RenderConfig {
        width: 240,
        height: 180,
        max_iterations: 500,
        ..RenderConfig::default()
    };
    let renderer = Renderer::new(config).unwrap();
    c.bench_function("render 240x180", |b| b.iter(|| renderer.render().unwrap()));
}

criterion_group!(benches, bench_escape, bench_render);
criterion_main!(benches);
