// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate mandelplot;

use mandelplot::planes::{Pixel, PlaneMapper};
use mandelplot::{
    escape_iterations, MemorySink, PlaneTransform, RenderConfig, Renderer, UNWRITTEN,
};

fn small(width: usize, height: usize, workers: usize, segments: usize) -> RenderConfig {
    RenderConfig {
        width,
        height,
        worker_count: workers,
        segment_count: segments,
        max_iterations: 50,
        transform: PlaneTransform {
            units_per_height: 3.0,
            shift: (width as f64 / 8.0, 0.0),
        },
    }
}

#[test]
fn four_by_four_end_to_end() {
    let config = RenderConfig {
        width: 4,
        height: 4,
        worker_count: 2,
        segment_count: 2,
        max_iterations: 50,
        ..RenderConfig::default()
    };
    let renderer = Renderer::new(config.clone()).unwrap();
    let first = renderer.render().unwrap();
    assert_eq!(first.rgb.len(), 48);

    let second = renderer.render().unwrap();
    assert_eq!(first.rgb, second.rgb);

    let again = Renderer::new(config).unwrap().render().unwrap();
    assert_eq!(first.rgb, again.rgb);
}

#[test]
fn every_cell_written_and_histogram_exact_under_contention() {
    // Small grid, many segments: every band lands on the same few
    // histogram counters.
    for &(workers, segments) in &[(1, 1), (4, 16), (8, 32), (16, 90)] {
        let renderer = Renderer::new(small(24, 32, workers, segments)).unwrap();
        let buffers = renderer.compute_field().unwrap();
        let field = buffers.field().unwrap();
        let histogram = buffers.histogram();

        assert!(field.iter().all(|&c| c != UNWRITTEN && c <= 50));
        let escaped = field.iter().filter(|&&c| c < 50).count();
        assert_eq!(histogram.iter().sum::<usize>(), escaped);
        for (n, &count) in histogram.iter().enumerate() {
            assert_eq!(count, field.iter().filter(|&&c| c == n).count());
        }
    }
}

#[test]
fn parallel_field_matches_serial_evaluation() {
    let config = small(40, 30, 6, 13);
    let plane = PlaneMapper::new(config.width, config.height, config.transform).unwrap();
    let renderer = Renderer::new(config.clone()).unwrap();
    let field = renderer.compute_field().unwrap().field().unwrap();

    for row in 0..config.height {
        for column in 0..config.width {
            let pixel = Pixel(column, row);
            let expected = escape_iterations(plane.pixel_to_point(&pixel), config.max_iterations);
            assert_eq!(field[plane.offset(&pixel)], expected);
        }
    }
}

#[test]
fn output_does_not_depend_on_parallelism() {
    let serial = Renderer::new(small(30, 20, 1, 1)).unwrap().render().unwrap();
    let parallel = Renderer::new(small(30, 20, 7, 20)).unwrap().render().unwrap();
    assert_eq!(serial.rgb, parallel.rgb);
    assert_eq!(serial.inside, parallel.inside);
    assert!(serial.inside > 0 && serial.escaped > 0);
}

#[test]
fn sink_receives_the_rendered_image() {
    let renderer = Renderer::new(small(8, 6, 2, 3)).unwrap();
    let mut sink = MemorySink::default();
    let output = renderer.render_to(&mut sink).unwrap();
    assert_eq!(sink.image, Some((8, 6, output.rgb)));
}
