// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Runs one batch: cut the image into row segments, hand every
//! segment to the pool, wait for the pool to drain, then colour the
//! result on the calling thread.

use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;

use crate::colorize::Colorizer;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::field::{compute_rows, FieldBuffers};
use crate::planes::PlaneMapper;
use crate::pool::WorkerPool;
use crate::sink::PixelSink;

/// Splits `0..height` into `segments` contiguous row ranges of equal
/// size; the last one absorbs the remainder.  More segments than rows
/// collapse to one row per segment.
pub fn partition(height: usize, segments: usize) -> Vec<Range<usize>> {
    let segments = segments.max(1).min(height.max(1));
    let rows = height / segments;
    (0..segments)
        .map(|i| {
            let start = i * rows;
            let end = if i + 1 == segments { height } else { start + rows };
            start..end
        })
        .collect()
}

/// The result of one render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Image width.
    pub width: usize,
    /// Image height.
    pub height: usize,
    /// `width * height * 3` bytes, row-major, top to bottom.
    pub rgb: Vec<u8>,
    /// Pixels that reached the iteration cutoff.
    pub inside: usize,
    /// Pixels that escaped.
    pub escaped: usize,
    /// Wall-clock time of the whole batch.
    pub elapsed: Duration,
}

/// Owns a worker pool and renders batches on it.  The pool lives as
/// long as the renderer, so repeated renders reuse the same threads.
pub struct Renderer {
    config: RenderConfig,
    plane: Arc<PlaneMapper>,
    pool: WorkerPool,
}

impl Renderer {
    /// Validates `config` and starts the pool.
    pub fn new(config: RenderConfig) -> Result<Renderer> {
        config.validate()?;
        let plane = PlaneMapper::new(config.width, config.height, config.transform)?;
        let pool = WorkerPool::new(config.worker_count)?;
        Ok(Renderer {
            config,
            plane: Arc::new(plane),
            pool,
        })
    }

    /// The configuration this renderer was built with.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Computes the escape field and histogram of the whole image.
    /// Returns once every segment is done.
    pub fn compute_field(&self) -> Result<Arc<FieldBuffers>> {
        let buffers = Arc::new(FieldBuffers::new(
            self.config.width,
            self.config.height,
            self.config.max_iterations,
        )?);

        for rows in partition(self.config.height, self.config.segment_count) {
            let band = buffers.band(rows);
            let plane = Arc::clone(&self.plane);
            self.pool.submit(move |done| compute_rows(band, &plane, done));
        }
        self.pool.await_drain()?;
        Ok(buffers)
    }

    /// Renders the full image.
    pub fn render(&self) -> Result<RenderOutput> {
        let start = Instant::now();
        info!(
            "rendering {}x{} in {} segments on {} workers",
            self.config.width,
            self.config.height,
            self.config.segment_count,
            self.pool.size()
        );

        let buffers = self.compute_field()?;
        let field = buffers.field()?;
        let histogram = buffers.histogram();
        drop(buffers);

        let escaped: usize = histogram.iter().sum();
        let rgb = Colorizer::new(self.config.max_iterations).colorize(&field, &histogram)?;
        let elapsed = start.elapsed();
        info!("calculations took {:.3} seconds", elapsed.as_secs_f64());

        Ok(RenderOutput {
            width: self.config.width,
            height: self.config.height,
            rgb,
            inside: field.len() - escaped,
            escaped,
            elapsed,
        })
    }

    /// Renders the full image and presents it to `sink`.  Nothing
    /// reaches the sink if the render fails.
    pub fn render_to<S: PixelSink + ?Sized>(&self, sink: &mut S) -> Result<RenderOutput> {
        let output = self.render()?;
        sink.present(output.width, output.height, &output.rgb)?;
        Ok(output)
    }
}
