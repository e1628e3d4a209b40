// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-batch buffers and the job that fills them.
//!
//! A [`FieldBuffers`] is allocated once per batch.  It holds the
//! iteration field, one cell per pixel, and the histogram of escape
//! counts.  Workers never see the whole buffer: each job is handed a
//! [`RowBand`], which only accepts writes to pixels inside its own
//! row range.  Because bands never overlap, each field cell is written
//! by exactly one job and needs no lock.  The histogram is shared by
//! everybody, so each job counts into a private histogram and merges
//! it into the shared one under a mutex just before finishing.

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use itertools::iproduct;
use log::debug;

use crate::error::{Error, Result};
use crate::escape::escape_iterations;
use crate::planes::{Pixel, PlaneMapper};
use crate::pool::Completion;

/// Value of a field cell that no job has written.
pub const UNWRITTEN: usize = usize::MAX;

/// Allocates `len` cells, reporting failure instead of aborting.
pub(crate) fn try_alloc<T, F>(what: &'static str, len: usize, fill: F) -> Result<Vec<T>>
where
    F: FnMut() -> T,
{
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(len)
        .map_err(|_| Error::Allocation { what, len })?;
    cells.extend(std::iter::repeat_with(fill).take(len));
    Ok(cells)
}

/// The iteration field and histogram of one batch.
pub struct FieldBuffers {
    width: usize,
    height: usize,
    max_iterations: usize,
    field: Box<[AtomicUsize]>,
    histogram: Mutex<Vec<usize>>,
}

impl FieldBuffers {
    /// Allocates the buffers for a `width` by `height` image.  Every
    /// field cell starts out as [`UNWRITTEN`].
    pub fn new(width: usize, height: usize, max_iterations: usize) -> Result<FieldBuffers> {
        let len = width
            .checked_mul(height)
            .ok_or(Error::Allocation {
                what: "iteration field",
                len: usize::MAX,
            })?;
        let field = try_alloc("iteration field", len, || AtomicUsize::new(UNWRITTEN))?;
        let histogram = try_alloc("histogram", max_iterations, || 0)?;
        Ok(FieldBuffers {
            width,
            height,
            max_iterations,
            field: field.into_boxed_slice(),
            histogram: Mutex::new(histogram),
        })
    }

    /// Image width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The escape cutoff the field is computed with.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Hands out write access to `rows`.  The caller is responsible for
    /// never handing out overlapping bands.
    pub fn band(self: &Arc<Self>, rows: Range<usize>) -> RowBand {
        assert!(
            rows.start <= rows.end && rows.end <= self.height,
            "row band {:?} outside of 0..{}",
            rows,
            self.height
        );
        RowBand {
            buffers: Arc::clone(self),
            rows,
        }
    }

    /// Copies the field out.  Only meaningful once every band has
    /// been computed.
    pub fn field(&self) -> Result<Vec<usize>> {
        let mut cells = self.field.iter();
        try_alloc("field snapshot", self.field.len(), || {
            cells.next().map_or(UNWRITTEN, |c| c.load(Ordering::Relaxed))
        })
    }

    /// Copies the histogram out.
    pub fn histogram(&self) -> Vec<usize> {
        self.histogram
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn merge(&self, partial: &[usize]) {
        let mut histogram = self.histogram.lock().unwrap_or_else(PoisonError::into_inner);
        for (total, count) in histogram.iter_mut().zip(partial) {
            *total += count;
        }
    }
}

/// Write access to a contiguous range of rows of a [`FieldBuffers`].
pub struct RowBand {
    buffers: Arc<FieldBuffers>,
    rows: Range<usize>,
}

impl RowBand {
    /// The rows this band may write.
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    /// Stores the iteration count of one pixel of this band.
    pub fn store(&self, pixel: &Pixel, iterations: usize) {
        assert!(
            self.rows.contains(&pixel.1) && pixel.0 < self.buffers.width,
            "pixel {:?} is outside of the band {:?}",
            pixel,
            self.rows
        );
        let offset = pixel.1 * self.buffers.width + pixel.0;
        let previous = self.buffers.field[offset].swap(iterations, Ordering::Relaxed);
        debug_assert_eq!(previous, UNWRITTEN, "pixel {:?} written twice", pixel);
    }
}

/// Computes every pixel of `band`: stores its escape count in the
/// field and, for points that escaped, counts it in the histogram.
/// Finishes `done` once the band is complete.
pub fn compute_rows(band: RowBand, plane: &PlaneMapper, done: Completion) {
    let max_iterations = band.buffers.max_iterations;
    let mut partial = vec![0usize; max_iterations];

    for (row, column) in iproduct!(band.rows(), 0..band.buffers.width) {
        let pixel = Pixel(column, row);
        let iterations = escape_iterations(plane.pixel_to_point(&pixel), max_iterations);
        band.store(&pixel, iterations);
        if iterations < max_iterations {
            partial[iterations] += 1;
        }
    }

    band.buffers.merge(&partial);
    debug!("rows {:?} computed", band.rows);
    // Release the buffers before the batch can be seen as drained.
    drop(band);
    done.finish();
}
