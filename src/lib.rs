#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer with histogram colouring
//!
//! The Mandelbrot set takes a point on the complex plane and
//! repeatedly squares it, adding the original point back each time,
//! counting how many steps it takes for the result to run off towards
//! infinity.  That count, the escape iteration, is what gets coloured.
//! Points that never escape within the iteration limit belong to the
//! set and are painted black.
//!
//! Colouring by the raw count puts nearly the whole palette into the
//! first few iterations.  Instead, this crate builds a histogram of
//! escape counts over the whole image and colours each pixel by its
//! rank in that distribution, mapped onto the visible spectrum.
//!
//! The image is computed in horizontal bands on a fixed pool of worker
//! threads.  Each band writes its own rows of the iteration field and
//! merges its private histogram into the shared one when done; the
//! coordinator waits for the pool to drain before colouring.
//!
//! ```no_run
//! use mandelplot::{RenderConfig, Renderer, PnmSink};
//!
//! let renderer = Renderer::new(RenderConfig::default()).unwrap();
//! renderer.render_to(&mut PnmSink::new("mandelbrot.ppm")).unwrap();
//! ```

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;

pub mod colorize;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod escape;
pub mod field;
pub mod planes;
pub mod pool;
pub mod sink;

pub use colorize::{spectral_color, Colorizer, DEGENERATE_COLOR, IN_SET_COLOR};
pub use config::{PlaneTransform, RenderConfig, MAX_ITERATIONS};
pub use coordinator::{partition, RenderOutput, Renderer};
pub use error::{Error, Result};
pub use escape::escape_iterations;
pub use field::{FieldBuffers, RowBand, UNWRITTEN};
pub use pool::{Completion, WorkerPool};
pub use sink::{MemorySink, PixelSink, PnmSink};
