// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error type shared by every stage of a render.

use thiserror::Error;

/// Everything that can stop a render from producing an image.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is out of its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The pixel plane cannot be mapped onto the complex plane.
    #[error("invalid plane: {0}")]
    InvalidPlane(String),

    /// One of the per-batch buffers could not be allocated.
    #[error("could not allocate {len} cells for the {what}")]
    Allocation {
        /// Which buffer failed.
        what: &'static str,
        /// How many cells were requested.
        len: usize,
    },

    /// One or more jobs in a batch did not finish.
    #[error("{failed} job(s) failed; first: {first}")]
    JobFailed {
        /// Number of jobs that panicked or were dropped unfinished.
        failed: usize,
        /// Description of the first failure.
        first: String,
    },

    /// Writing the image failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the image failed.
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Shorthand used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
