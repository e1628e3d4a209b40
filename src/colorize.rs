// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Histogram colouring.
//!
//! Raw escape counts make poor colours: most of the image escapes in
//! a handful of iterations and the interesting boundary gets squeezed
//! into a sliver of the palette.  Instead each pixel is coloured by
//! its rank in the cumulative distribution of escape counts.  That
//! rank, a number in [0, 1], is pushed through an exponential curve
//! onto the visible spectrum (401nm to 700nm) and converted to RGB.

use crate::error::Result;
use crate::field::try_alloc;

/// Colour of points that never escaped.
pub const IN_SET_COLOR: [u8; 3] = [0, 0, 0];

/// Colour used when the spectrum yields no light at all, which
/// happens at the very end of the scale (700nm).
pub const DEGENERATE_COLOR: [u8; 3] = [0, 0, 0];

/// Converts a wavelength to an RGB triple.
pub type SpectralFn = fn(f64) -> [f64; 3];

/// Approximates the colour of monochromatic light of wavelength
/// `l` nanometres.  Each channel is in [0, 1]; outside of
/// [400, 700) every channel is zero.
pub fn spectral_color(l: f64) -> [f64; 3] {
    let (mut r, mut g, mut b) = (0.0, 0.0, 0.0);

    if l >= 400.0 && l < 410.0 {
        let t = (l - 400.0) / (410.0 - 400.0);
        r = (0.33 * t) - (0.20 * t * t);
    } else if l >= 410.0 && l < 475.0 {
        let t = (l - 410.0) / (475.0 - 410.0);
        r = 0.14 - (0.13 * t * t);
    } else if l >= 545.0 && l < 595.0 {
        let t = (l - 545.0) / (595.0 - 545.0);
        r = (1.98 * t) - (t * t);
    } else if l >= 595.0 && l < 650.0 {
        let t = (l - 595.0) / (650.0 - 595.0);
        r = 0.98 + (0.06 * t) - (0.40 * t * t);
    } else if l >= 650.0 && l < 700.0 {
        let t = (l - 650.0) / (700.0 - 650.0);
        r = 0.65 - (0.84 * t) + (0.20 * t * t);
    }

    if l >= 415.0 && l < 475.0 {
        let t = (l - 415.0) / (475.0 - 415.0);
        g = 0.80 * t * t;
    } else if l >= 475.0 && l < 590.0 {
        let t = (l - 475.0) / (590.0 - 475.0);
        g = 0.8 + (0.76 * t) - (0.80 * t * t);
    } else if l >= 585.0 && l < 639.0 {
        let t = (l - 585.0) / (639.0 - 585.0);
        g = 0.84 - (0.84 * t);
    }

    if l >= 400.0 && l < 475.0 {
        let t = (l - 400.0) / (475.0 - 400.0);
        b = (2.20 * t) - (1.50 * t * t);
    } else if l >= 475.0 && l < 560.0 {
        let t = (l - 475.0) / (560.0 - 475.0);
        b = 0.7 - t + (0.30 * t * t);
    }

    [r, g, b]
}

/// Maps a cumulative hue in [0, 1] to a wavelength in [401, 700].
pub fn wavelength(hue: f64) -> f64 {
    300.0_f64.powf(hue) + 400.0
}

/// Normalises a spectral triple so the channels sum to 255.
pub fn normalize(rgb: [f64; 3]) -> [u8; 3] {
    let sum = rgb[0] + rgb[1] + rgb[2];
    if !(sum > 0.0) {
        return DEGENERATE_COLOR;
    }
    // `as` truncates and saturates, matching an 8-bit store.
    [
        (255.0 * rgb[0] / sum) as u8,
        (255.0 * rgb[1] / sum) as u8,
        (255.0 * rgb[2] / sum) as u8,
    ]
}

/// The serial colouring pass.
pub struct Colorizer {
    max_iterations: usize,
    spectral: SpectralFn,
}

impl Colorizer {
    /// A colourizer using [`spectral_color`].
    pub fn new(max_iterations: usize) -> Colorizer {
        Colorizer::with_spectrum(max_iterations, spectral_color)
    }

    /// A colourizer with a different wavelength conversion.
    pub fn with_spectrum(max_iterations: usize, spectral: SpectralFn) -> Colorizer {
        Colorizer {
            max_iterations,
            spectral,
        }
    }

    /// Colours every cell of `field`, returning `field.len() * 3`
    /// bytes.  Cells at or above the cutoff, including cells no job
    /// wrote, get [`IN_SET_COLOR`].
    pub fn colorize(&self, field: &[usize], histogram: &[usize]) -> Result<Vec<u8>> {
        let total: usize = histogram.iter().sum();

        // cumulative[n] is the share of escaped pixels that escaped
        // within n iterations.
        let mut running = 0;
        let cumulative: Vec<f64> = histogram
            .iter()
            .map(|&count| {
                running += count;
                if total == 0 {
                    0.0
                } else {
                    running as f64 / total as f64
                }
            })
            .collect();

        let mut rgb = try_alloc("rgb image", field.len() * 3, || 0u8)?;
        for (pixel, &iterations) in rgb.chunks_exact_mut(3).zip(field) {
            let color = if iterations >= self.max_iterations || iterations >= cumulative.len() {
                IN_SET_COLOR
            } else {
                normalize((self.spectral)(wavelength(cumulative[iterations])))
            };
            pixel.copy_from_slice(&color);
        }
        Ok(rgb)
    }
}
