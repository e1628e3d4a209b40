// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render parameters.  The defaults reproduce the reference image: a
//! 1200x900 view, sixteen workers chewing through ninety row
//! segments, and 5000 iterations before a point is declared inside.

use crate::error::{Error, Result};

/// Default escape cutoff.
pub const MAX_ITERATIONS: usize = 5000;

/// Describes how the pixel grid sits on the complex plane.  The
/// vertical extent of the image always spans `units_per_height` plane
/// units; `shift` moves the plane origin away from the image centre,
/// in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneTransform {
    /// Complex-plane units covered by the full image height.
    pub units_per_height: f64,
    /// Pixel offset of the plane origin from the image centre, (x, y).
    pub shift: (f64, f64),
}

impl Default for PlaneTransform {
    fn default() -> Self {
        PlaneTransform {
            units_per_height: 2.0,
            shift: (200.0, 0.0),
        }
    }
}

/// Everything a render needs to know.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Number of long-lived threads in the worker pool.
    pub worker_count: usize,
    /// Number of row ranges the image is cut into; the granularity
    /// of parallel work.
    pub segment_count: usize,
    /// Escape cutoff.  Points reaching it are considered inside the set.
    pub max_iterations: usize,
    /// Pixel-to-plane mapping.
    pub transform: PlaneTransform,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 1200,
            height: 900,
            worker_count: 16,
            segment_count: 90,
            max_iterations: MAX_ITERATIONS,
            transform: PlaneTransform::default(),
        }
    }
}

impl RenderConfig {
    /// Rejects values no render can be built from.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("worker_count", self.worker_count),
            ("segment_count", self.segment_count),
            ("max_iterations", self.max_iterations),
        ];
        for (name, value) in positive.iter() {
            if *value == 0 {
                return Err(Error::InvalidConfig(format!("{} must be at least 1", name)));
            }
        }

        let scale = self.transform.units_per_height;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "units_per_height must be a positive number, got {}",
                scale
            )));
        }
        if !self.transform.shift.0.is_finite() || !self.transform.shift.1.is_finite() {
            return Err(Error::InvalidConfig("shift must be finite".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_render() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height), (1200, 900));
        assert_eq!(config.worker_count, 16);
        assert_eq!(config.segment_count, 90);
        assert_eq!(config.max_iterations, 5000);
        assert_eq!(config.transform.units_per_height, 2.0);
        assert_eq!(config.transform.shift, (200.0, 0.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let mut config = RenderConfig::default();
        config.segment_count = 0;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.worker_count = 0;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_scale_is_rejected() {
        let mut config = RenderConfig::default();
        config.transform.units_per_height = -1.0;
        assert!(config.validate().is_err());
        config.transform.units_per_height = std::f64::NAN;
        assert!(config.validate().is_err());
    }
}
