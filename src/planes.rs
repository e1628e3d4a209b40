// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0
//! (the top-left pixel) and the complex plane.  Unlike a corner-based
//! mapping, the complex region is derived from the image itself: the
//! image height always spans a fixed number of plane units, and the
//! plane origin sits at (or near) the image centre.
use num::Complex;

use crate::config::PlaneTransform;
use crate::error::{Error, Result};

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the column, row of a pixel in the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of the integral plane onto the complex plane.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The size of the integral cartesian plane.
    pub integral_plane: IntegralPlane,
    // Pixel coordinates that map onto the complex origin.
    origin: (f64, f64),
    // Complex units per pixel, identical on both axes.
    scale: f64,
}

impl PlaneMapper {
    /// Builds a mapping for a `width` by `height` image under the
    /// given transform.
    pub fn new(width: usize, height: usize, transform: PlaneTransform) -> Result<PlaneMapper> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidPlane(format!(
                "the integral plane {}x{} has no pixels",
                width, height
            )));
        }

        if !(transform.units_per_height > 0.0) {
            return Err(Error::InvalidPlane(
                "the image height must span a positive distance".to_string(),
            ));
        }

        // Integer halves, so odd sizes land on the same pixel centre as
        // the reference renderer.
        let origin = (
            (width / 2) as f64 + transform.shift.0,
            (height / 2) as f64 + transform.shift.1,
        );

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            origin,
            scale: transform.units_per_height / (height as f64),
        })
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// complex number it stands for.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            ((pixel.0 as f64) - self.origin.0) * self.scale,
            ((pixel.1 as f64) - self.origin.1) * self.scale,
        )
    }

    /// Linear, row-major offset of a pixel from the root of the image
    /// buffer.
    pub fn offset(&self, pixel: &Pixel) -> usize {
        pixel.1 * self.integral_plane.0 + pixel.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centred() -> PlaneTransform {
        PlaneTransform {
            units_per_height: 2.0,
            shift: (0.0, 0.0),
        }
    }

    #[test]
    fn planemapper_fails_on_empty_plane() {
        assert!(PlaneMapper::new(0, 4, centred()).is_err());
        assert!(PlaneMapper::new(4, 0, centred()).is_err());
    }

    #[test]
    fn planemapper_fails_on_bad_scale() {
        let transform = PlaneTransform {
            units_per_height: 0.0,
            shift: (0.0, 0.0),
        };
        assert!(PlaneMapper::new(4, 4, transform).is_err());
    }

    #[test]
    fn image_centre_maps_to_origin() {
        let pm = PlaneMapper::new(4, 4, centred()).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-1.0, -1.0));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 0)), Complex::new(0.5, -1.0));
    }

    #[test]
    fn reference_view_is_shifted_left() {
        let pm = PlaneMapper::new(1200, 900, PlaneTransform::default()).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(800, 450)), Complex::new(0.0, 0.0));
        let left = pm.pixel_to_point(&Pixel(0, 450));
        assert!((left.re - (-800.0 * 2.0 / 900.0)).abs() < 1e-12);
        let top = pm.pixel_to_point(&Pixel(800, 0));
        assert!((top.im + 1.0).abs() < 1e-12);
    }

    #[test]
    fn offsets_are_row_major() {
        let pm = PlaneMapper::new(5, 3, centred()).unwrap();
        assert_eq!(pm.len(), 15);
        assert!(!pm.is_empty());
        assert_eq!(pm.offset(&Pixel(0, 0)), 0);
        assert_eq!(pm.offset(&Pixel(4, 0)), 4);
        assert_eq!(pm.offset(&Pixel(0, 1)), 5);
        assert_eq!(pm.offset(&Pixel(4, 2)), 14);
    }
}
