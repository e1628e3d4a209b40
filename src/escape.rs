// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The classic escape-time test.

use num::Complex;

/// Counts how many times `z = z * z + c`, starting from zero, can be
/// applied before `z` leaves the circle of radius two.  Points that
/// are still inside after `max_iterations` steps return
/// `max_iterations`; those are considered members of the set.
pub fn escape_iterations(c: Complex<f64>, max_iterations: usize) -> usize {
    let mut z = Complex::new(0.0_f64, 0.0_f64);
    let mut iterations = 0;
    while iterations < max_iterations {
        z = z * z + c;
        if z.norm_sqr() > 4.0 {
            break;
        }
        iterations += 1;
    }
    iterations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_iterations(Complex::new(0.0, 0.0), 5000), 5000);
    }

    #[test]
    fn far_point_escapes_at_once() {
        assert!(escape_iterations(Complex::new(2.0, 2.0), 5000) <= 2);
    }

    #[test]
    fn period_two_bulb_is_inside() {
        assert_eq!(escape_iterations(Complex::new(-1.0, 0.0), 1000), 1000);
    }

    #[test]
    fn count_never_exceeds_cap() {
        for &(re, im) in &[(0.3, 0.5), (-0.75, 0.1), (0.25, 0.0), (-2.0, 0.0)] {
            assert!(escape_iterations(Complex::new(re, im), 50) <= 50);
        }
    }

    #[test]
    fn zero_cap_is_zero() {
        assert_eq!(escape_iterations(Complex::new(0.0, 0.0), 0), 0);
    }
}
