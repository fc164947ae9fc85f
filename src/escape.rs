//! Escape-time evaluation of the Mandelbrot recurrence.

use crate::complex::Complex;

/// Magnitude beyond which an orbit is guaranteed to diverge.
pub const BAILOUT_RADIUS: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Escape {
    /// Iteration at which the orbit left the bailout radius, or the cap if it
    /// never did.
    pub iterations: u32,
    pub escaped: bool,
}

/// Iterates `z ← z² + c` from `z = 0` for at most `max_iterations` steps.
///
/// The escape count is the first `n` with `|zₙ| > 2`. A NaN orbit never
/// compares greater than the radius, so it runs to the cap and is reported as
/// not escaped.
pub fn escape_time(c: Complex, max_iterations: u32) -> Escape {
    let mut z = Complex::ZERO;
    for iteration in 1..=max_iterations {
        z = z * z + c;
        if z.magnitude() > BAILOUT_RADIUS {
            return Escape {
                iterations: iteration,
                escaped: true,
            };
        }
    }
    Escape {
        iterations: max_iterations,
        escaped: false,
    }
}
