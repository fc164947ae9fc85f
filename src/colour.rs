//! Colouring algorithms.

use std::f64::consts::PI;
use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::escape::Escape;

/// Iteration counts per full cycle of the palette.
pub const PALETTE_PERIOD: u32 = 256;

/// An opaque 8-bit RGB colour.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const BLACK: Self = Colour { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(intensity: u8) -> Self {
        Self::new(intensity, intensity, intensity)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Periodic grayscale palette: `floor(256 · sin²((n − 1)/256 · π))`.
///
/// The curve touches 256 when `n − 1` is an odd multiple of 128, which
/// saturates to 255.
pub fn palette(iteration_count: u32) -> Colour {
    let intensity = palette_intensity(iteration_count).min(255.0);
    Colour::gray(intensity as u8)
}

/// The palette curve before saturation, in `0.0..=256.0`.
fn palette_intensity(iteration_count: u32) -> f64 {
    let phase = (f64::from(iteration_count) - 1.0) / f64::from(PALETTE_PERIOD) * PI;
    (256.0 * phase.sin().powi(2)).floor()
}

/// Colour for an escape-time result. Points that never escaped are black.
pub fn shade(escape: Escape) -> Colour {
    if escape.escaped {
        palette(escape.iterations)
    } else {
        Colour::BLACK
    }
}
