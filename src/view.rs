//! View parameters and the mapping from canvas pixels to the complex plane.

use crate::complex::Complex;
use crate::error::{Error, Result};
use crate::screen;

/// Width of the complex plane visible at zoom level 0.
pub const BASE_SPAN: f64 = 4.0;

/// Everything that determines the output of one render cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewParameters {
    pub zoom_level: u32,
    pub center: Complex,
    pub max_iterations: u32,
}

impl Default for ViewParameters {
    fn default() -> Self {
        Self {
            zoom_level: 0,
            center: Complex::new(-0.5, 0.0),
            max_iterations: 256,
        }
    }
}

impl ViewParameters {
    /// `2^zoom`. Saturates to infinity for absurd zoom levels.
    pub fn magnification(&self) -> f64 {
        2f64.powi(i32::try_from(self.zoom_level).unwrap_or(i32::MAX))
    }

    /// Width of the visible region of the complex plane, `4 / 2^zoom`.
    pub fn span(&self) -> f64 {
        BASE_SPAN / self.magnification()
    }

    /// Rejects centers that are not finite. The renderer itself accepts them
    /// and paints a black canvas.
    pub fn validate(&self) -> Result<()> {
        if !self.center.re.is_finite() || !self.center.im.is_finite() {
            return Err(Error::InvalidParameters(format!(
                "center {} + {}i is not finite",
                self.center.re, self.center.im
            )));
        }
        Ok(())
    }

    /// Maps pixel `(x, y)` of a canvas to a point on the complex plane.
    ///
    /// Both axes are scaled by the canvas width so pixels stay square; the
    /// vertical extent of a non-square canvas is `span · height / width`.
    pub fn pixel_to_point(&self, x: u32, y: u32, size: screen::Size) -> Complex {
        let width = f64::from(size.width);
        let height = f64::from(size.height);
        let scale = width * self.magnification();
        Complex::new(
            BASE_SPAN * (f64::from(x) - width / 2.0) / scale + self.center.re,
            -BASE_SPAN * (f64::from(y) - height / 2.0) / scale + self.center.im,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(zoom_level: u32, center: Complex) -> ViewParameters {
        ViewParameters {
            zoom_level,
            center,
            max_iterations: 50,
        }
    }

    #[test]
    fn canvas_center_maps_to_view_center() {
        let view = view(0, Complex::new(-0.5, 0.0));
        assert_eq!(
            view.pixel_to_point(2, 2, screen::Size::new(4, 4)),
            Complex::new(-0.5, 0.0)
        );
        assert_eq!(
            view.pixel_to_point(400, 300, screen::Size::new(800, 600)),
            Complex::new(-0.5, 0.0)
        );
    }

    #[test]
    fn top_left_pixel_at_zoom_zero() {
        let view = view(0, Complex::new(-0.5, 0.0));
        assert_eq!(
            view.pixel_to_point(0, 0, screen::Size::new(4, 4)),
            Complex::new(-2.5, 2.0)
        );
    }

    #[test]
    fn imaginary_axis_points_up() {
        let view = view(0, Complex::ZERO);
        let size = screen::Size::new(8, 8);
        assert!(view.pixel_to_point(4, 0, size).im > 0.0);
        assert!(view.pixel_to_point(4, 7, size).im < 0.0);
    }

    #[test]
    fn each_zoom_level_halves_the_span() {
        let size = screen::Size::new(100, 100);
        for zoom_level in 0..10 {
            let view = view(zoom_level, Complex::ZERO);
            let left = view.pixel_to_point(0, 50, size);
            assert_eq!(left.re, -view.span() / 2.0);
            assert_eq!(view.span(), 4.0 / f64::from(1u32 << zoom_level));
        }
    }

    #[test]
    fn vertical_scale_follows_width() {
        let view = view(0, Complex::ZERO);
        let size = screen::Size::new(200, 100);
        let step_x = view.pixel_to_point(101, 50, size).re - view.pixel_to_point(100, 50, size).re;
        let step_y = view.pixel_to_point(100, 50, size).im - view.pixel_to_point(100, 51, size).im;
        assert_eq!(step_x, step_y);
        assert_eq!(view.pixel_to_point(100, 0, size).im, 1.0);
    }

    #[test]
    fn non_finite_centers_are_rejected() {
        assert!(view(0, Complex::ZERO).validate().is_ok());
        assert!(matches!(
            view(0, Complex::new(f64::NAN, 0.0)).validate(),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            view(3, Complex::new(0.0, f64::INFINITY)).validate(),
            Err(Error::InvalidParameters(_))
        ));
    }
}
