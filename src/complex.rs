use std::ops::{Add, Mul, Neg, Sub};

use bytemuck::{Pod, Zeroable};

use crate::error::{Error, Result};

/// An immutable complex number. Every operation returns a new value.
///
/// Equality is exact; there is no epsilon tolerance.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Complex { re: 0.0, im: 0.0 };

    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn add(self, other: Self) -> Self {
        Self::new(self.re + other.re, self.im + other.im)
    }

    pub fn negate(self) -> Self {
        Self::new(-self.re, -self.im)
    }

    pub fn subtract(self, other: Self) -> Self {
        self.add(other.negate())
    }

    pub fn multiply(self, other: Self) -> Self {
        Self::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re,
        )
    }

    pub fn conjugate(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Square of the magnitude, without the square root.
    pub fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn magnitude(self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// `conjugate / |self|²`. Fails for a zero-magnitude value rather than
    /// producing infinities.
    pub fn reciprocal(self) -> Result<Self> {
        let norm_sqr = self.norm_sqr();
        if norm_sqr == 0.0 {
            return Err(Error::DivisionByZero);
        }
        let conjugate = self.conjugate();
        Ok(Self::new(conjugate.re / norm_sqr, conjugate.im / norm_sqr))
    }

    pub fn divide(self, other: Self) -> Result<Self> {
        Ok(self.multiply(other.reciprocal()?))
    }
}

impl Add for Complex {
    type Output = Complex;

    fn add(self, other: Complex) -> Complex {
        Complex::add(self, other)
    }
}

impl Sub for Complex {
    type Output = Complex;

    fn sub(self, other: Complex) -> Complex {
        self.subtract(other)
    }
}

impl Mul for Complex {
    type Output = Complex;

    fn mul(self, other: Complex) -> Complex {
        self.multiply(other)
    }
}

impl Neg for Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        self.negate()
    }
}
