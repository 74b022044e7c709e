//! Complex scalar arithmetic
//!
//! Amplitudes are plain `num_complex::Complex64` values. This module adds the
//! small set of operations the simulator relies on, named after what they do
//! to an amplitude, plus tolerance-based comparison and the `[re, im]` pair
//! form used by circuit documents.
//!
//! # Example
//! ```
//! use qsim_core::complex::{self, ComplexScalar, Complex64};
//!
//! let a = Complex64::new(0.6, 0.0);
//! let b = Complex64::new(0.0, 0.8);
//! let sum = complex::add(a, b);
//! assert!((sum.magnitude() - 1.0).abs() < 1e-12);
//! assert!((sum.magnitude_squared() - 1.0).abs() < 1e-12);
//! ```

pub use num_complex::Complex64;

/// Additive identity
pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Multiplicative identity
pub const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Imaginary unit
pub const I: Complex64 = Complex64::new(0.0, 1.0);

/// Components smaller than this are omitted by [`format_amplitude`]
const DISPLAY_EPSILON: f64 = 1e-10;

/// Sum of two complex scalars
#[inline]
pub fn add(a: Complex64, b: Complex64) -> Complex64 {
    a + b
}

/// Product of two complex scalars
#[inline]
pub fn multiply(a: Complex64, b: Complex64) -> Complex64 {
    a * b
}

/// Complex conjugate `re - i·im`
#[inline]
pub fn conjugate(a: Complex64) -> Complex64 {
    a.conj()
}

/// Magnitude `sqrt(re² + im²)`
#[inline]
pub fn magnitude(a: Complex64) -> f64 {
    a.norm()
}

/// Squared magnitude `re² + im²`
///
/// Use this for probabilities: it skips the square root and its rounding.
#[inline]
pub fn magnitude_squared(a: Complex64) -> f64 {
    a.norm_sqr()
}

/// Check that two scalars agree component-wise within `epsilon`
#[inline]
pub fn approx_eq(a: Complex64, b: Complex64, epsilon: f64) -> bool {
    (a.re - b.re).abs() <= epsilon && (a.im - b.im).abs() <= epsilon
}

/// Build a scalar from a `[re, im]` pair
#[inline]
pub fn from_pair(pair: [f64; 2]) -> Complex64 {
    Complex64::new(pair[0], pair[1])
}

/// Split a scalar into a `[re, im]` pair
#[inline]
pub fn to_pair(a: Complex64) -> [f64; 2] {
    [a.re, a.im]
}

/// Render an amplitude with three decimals, dropping negligible components
///
/// ```
/// use qsim_core::complex::{format_amplitude, Complex64};
///
/// assert_eq!(format_amplitude(Complex64::new(0.5, 0.0)), "0.500");
/// assert_eq!(format_amplitude(Complex64::new(0.0, -1.0)), "-1.000i");
/// assert_eq!(format_amplitude(Complex64::new(0.5, 0.25)), "0.500 + 0.250i");
/// ```
pub fn format_amplitude(a: Complex64) -> String {
    if a.im.abs() < DISPLAY_EPSILON {
        return format!("{:.3}", a.re);
    }
    if a.re.abs() < DISPLAY_EPSILON {
        return format!("{:.3}i", a.im);
    }
    if a.im < 0.0 {
        format!("{:.3} - {:.3}i", a.re, -a.im)
    } else {
        format!("{:.3} + {:.3}i", a.re, a.im)
    }
}

/// Method-style access to the scalar operations
pub trait ComplexScalar: Copy {
    /// See [`magnitude`]
    fn magnitude(self) -> f64;

    /// See [`magnitude_squared`]
    fn magnitude_squared(self) -> f64;

    /// See [`conjugate`]
    fn conjugate(self) -> Self;

    /// See [`approx_eq`]
    fn approx_eq(self, other: Self, epsilon: f64) -> bool;
}

impl ComplexScalar for Complex64 {
    #[inline]
    fn magnitude(self) -> f64 {
        magnitude(self)
    }

    #[inline]
    fn magnitude_squared(self) -> f64 {
        magnitude_squared(self)
    }

    #[inline]
    fn conjugate(self) -> Self {
        conjugate(self)
    }

    #[inline]
    fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        approx_eq(self, other, epsilon)
    }
}
