//! Scalar fields the MNA system can be solved over.

use std::fmt::Debug;
use std::ops::{AddAssign, Neg, SubAssign};

use num_complex::Complex64;
use num_traits::NumOps;

/// Field arithmetic needed to assemble and LU-solve an MNA system.
///
/// Implemented for `f64` (DC) and `Complex64` (AC phasors).
pub trait Scalar:
    Copy
    + Debug
    + PartialEq
    + NumOps
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + num_traits::Zero
    + num_traits::One
    + Send
    + Sync
    + 'static
{
    /// Embed a real number.
    fn from_real(re: f64) -> Self;

    /// Build a value from magnitude and phase (radians).
    ///
    /// For `f64` this is the real part `magnitude·cos(phase)`.
    fn from_polar(magnitude: f64, phase: f64) -> Self;

    /// Absolute value, used for pivot selection.
    fn modulus(self) -> f64;

    /// Phase angle in radians (0 or π for reals).
    fn arg(self) -> f64;

    /// Whether every component is finite.
    fn is_finite(self) -> bool;
}

impl Scalar for f64 {
    fn from_real(re: f64) -> Self {
        re
    }

    fn from_polar(magnitude: f64, phase: f64) -> Self {
        magnitude * phase.cos()
    }

    fn modulus(self) -> f64 {
        self.abs()
    }

    fn arg(self) -> f64 {
        if self < 0.0 {
            std::f64::consts::PI
        } else {
            0.0
        }
    }

    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl Scalar for Complex64 {
    fn from_real(re: f64) -> Self {
        Complex64::new(re, 0.0)
    }

    fn from_polar(magnitude: f64, phase: f64) -> Self {
        Complex64::from_polar(magnitude, phase)
    }

    fn modulus(self) -> f64 {
        self.norm()
    }

    fn arg(self) -> f64 {
        Complex64::arg(self)
    }

    fn is_finite(self) -> bool {
        Complex64::is_finite(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_real_field() {
        assert_abs_diff_eq!(<f64 as Scalar>::from_polar(2.0, std::f64::consts::PI), -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Scalar::modulus(-3.0f64), 3.0);
        assert_abs_diff_eq!(Scalar::arg(-3.0f64), std::f64::consts::PI);
        assert!(!Scalar::is_finite(f64::NAN));
    }

    #[test]
    fn test_complex_field() {
        let z = <Complex64 as Scalar>::from_polar(15.0, 45f64.to_radians());
        assert_abs_diff_eq!(z.re, 15.0 * 45f64.to_radians().cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(Scalar::modulus(z), 15.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Scalar::arg(z).to_degrees(), 45.0, epsilon = 1e-12);
        assert!(Scalar::is_finite(z));
    }
}
