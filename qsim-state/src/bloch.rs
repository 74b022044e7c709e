//! Per-qubit Bloch vectors
//!
//! A single qubit's reduced state is a 2×2 density matrix ρ, obtained from
//! the register by tracing out every other qubit. Its Bloch vector is
//! `(⟨σx⟩, ⟨σy⟩, ⟨σz⟩)`. A qubit that is not entangled with the rest of the
//! register has a vector of length 1; entanglement shortens it, down to 0 for
//! a maximally entangled qubit.
//!
//! # Example
//! ```
//! use num_complex::Complex64;
//! use qsim_state::BlochVector;
//!
//! let plus = [
//!     Complex64::new(1.0 / 2f64.sqrt(), 0.0),
//!     Complex64::new(1.0 / 2f64.sqrt(), 0.0),
//! ];
//! let bloch = BlochVector::from_pure_state(&plus);
//! assert!((bloch.x - 1.0).abs() < 1e-10);
//! assert!(bloch.is_pure(1e-10));
//! ```

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// A point in or on the Bloch sphere
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlochVector {
    pub x: f64,
    pub y: f64,
    /// +1 is |0⟩, -1 is |1⟩
    pub z: f64,
}

/// Spherical coordinates of a Bloch vector
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlochAngles {
    /// Polar angle θ ∈ [0, π]
    pub theta: f64,
    /// Azimuthal angle φ ∈ [0, 2π)
    pub phi: f64,
}

impl BlochVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Bloch vector of the pure state α|0⟩ + β|1⟩
    pub fn from_pure_state(state: &[Complex64; 2]) -> Self {
        let [alpha, beta] = *state;
        let coherence = alpha.conj() * beta;
        Self {
            x: 2.0 * coherence.re,
            y: 2.0 * coherence.im,
            z: alpha.norm_sqr() - beta.norm_sqr(),
        }
    }

    /// Bloch vector of a 2×2 density matrix in row-major order
    ///
    /// Uses `x = 2·Re ρ₁₀`, `y = 2·Im ρ₁₀`, `z = ρ₀₀ − ρ₁₁`.
    pub fn from_density_matrix(rho: &[Complex64; 4]) -> Self {
        let rho_10 = rho[2];
        Self {
            x: 2.0 * rho_10.re,
            y: 2.0 * rho_10.im,
            z: rho[0].re - rho[3].re,
        }
    }

    /// Length of the vector
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Whether the vector lies on the sphere surface
    pub fn is_pure(&self, tolerance: f64) -> bool {
        (self.magnitude() - 1.0).abs() < tolerance
    }

    /// Spherical coordinates; the zero vector maps to θ = φ = 0
    pub fn to_angles(&self) -> BlochAngles {
        let r = self.magnitude();
        if r < 1e-10 {
            return BlochAngles {
                theta: 0.0,
                phi: 0.0,
            };
        }

        let theta = (self.z / r).clamp(-1.0, 1.0).acos();
        let phi = self.y.atan2(self.x);
        let phi = if phi < 0.0 { phi + 2.0 * PI } else { phi };
        BlochAngles { theta, phi }
    }

    /// Short textual description, naming the six cardinal states
    pub fn describe(&self) -> String {
        let near = |a: f64, b: f64| (a - b).abs() < 0.01;
        let on_equator = near(self.z, 0.0);

        let label = if near(self.z, 1.0) {
            "|0⟩ (north pole)"
        } else if near(self.z, -1.0) {
            "|1⟩ (south pole)"
        } else if on_equator && near(self.x, 1.0) {
            "|+⟩"
        } else if on_equator && near(self.x, -1.0) {
            "|−⟩"
        } else if on_equator && near(self.y, 1.0) {
            "|+i⟩"
        } else if on_equator && near(self.y, -1.0) {
            "|−i⟩"
        } else if self.magnitude() < 0.99 {
            "mixed (entangled with other qubits)"
        } else {
            "pure"
        };

        format!("{} |r|={:.4} {}", self, self.magnitude(), label)
    }
}

impl fmt::Display for BlochVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

impl BlochAngles {
    /// Point on the unit sphere
    pub fn to_vector(&self) -> BlochVector {
        BlochVector {
            x: self.theta.sin() * self.phi.cos(),
            y: self.theta.sin() * self.phi.sin(),
            z: self.theta.cos(),
        }
    }

    /// Amplitudes `[cos(θ/2), e^(iφ) sin(θ/2)]`
    pub fn to_state(&self) -> [Complex64; 2] {
        let half = self.theta / 2.0;
        [
            Complex64::new(half.cos(), 0.0),
            Complex64::from_polar(half.sin(), self.phi),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_state() {
        let bloch = BlochVector::from_pure_state(&[Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]);
        assert_relative_eq!(bloch.z, 1.0, epsilon = 1e-12);
        assert!(bloch.describe().contains("|0⟩"));
    }

    #[test]
    fn test_plus_i_state() {
        let h = 1.0 / 2f64.sqrt();
        let bloch = BlochVector::from_pure_state(&[Complex64::new(h, 0.0), Complex64::new(0.0, h)]);
        assert_relative_eq!(bloch.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(bloch.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_density_matrix_matches_pure_state() {
        let state = [Complex64::new(0.6, 0.0), Complex64::new(0.0, 0.8)];
        let [a, b] = state;
        let rho = [a * a.conj(), a * b.conj(), b * a.conj(), b * b.conj()];

        let from_rho = BlochVector::from_density_matrix(&rho);
        let from_state = BlochVector::from_pure_state(&state);
        assert_relative_eq!(from_rho.x, from_state.x, epsilon = 1e-12);
        assert_relative_eq!(from_rho.y, from_state.y, epsilon = 1e-12);
        assert_relative_eq!(from_rho.z, from_state.z, epsilon = 1e-12);
    }

    #[test]
    fn test_maximally_mixed() {
        let half = Complex64::new(0.5, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        let bloch = BlochVector::from_density_matrix(&[half, zero, zero, half]);
        assert_relative_eq!(bloch.magnitude(), 0.0, epsilon = 1e-12);
        assert_eq!(bloch.to_angles(), BlochAngles { theta: 0.0, phi: 0.0 });
        assert!(bloch.describe().contains("mixed"));
    }

    #[test]
    fn test_angles_roundtrip() {
        let angles = BlochAngles {
            theta: PI / 3.0,
            phi: 5.0 * PI / 4.0,
        };
        let back = BlochVector::from_pure_state(&angles.to_state()).to_angles();
        assert_relative_eq!(back.theta, angles.theta, epsilon = 1e-10);
        assert_relative_eq!(back.phi, angles.phi, epsilon = 1e-10);

        let v = angles.to_vector();
        assert!(v.is_pure(1e-10));
    }
}
