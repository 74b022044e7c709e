//! Gate matrices as compile-time constants
//!
//! Every matrix is stored flattened in row-major order: element `(r, c)` of a
//! `d × d` matrix lives at index `r * d + c`. Rows and columns are indexed by
//! the gate's local basis index, whose most-significant bit belongs to the
//! first target qubit.

use num_complex::Complex64;

// Compile-time constant helpers
const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

/// 1/√2
pub const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

// Single-qubit gates (2x2)

/// Identity
/// I = [[1, 0],
///      [0, 1]]
pub const IDENTITY: [Complex64; 4] = [ONE, ZERO, ZERO, ONE];

/// Pauli-X (NOT)
/// X = [[0, 1],
///      [1, 0]]
pub const PAULI_X: [Complex64; 4] = [ZERO, ONE, ONE, ZERO];

/// Pauli-Y
/// Y = [[0, -i],
///      [i,  0]]
pub const PAULI_Y: [Complex64; 4] = [ZERO, NEG_I, I, ZERO];

/// Pauli-Z
/// Z = [[1,  0],
///      [0, -1]]
pub const PAULI_Z: [Complex64; 4] = [ONE, ZERO, ZERO, NEG_ONE];

/// Hadamard
/// H = 1/√2 * [[1,  1],
///             [1, -1]]
pub const HADAMARD: [Complex64; 4] = [
    Complex64::new(INV_SQRT2, 0.0),
    Complex64::new(INV_SQRT2, 0.0),
    Complex64::new(INV_SQRT2, 0.0),
    Complex64::new(-INV_SQRT2, 0.0),
];

/// S (phase, √Z)
/// S = [[1, 0],
///      [0, i]]
pub const S_GATE: [Complex64; 4] = [ONE, ZERO, ZERO, I];

/// T (π/8, √S)
/// T = [[1, 0],
///      [0, e^(iπ/4)]]
pub const T_GATE: [Complex64; 4] = [
    ONE,
    ZERO,
    ZERO,
    Complex64::new(INV_SQRT2, INV_SQRT2), // e^(iπ/4) = (1+i)/√2
];

// Two-qubit gates (4x4)

/// Controlled-NOT, control on the first target
/// CNOT = [[1, 0, 0, 0],
///         [0, 1, 0, 0],
///         [0, 0, 0, 1],
///         [0, 0, 1, 0]]
#[rustfmt::skip]
pub const CNOT: [Complex64; 16] = [
    ONE, ZERO, ZERO, ZERO,
    ZERO, ONE, ZERO, ZERO,
    ZERO, ZERO, ZERO, ONE,
    ZERO, ZERO, ONE, ZERO,
];

/// Controlled-Z
/// CZ = diag(1, 1, 1, -1)
#[rustfmt::skip]
pub const CZ: [Complex64; 16] = [
    ONE, ZERO, ZERO, ZERO,
    ZERO, ONE, ZERO, ZERO,
    ZERO, ZERO, ONE, ZERO,
    ZERO, ZERO, ZERO, NEG_ONE,
];

/// SWAP
/// SWAP = [[1, 0, 0, 0],
///         [0, 0, 1, 0],
///         [0, 1, 0, 0],
///         [0, 0, 0, 1]]
#[rustfmt::skip]
pub const SWAP: [Complex64; 16] = [
    ONE, ZERO, ZERO, ZERO,
    ZERO, ZERO, ONE, ZERO,
    ZERO, ONE, ZERO, ZERO,
    ZERO, ZERO, ZERO, ONE,
];

// Three-qubit gates (8x8)

/// Toffoli (CCNOT): identity except that |110⟩ and |111⟩ are exchanged
pub const CCNOT: [Complex64; 64] = toffoli();

const fn toffoli() -> [Complex64; 64] {
    let mut m = [ZERO; 64];
    let mut row = 0;
    while row < 8 {
        // both controls set: flip the target (last local bit)
        let col = if row >= 6 { row ^ 1 } else { row };
        m[row * 8 + col] = ONE;
        row += 1;
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toffoli_layout() {
        for row in 0..8 {
            for col in 0..8 {
                let expected = match row {
                    6 => col == 7,
                    7 => col == 6,
                    _ => row == col,
                };
                let value = CCNOT[row * 8 + col];
                assert_eq!(value, if expected { ONE } else { ZERO }, "({row}, {col})");
            }
        }
    }

    #[test]
    fn test_two_qubit_layouts() {
        let permutation = |m: &[Complex64; 16]| -> Vec<usize> {
            (0..4)
                .map(|row| (0..4).position(|col| m[row * 4 + col] != ZERO).unwrap_or(4))
                .collect()
        };
        assert_eq!(permutation(&CNOT), vec![0, 1, 3, 2]);
        assert_eq!(permutation(&SWAP), vec![0, 2, 1, 3]);
        assert_eq!(permutation(&CZ), vec![0, 1, 2, 3]);
        assert_eq!(CZ[15], NEG_ONE);
    }

    #[test]
    fn test_t_phase() {
        let phase = Complex64::from_polar(1.0, std::f64::consts::FRAC_PI_4);
        assert!((T_GATE[3] - phase).norm() < 1e-15);
    }
}
