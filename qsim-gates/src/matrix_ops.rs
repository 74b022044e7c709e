//! Operations on flattened square matrices
//!
//! Gate matrices are stored row-major as `&[Complex64]` of length `d²`. These
//! helpers verify the algebraic laws of the catalog and build the dense
//! full-register operator of a gate, which is only practical for a handful of
//! qubits and serves as the reference the in-place expansion is checked
//! against.
//!
//! # Example
//! ```
//! use qsim_gates::matrices::{HADAMARD, IDENTITY};
//! use qsim_gates::matrix_ops::{approx_equal, is_unitary, matrix_multiply};
//!
//! let hh = matrix_multiply(&HADAMARD, &HADAMARD);
//! assert!(approx_equal(&hh, &IDENTITY, 1e-12));
//! assert!(is_unitary(&HADAMARD, 1e-9));
//! ```

use num_complex::Complex64;

/// Side length `d` of a flattened `d × d` matrix, if the length is a square
pub fn dimension(matrix: &[Complex64]) -> Option<usize> {
    let d = (matrix.len() as f64).sqrt().round() as usize;
    (d * d == matrix.len()).then_some(d)
}

fn square_dimension(matrix: &[Complex64]) -> usize {
    match dimension(matrix) {
        Some(d) => d,
        None => panic!("Matrix of length {} is not square", matrix.len()),
    }
}

/// `d × d` identity
pub fn identity_matrix(d: usize) -> Vec<Complex64> {
    let mut m = vec![Complex64::new(0.0, 0.0); d * d];
    for i in 0..d {
        m[i * d + i] = Complex64::new(1.0, 0.0);
    }
    m
}

/// Product `A · B`
///
/// # Panics
/// Panics if the operands are not square matrices of the same size.
pub fn matrix_multiply(a: &[Complex64], b: &[Complex64]) -> Vec<Complex64> {
    let d = square_dimension(a);
    assert_eq!(a.len(), b.len(), "Matrix dimensions differ");

    let mut out = vec![Complex64::new(0.0, 0.0); d * d];
    for i in 0..d {
        for k in 0..d {
            let a_ik = a[i * d + k];
            for j in 0..d {
                out[i * d + j] += a_ik * b[k * d + j];
            }
        }
    }
    out
}

/// Conjugate transpose `A†`
pub fn matrix_adjoint(matrix: &[Complex64]) -> Vec<Complex64> {
    let d = square_dimension(matrix);
    let mut out = vec![Complex64::new(0.0, 0.0); d * d];
    for i in 0..d {
        for j in 0..d {
            out[i * d + j] = matrix[j * d + i].conj();
        }
    }
    out
}

/// `A^k` by repeated multiplication; `A^0` is the identity
pub fn matrix_power(matrix: &[Complex64], k: u32) -> Vec<Complex64> {
    let d = square_dimension(matrix);
    (0..k).fold(identity_matrix(d), |acc, _| matrix_multiply(&acc, matrix))
}

/// Element-wise comparison within `tolerance` (complex distance)
pub fn approx_equal(a: &[Complex64], b: &[Complex64], tolerance: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).norm() <= tolerance)
}

/// Whether the matrix is the identity within `tolerance`
pub fn is_identity(matrix: &[Complex64], tolerance: f64) -> bool {
    match dimension(matrix) {
        Some(d) => approx_equal(matrix, &identity_matrix(d), tolerance),
        None => false,
    }
}

/// Whether `U†U = I` within `tolerance`
pub fn is_unitary(matrix: &[Complex64], tolerance: f64) -> bool {
    if dimension(matrix).is_none() {
        return false;
    }
    is_identity(&matrix_multiply(&matrix_adjoint(matrix), matrix), tolerance)
}

/// Whether `A = A†` within `tolerance`
pub fn is_hermitian(matrix: &[Complex64], tolerance: f64) -> bool {
    dimension(matrix).is_some() && approx_equal(matrix, &matrix_adjoint(matrix), tolerance)
}

/// Dense `2^n × 2^n` operator of a gate acting on `targets`
///
/// Uses the same local-index convention as the state-vector expansion: the
/// first target is the most-significant bit of the gate's row and column
/// index, and qubit `q` is bit `n - 1 - q` of a register basis index.
///
/// # Panics
/// Panics if the number of targets does not match the gate size.
pub fn embed_gate(gate: &[Complex64], num_qubits: usize, targets: &[usize]) -> Vec<Complex64> {
    let k = targets.len();
    let gate_dim = square_dimension(gate);
    assert_eq!(gate_dim, 1 << k, "Gate size does not match {} targets", k);

    let position = |q: usize| num_qubits - 1 - q;
    let local = |basis: usize| {
        targets
            .iter()
            .enumerate()
            .fold(0, |acc, (j, &q)| acc | (((basis >> position(q)) & 1) << (k - 1 - j)))
    };
    let target_mask: usize = targets.iter().map(|&q| 1 << position(q)).sum();

    let size = 1 << num_qubits;
    let mut full = vec![Complex64::new(0.0, 0.0); size * size];
    for row in 0..size {
        for col in 0..size {
            // spectator bits must agree
            if (row & !target_mask) == (col & !target_mask) {
                full[row * size + col] = gate[local(row) * gate_dim + local(col)];
            }
        }
    }
    full
}

/// Dense matrix-vector product `M · v`
pub fn apply_dense(matrix: &[Complex64], vector: &[Complex64]) -> Vec<Complex64> {
    let d = vector.len();
    (0..d)
        .map(|row| (0..d).map(|col| matrix[row * d + col] * vector[col]).sum())
        .collect()
}
