//! Applying a k-qubit gate to an n-qubit register in place
//!
//! The full `2^n × 2^n` operator is never built. The amplitudes split into
//! `2^(n-k)` groups of `2^k` entries: a group fixes every spectator bit and
//! lets the target bits range over all values. Each group is transformed by
//! the gate matrix independently of the others.
//!
//! Local index convention: for targets `[t0, t1, ..., t(k-1)]`, the local
//! index of basis index `i` is `Σ bit(i, tj) << (k-1-j)`, where `bit(i, q)`
//! is qubit `q`'s value (bit `n-1-q` of `i`, see [`QubitId`]). The first
//! target is the most-significant bit of the gate's row and column index, so
//! a controlled gate takes its control first.
//!
//! # Example
//! ```
//! use num_complex::Complex64;
//! use qsim_gates::matrices::{CNOT, HADAMARD};
//! use qsim_state::expansion::apply_gate;
//!
//! let mut amps = vec![Complex64::new(0.0, 0.0); 4];
//! amps[0] = Complex64::new(1.0, 0.0);
//!
//! apply_gate(&mut amps, 2, &HADAMARD, &[0usize], false).unwrap();
//! apply_gate(&mut amps, 2, &CNOT, &[0usize, 1], false).unwrap();
//!
//! let h = 1.0 / 2f64.sqrt();
//! assert!((amps[0].re - h).abs() < 1e-12);
//! assert!((amps[3].re - h).abs() < 1e-12);
//! ```

use num_complex::Complex64;
use qsim_core::{QuantumError, QubitId, Result};
use rayon::prelude::*;
use smallvec::{smallvec, SmallVec};

/// Largest gate the engine accepts
pub const MAX_GATE_QUBITS: usize = 3;

/// Validated placement of a gate's targets inside a register
///
/// Precomputes, for every local index, the register bits that local index
/// sets, so mapping between group members and basis indices is a single OR.
#[derive(Debug, Clone)]
pub struct TargetLayout {
    num_qubits: usize,
    /// Bit position of each target, in target order
    positions: SmallVec<[usize; MAX_GATE_QUBITS]>,
    /// Positions in ascending order, used to enumerate group bases
    sorted: SmallVec<[usize; MAX_GATE_QUBITS]>,
    target_mask: usize,
    /// `offsets[local]` = register bits set by `local`
    offsets: SmallVec<[usize; 8]>,
}

impl TargetLayout {
    /// Validate `targets` against a register of `num_qubits` qubits
    ///
    /// # Errors
    /// `InvalidQubitCount` if basis indices of `num_qubits` bits don't fit a
    /// `usize`, `QubitOutOfRange` for a target outside `[0, num_qubits)`,
    /// `DuplicateQubit` when a qubit is named twice, and `ArityMismatch` for
    /// an empty target list or more than [`MAX_GATE_QUBITS`] targets.
    pub fn new<Q: Copy + Into<usize>>(num_qubits: usize, targets: &[Q]) -> Result<Self> {
        check_index_width(num_qubits)?;

        let k = targets.len();
        if k == 0 || k > MAX_GATE_QUBITS {
            let expected = if k == 0 { 1 } else { MAX_GATE_QUBITS };
            return Err(QuantumError::arity_mismatch("gate", expected, k));
        }

        let mut resolved: SmallVec<[usize; MAX_GATE_QUBITS]> = SmallVec::new();
        let mut target_mask = 0usize;
        for &t in targets {
            let q: usize = t.into();
            if q >= num_qubits {
                return Err(QuantumError::qubit_out_of_range(q, num_qubits));
            }
            let mask = QubitId::new(q).mask(num_qubits);
            if target_mask & mask != 0 {
                return Err(QuantumError::DuplicateQubit(QubitId::new(q)));
            }
            target_mask |= mask;
            resolved.push(QubitId::new(q).position(num_qubits));
        }

        let mut sorted = resolved.clone();
        sorted.sort_unstable();

        let offsets = (0..1usize << k)
            .map(|local| {
                resolved
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| (local >> (k - 1 - j)) & 1 == 1)
                    .fold(0, |acc, (_, &pos)| acc | (1 << pos))
            })
            .collect();

        Ok(Self {
            num_qubits,
            positions: resolved,
            sorted,
            target_mask,
            offsets,
        })
    }

    /// Number of targets k
    #[inline]
    pub fn arity(&self) -> usize {
        self.positions.len()
    }

    /// Gate matrix dimension `2^k`
    #[inline]
    pub fn dimension(&self) -> usize {
        self.offsets.len()
    }

    /// Number of groups `2^(n-k)`
    #[inline]
    pub fn num_groups(&self) -> usize {
        1 << (self.num_qubits - self.arity())
    }

    /// Register bits occupied by the targets
    #[inline]
    pub fn target_mask(&self) -> usize {
        self.target_mask
    }

    /// Local index of a register basis index
    #[inline]
    pub fn local_index(&self, basis: usize) -> usize {
        let k = self.arity();
        self.positions
            .iter()
            .enumerate()
            .fold(0, |acc, (j, &pos)| acc | (((basis >> pos) & 1) << (k - 1 - j)))
    }

    /// Basis index of group member `local`, given the group's base
    #[inline]
    pub fn scatter(&self, base: usize, local: usize) -> usize {
        base | self.offsets[local]
    }

    /// Base index of group `g`: the bits of `g` spread over the spectator
    /// positions, all target bits clear
    #[inline]
    pub fn group_base(&self, group: usize) -> usize {
        self.sorted.iter().fold(group, |acc, &t| {
            let low = acc & ((1 << t) - 1);
            ((acc >> t) << (t + 1)) | low
        })
    }
}

/// Apply a `2^k × 2^k` row-major matrix to `targets` of the register
///
/// With `parallel` set, groups are processed on the rayon pool from a
/// snapshot of the input amplitudes. Both paths give the same result up to
/// floating-point rounding.
///
/// # Errors
/// Every check happens before the first write, so on error `amplitudes` is
/// unchanged:
/// - `StateLengthMismatch` if `amplitudes.len() != 2^num_qubits`
/// - `ArityMismatch` if the matrix is not `4^k` long for `k = targets.len()`
/// - `QubitOutOfRange` / `DuplicateQubit` for bad targets
pub fn apply_gate<Q: Copy + Into<usize>>(
    amplitudes: &mut [Complex64],
    num_qubits: usize,
    matrix: &[Complex64],
    targets: &[Q],
    parallel: bool,
) -> Result<()> {
    check_register(amplitudes, num_qubits)?;

    let k = targets.len();
    if k > MAX_GATE_QUBITS || matrix.len() != 1 << (2 * k) {
        let matrix_arity = (matrix.len().max(1).trailing_zeros() / 2) as usize;
        return Err(QuantumError::arity_mismatch("matrix", matrix_arity, k));
    }

    let layout = TargetLayout::new(num_qubits, targets)?;
    if parallel {
        apply_parallel(amplitudes, matrix, &layout);
    } else {
        apply_sequential(amplitudes, matrix, &layout);
    }
    Ok(())
}

/// Basis indices of `num_qubits` bits must fit a `usize`
fn check_index_width(num_qubits: usize) -> Result<usize> {
    let max = usize::BITS as usize - 1;
    if num_qubits > max {
        return Err(QuantumError::InvalidQubitCount { num_qubits, max });
    }
    Ok(1 << num_qubits)
}

fn check_register(amplitudes: &[Complex64], num_qubits: usize) -> Result<()> {
    let expected = check_index_width(num_qubits)?;
    if amplitudes.len() != expected {
        return Err(QuantumError::StateLengthMismatch {
            expected,
            actual: amplitudes.len(),
        });
    }
    Ok(())
}

/// Group-by-group sweep with a gathered scratch copy per group
fn apply_sequential(amplitudes: &mut [Complex64], matrix: &[Complex64], layout: &TargetLayout) {
    let d = layout.dimension();
    let mut scratch: SmallVec<[Complex64; 8]> = smallvec![Complex64::new(0.0, 0.0); d];
    let mut indices: SmallVec<[usize; 8]> = smallvec![0; d];

    for group in 0..layout.num_groups() {
        let base = layout.group_base(group);
        for local in 0..d {
            let idx = layout.scatter(base, local);
            indices[local] = idx;
            scratch[local] = amplitudes[idx];
        }
        for (row, &idx) in indices.iter().enumerate() {
            let coeffs = &matrix[row * d..(row + 1) * d];
            amplitudes[idx] = coeffs
                .iter()
                .zip(scratch.iter())
                .map(|(m, a)| m * a)
                .sum();
        }
    }
}

/// Data-parallel sweep: every output amplitude is computed by one task from
/// a read-only snapshot of its group
fn apply_parallel(amplitudes: &mut [Complex64], matrix: &[Complex64], layout: &TargetLayout) {
    let d = layout.dimension();
    let snapshot = amplitudes.to_vec();
    let spectators = !layout.target_mask();

    amplitudes.par_iter_mut().enumerate().for_each(|(i, out)| {
        let base = i & spectators;
        let row = layout.local_index(i);
        let coeffs = &matrix[row * d..(row + 1) * d];
        *out = coeffs
            .iter()
            .enumerate()
            .map(|(col, m)| m * snapshot[layout.scatter(base, col)])
            .sum();
    });
}
