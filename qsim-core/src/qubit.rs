//! Qubit addressing and the basis-index bit convention
//!
//! In an n-qubit register, qubit `q` is bit `n - 1 - q` of a
//! computational-basis index: qubit 0 is the most-significant bit, so the
//! ket `|b0 b1 ... b(n-1)⟩` reads left to right in qubit order and its binary
//! value is the basis index. Every component of QSim reads and writes basis
//! indices through this convention.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a qubit inside a register
///
/// # Example
/// ```
/// use qsim_core::QubitId;
///
/// let q0 = QubitId::new(0);
/// // in a 2-qubit register, |10⟩ (index 0b10) has qubit 0 set
/// assert_eq!(q0.bit_of(0b10, 2), 1);
/// assert_eq!(q0.bit_of(0b01, 2), 0);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitId(usize);

impl QubitId {
    /// Create a new qubit identifier
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Position of the qubit in the register
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Bit position of this qubit in a basis index of a `num_qubits`-qubit
    /// register
    ///
    /// The qubit must lie inside the register (see [`is_within`](Self::is_within)).
    #[inline]
    pub const fn position(&self, num_qubits: usize) -> usize {
        num_qubits - 1 - self.0
    }

    /// Single-bit mask selecting this qubit in a basis index
    #[inline]
    pub const fn mask(&self, num_qubits: usize) -> usize {
        1 << self.position(num_qubits)
    }

    /// Value (0 or 1) of this qubit in the given basis index
    #[inline]
    pub const fn bit_of(&self, basis_index: usize, num_qubits: usize) -> usize {
        (basis_index >> self.position(num_qubits)) & 1
    }

    /// Whether this qubit exists in a register of `num_qubits` qubits
    #[inline]
    pub const fn is_within(&self, num_qubits: usize) -> bool {
        self.0 < num_qubits
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<usize> for QubitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<QubitId> for usize {
    #[inline]
    fn from(qid: QubitId) -> Self {
        qid.index()
    }
}
