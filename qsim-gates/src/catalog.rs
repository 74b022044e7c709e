//! The gate catalog
//!
//! Gates are plain tagged data: a name, display strings, an arity and a
//! constant matrix. The table is `'static` and shared by every session.

use crate::matrices;
use num_complex::Complex64;
use qsim_core::{QuantumError, Result};
use std::fmt;

/// A named unitary from the catalog
#[derive(Debug, PartialEq)]
pub struct Gate {
    /// Canonical name, e.g. `"CNOT"`
    pub name: &'static str,
    /// Human-readable name, e.g. `"Controlled-NOT"`
    pub title: &'static str,
    pub description: &'static str,
    /// Number of target qubits (1 to 3)
    pub arity: usize,
    /// `2^arity × 2^arity` matrix, row-major
    pub matrix: &'static [Complex64],
}

impl Gate {
    /// Matrix dimension `2^arity`
    #[inline]
    pub const fn dimension(&self) -> usize {
        1 << self.arity
    }

    /// Matrix element at `(row, col)`
    #[inline]
    pub fn element(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[row * self.dimension() + col]
    }

    /// Check the target count against the arity
    pub fn check_arity(&self, num_targets: usize) -> Result<()> {
        if num_targets != self.arity {
            return Err(QuantumError::arity_mismatch(self.name, self.arity, num_targets));
        }
        Ok(())
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.title)
    }
}

static CATALOG: [Gate; 11] = [
    Gate {
        name: "I",
        title: "Identity",
        description: "Identity gate - no operation",
        arity: 1,
        matrix: &matrices::IDENTITY,
    },
    Gate {
        name: "X",
        title: "Pauli-X",
        description: "NOT gate - flips qubit state",
        arity: 1,
        matrix: &matrices::PAULI_X,
    },
    Gate {
        name: "Y",
        title: "Pauli-Y",
        description: "Pauli-Y gate",
        arity: 1,
        matrix: &matrices::PAULI_Y,
    },
    Gate {
        name: "Z",
        title: "Pauli-Z",
        description: "Phase flip gate",
        arity: 1,
        matrix: &matrices::PAULI_Z,
    },
    Gate {
        name: "H",
        title: "Hadamard",
        description: "Creates superposition",
        arity: 1,
        matrix: &matrices::HADAMARD,
    },
    Gate {
        name: "S",
        title: "S Gate",
        description: "Phase gate (90° rotation)",
        arity: 1,
        matrix: &matrices::S_GATE,
    },
    Gate {
        name: "T",
        title: "T Gate",
        description: "T gate (45° rotation)",
        arity: 1,
        matrix: &matrices::T_GATE,
    },
    Gate {
        name: "CNOT",
        title: "Controlled-NOT",
        description: "Controlled NOT gate",
        arity: 2,
        matrix: &matrices::CNOT,
    },
    Gate {
        name: "CZ",
        title: "Controlled-Z",
        description: "Controlled Z gate",
        arity: 2,
        matrix: &matrices::CZ,
    },
    Gate {
        name: "SWAP",
        title: "SWAP",
        description: "Swaps two qubits",
        arity: 2,
        matrix: &matrices::SWAP,
    },
    Gate {
        name: "CCNOT",
        title: "Toffoli",
        description: "Controlled-Controlled-NOT gate",
        arity: 3,
        matrix: &matrices::CCNOT,
    },
];

/// Alternative spellings accepted by [`lookup`]
const ALIASES: [(&str, &str); 4] = [
    ("ID", "I"),
    ("CX", "CNOT"),
    ("CCX", "CCNOT"),
    ("TOFFOLI", "CCNOT"),
];

/// Find a gate by name
///
/// Matching ignores ASCII case and accepts the common aliases `ID`, `CX`,
/// `CCX` and `TOFFOLI`.
///
/// # Example
/// ```
/// use qsim_gates::lookup;
///
/// let cx = lookup("cx").unwrap();
/// assert_eq!(cx.name, "CNOT");
/// assert_eq!(cx.arity, 2);
/// assert!(lookup("FOO").is_err());
/// ```
pub fn lookup(name: &str) -> Result<&'static Gate> {
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map_or(name, |(_, target)| *target);

    CATALOG
        .iter()
        .find(|gate| gate.name.eq_ignore_ascii_case(canonical))
        .ok_or_else(|| QuantumError::UnknownGate(name.to_string()))
}

/// Every catalog gate, in display order
pub fn all() -> &'static [Gate] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsim_core::ErrorKind;

    #[test]
    fn test_lookup_canonical_names() {
        for gate in all() {
            let found = lookup(gate.name).unwrap();
            assert!(std::ptr::eq(found, gate));
            assert_eq!(gate.matrix.len(), gate.dimension() * gate.dimension());
        }
    }

    #[test]
    fn test_lookup_aliases_and_case() {
        assert_eq!(lookup("h").unwrap().name, "H");
        assert_eq!(lookup("Cx").unwrap().name, "CNOT");
        assert_eq!(lookup("ccx").unwrap().name, "CCNOT");
        assert_eq!(lookup("Toffoli").unwrap().name, "CCNOT");
        assert_eq!(lookup("id").unwrap().name, "I");
    }

    #[test]
    fn test_unknown_gate() {
        let err = lookup("FOO").unwrap_err();
        assert_eq!(err, QuantumError::UnknownGate("FOO".into()));
        assert_eq!(err.kind(), ErrorKind::UnknownGate);
        // measurement is handled by the circuit layer, not the catalog
        assert!(lookup("M").is_err());
    }

    #[test]
    fn test_check_arity() {
        let cnot = lookup("CNOT").unwrap();
        assert!(cnot.check_arity(2).is_ok());
        assert_eq!(
            cnot.check_arity(1).unwrap_err(),
            QuantumError::arity_mismatch("CNOT", 2, 1)
        );
    }

    #[test]
    fn test_element_indexing() {
        let cnot = lookup("CNOT").unwrap();
        assert_eq!(cnot.element(2, 3), Complex64::new(1.0, 0.0));
        assert_eq!(cnot.element(2, 2), Complex64::new(0.0, 0.0));
        assert_eq!(cnot.to_string(), "CNOT (Controlled-NOT)");
    }
}
