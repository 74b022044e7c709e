//! Circuit descriptors
//!
//! A [`Circuit`] is the ordered list of operations a simulation run consumes:
//! named gate applications and single-qubit measurements, plus an optional
//! custom initial state. The descriptor does not know the gate catalog; gate
//! names and targets are checked by the engine when each operation runs, so
//! a failure can be reported together with its operation index.

use crate::{Complex64, QuantumError, QubitId, Result};
use smallvec::SmallVec;
use std::fmt;

/// One step of a circuit
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Apply a catalog gate to the given targets, in matrix order
    ///
    /// For controlled gates the controls come first, then the target.
    ApplyGate {
        gate: String,
        targets: SmallVec<[QubitId; 3]>,
    },

    /// Measure one qubit in the computational basis and collapse
    Measure { qubit: QubitId },
}

impl Operation {
    /// Create a gate application
    pub fn apply(gate: impl Into<String>, targets: &[usize]) -> Self {
        Self::ApplyGate {
            gate: gate.into(),
            targets: targets.iter().copied().map(QubitId::new).collect(),
        }
    }

    /// Create a measurement
    pub fn measure(qubit: usize) -> Self {
        Self::Measure {
            qubit: QubitId::new(qubit),
        }
    }

    /// Qubits touched by this operation
    pub fn qubits(&self) -> &[QubitId] {
        match self {
            Self::ApplyGate { targets, .. } => targets,
            Self::Measure { qubit } => std::slice::from_ref(qubit),
        }
    }

    /// Whether this is a measurement
    #[inline]
    pub fn is_measurement(&self) -> bool {
        matches!(self, Self::Measure { .. })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplyGate { gate, targets } => {
                write!(f, "{}", gate)?;
                for (i, q) in targets.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{}{}", sep, q)?;
                }
                Ok(())
            }
            Self::Measure { qubit } => write!(f, "M {}", qubit),
        }
    }
}

/// A quantum circuit descriptor
///
/// # Example
/// ```
/// use qsim_core::Circuit;
///
/// let mut bell = Circuit::new(2);
/// bell.gate("H", &[0]).gate("CNOT", &[0, 1]).measure(0);
///
/// assert_eq!(bell.num_qubits(), 2);
/// assert_eq!(bell.len(), 3);
/// assert!(bell.has_measurements());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    operations: Vec<Operation>,
    initial_state: Option<Vec<Complex64>>,
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits
    ///
    /// # Panics
    /// Panics if `num_qubits` is 0; use [`Circuit::try_new`] for untrusted input.
    pub fn new(num_qubits: usize) -> Self {
        assert!(num_qubits > 0, "Circuit must have at least one qubit");
        Self {
            num_qubits,
            operations: Vec::new(),
            initial_state: None,
        }
    }

    /// Create an empty circuit, rejecting a zero-qubit register
    ///
    /// The upper bound on the register size is a simulator setting and is
    /// checked when the circuit runs.
    pub fn try_new(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(QuantumError::InvalidQubitCount {
                num_qubits,
                max: usize::MAX,
            });
        }
        Ok(Self::new(num_qubits))
    }

    /// Number of qubits in the register
    #[inline]
    pub const fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of operations
    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the circuit has no operations
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Append a gate application
    pub fn gate(&mut self, name: impl Into<String>, targets: &[usize]) -> &mut Self {
        self.operations.push(Operation::apply(name, targets));
        self
    }

    /// Append a measurement of `qubit`
    pub fn measure(&mut self, qubit: usize) -> &mut Self {
        self.operations.push(Operation::measure(qubit));
        self
    }

    /// Append an operation
    pub fn push(&mut self, operation: Operation) -> &mut Self {
        self.operations.push(operation);
        self
    }

    /// Use a custom initial state instead of |0...0⟩
    ///
    /// Length and normalization are validated when the state is loaded.
    pub fn with_initial_state(mut self, amplitudes: Vec<Complex64>) -> Self {
        self.initial_state = Some(amplitudes);
        self
    }

    /// Replace or clear the custom initial state
    pub fn set_initial_state(&mut self, amplitudes: Option<Vec<Complex64>>) {
        self.initial_state = amplitudes;
    }

    /// Custom initial state, if any
    pub fn initial_state(&self) -> Option<&[Complex64]> {
        self.initial_state.as_deref()
    }

    /// Operations in execution order
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Whether any operation is a measurement
    pub fn has_measurements(&self) -> bool {
        self.operations.iter().any(Operation::is_measurement)
    }

    /// Distinct measured qubits, ascending
    pub fn measured_qubits(&self) -> Vec<QubitId> {
        let mut qubits: Vec<QubitId> = self
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::Measure { qubit } => Some(*qubit),
                Operation::ApplyGate { .. } => None,
            })
            .collect();
        qubits.sort_unstable();
        qubits.dedup();
        qubits
    }

    /// Remove all operations, keeping the register and initial state
    pub fn clear(&mut self) {
        self.operations.clear();
    }

    /// Check that every operation addresses qubits inside the register
    ///
    /// Returns the index of the first offending operation with the error.
    pub fn validate_qubits(&self) -> std::result::Result<(), (usize, QuantumError)> {
        for (i, op) in self.operations.iter().enumerate() {
            for qubit in op.qubits() {
                if !qubit.is_within(self.num_qubits) {
                    return Err((
                        i,
                        QuantumError::qubit_out_of_range(qubit.index(), self.num_qubits),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit ({} qubits, {} operations)", self.num_qubits, self.len())?;
        for (i, op) in self.operations.iter().enumerate() {
            writeln!(f, "  {:>3}: {}", i, op)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let mut circuit = Circuit::new(3);
        circuit.gate("H", &[0]).gate("CCNOT", &[0, 1, 2]).measure(2);

        assert_eq!(circuit.len(), 3);
        assert_eq!(
            circuit.operations()[1],
            Operation::apply("CCNOT", &[0, 1, 2])
        );
        assert_eq!(circuit.operations()[2], Operation::measure(2));
    }

    #[test]
    #[should_panic(expected = "at least one qubit")]
    fn test_zero_qubits_panics() {
        let _ = Circuit::new(0);
    }

    #[test]
    fn test_try_new_rejects_zero() {
        assert!(Circuit::try_new(0).is_err());
        assert_eq!(Circuit::try_new(2).unwrap().num_qubits(), 2);
    }

    #[test]
    fn test_target_order_is_preserved() {
        let op = Operation::apply("CNOT", &[1, 0]);
        assert_eq!(op.qubits(), &[QubitId::new(1), QubitId::new(0)]);
    }

    #[test]
    fn test_measured_qubits() {
        let mut circuit = Circuit::new(3);
        circuit.measure(2).gate("X", &[0]).measure(0).measure(2);
        assert_eq!(
            circuit.measured_qubits(),
            vec![QubitId::new(0), QubitId::new(2)]
        );
    }

    #[test]
    fn test_validate_qubits_reports_index() {
        let mut circuit = Circuit::new(2);
        circuit.gate("H", &[0]).gate("CNOT", &[0, 2]);

        let (index, err) = circuit.validate_qubits().unwrap_err();
        assert_eq!(index, 1);
        assert_eq!(err, QuantumError::qubit_out_of_range(2, 2));
    }

    #[test]
    fn test_initial_state_roundtrip() {
        let amps = vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)];
        let mut circuit = Circuit::new(1).with_initial_state(amps.clone());
        assert_eq!(circuit.initial_state(), Some(amps.as_slice()));

        circuit.set_initial_state(None);
        assert!(circuit.initial_state().is_none());
    }

    #[test]
    fn test_display() {
        let mut circuit = Circuit::new(2);
        circuit.gate("CNOT", &[0, 1]).measure(1);
        let text = circuit.to_string();
        assert!(text.contains("CNOT q0, q1"));
        assert!(text.contains("M q1"));
    }
}
