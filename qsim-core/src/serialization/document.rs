//! JSON circuit documents

use super::MEASUREMENT_GATE;
use crate::complex::{from_pair, to_pair};
use crate::{Circuit, Operation, QuantumError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One placed gate of a circuit document
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GateEntry {
    /// Gate name, or `"M"` for a measurement
    pub gate: String,
    /// Target qubits in matrix order
    pub qubits: Vec<usize>,
    /// Column the gate occupies; entries run in ascending time
    #[serde(default)]
    pub time: u64,
}

impl GateEntry {
    /// Create an entry
    pub fn new(gate: impl Into<String>, qubits: Vec<usize>, time: u64) -> Self {
        Self {
            gate: gate.into(),
            qubits,
            time,
        }
    }

    /// Whether this entry is a measurement
    pub fn is_measurement(&self) -> bool {
        self.gate.eq_ignore_ascii_case(MEASUREMENT_GATE)
    }
}

/// Serialized circuit
///
/// Unknown fields written by other tools (entry ids, selection flags) are
/// ignored on read.
///
/// # Example
/// ```
/// use qsim_core::serialization::CircuitDocument;
///
/// let json = r#"{
///     "num_qubits": 2,
///     "gates": [
///         {"gate": "CNOT", "qubits": [0, 1], "time": 1},
///         {"gate": "H", "qubits": [0], "time": 0}
///     ],
///     "initial_state": null
/// }"#;
///
/// let circuit = CircuitDocument::from_json(json)?.into_circuit()?;
/// assert_eq!(circuit.operations()[0].to_string(), "H q0");
/// # Ok::<(), qsim_core::QuantumError>(())
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CircuitDocument {
    pub num_qubits: usize,
    #[serde(default)]
    pub gates: Vec<GateEntry>,
    #[serde(default)]
    pub initial_state: Option<Vec<[f64; 2]>>,
}

impl CircuitDocument {
    /// Create an empty document
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            initial_state: None,
        }
    }

    /// Parse a document from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the document as indented JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a document from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            QuantumError::Serialization(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Write the document to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|e| {
            QuantumError::Serialization(format!("cannot write {}: {}", path.display(), e))
        })
    }

    /// Check qubit indices and the initial state length against the register
    ///
    /// Gate names and arities are left to the engine.
    pub fn validate(&self) -> Result<()> {
        let n = self.num_qubits;
        if n == 0 || n >= usize::BITS as usize {
            return Err(QuantumError::InvalidQubitCount {
                num_qubits: n,
                max: usize::BITS as usize - 1,
            });
        }

        for entry in &self.gates {
            if let Some(&q) = entry.qubits.iter().find(|&&q| q >= n) {
                return Err(QuantumError::qubit_out_of_range(q, n));
            }
        }

        if let Some(state) = &self.initial_state {
            if state.len() != 1 << n {
                return Err(QuantumError::StateLengthMismatch {
                    expected: 1 << n,
                    actual: state.len(),
                });
            }
        }
        Ok(())
    }

    /// Whether any entry is a measurement
    pub fn has_measurements(&self) -> bool {
        self.gates.iter().any(GateEntry::is_measurement)
    }

    /// Entries in execution order
    ///
    /// Entries sharing a time keep their document order.
    pub fn sorted_gates(&self) -> Vec<&GateEntry> {
        let mut sorted: Vec<&GateEntry> = self.gates.iter().collect();
        sorted.sort_by_key(|entry| entry.time);
        sorted
    }

    /// Convert to a circuit descriptor, consuming the document
    pub fn into_circuit(self) -> Result<Circuit> {
        self.to_circuit()
    }

    /// Convert to a circuit descriptor
    ///
    /// Gate names and targets are not checked against the catalog here; the
    /// engine rejects them when the operation runs. A measurement entry must
    /// name exactly one qubit.
    pub fn to_circuit(&self) -> Result<Circuit> {
        let mut circuit = Circuit::try_new(self.num_qubits)?;

        for entry in self.sorted_gates() {
            if entry.is_measurement() {
                let [qubit] = entry.qubits.as_slice() else {
                    return Err(QuantumError::arity_mismatch(
                        MEASUREMENT_GATE,
                        1,
                        entry.qubits.len(),
                    ));
                };
                circuit.measure(*qubit);
            } else {
                circuit.gate(entry.gate.as_str(), &entry.qubits);
            }
        }

        if let Some(state) = &self.initial_state {
            circuit.set_initial_state(Some(state.iter().copied().map(from_pair).collect()));
        }

        Ok(circuit)
    }

    /// Build a document from a circuit, one time column per operation
    pub fn from_circuit(circuit: &Circuit) -> Self {
        let gates = circuit
            .operations()
            .iter()
            .enumerate()
            .map(|(time, op)| {
                let qubits = op.qubits().iter().map(|q| q.index()).collect();
                let name = match op {
                    Operation::ApplyGate { gate, .. } => gate.clone(),
                    Operation::Measure { .. } => MEASUREMENT_GATE.to_string(),
                };
                GateEntry::new(name, qubits, time as u64)
            })
            .collect();

        Self {
            num_qubits: circuit.num_qubits(),
            gates,
            initial_state: circuit
                .initial_state()
                .map(|amps| amps.iter().copied().map(to_pair).collect()),
        }
    }
}

impl From<&Circuit> for CircuitDocument {
    fn from(circuit: &Circuit) -> Self {
        Self::from_circuit(circuit)
    }
}

impl TryFrom<&CircuitDocument> for Circuit {
    type Error = QuantumError;

    fn try_from(document: &CircuitDocument) -> Result<Self> {
        document.to_circuit()
    }
}
