//! Qiskit source export
//!
//! Renders a [`CircuitDocument`] as a Python script that rebuilds the circuit
//! with Qiskit and runs it on the Aer simulator. Circuits without
//! measurements save and print the final statevector; circuits with
//! measurements print shot counts instead.

use super::{CircuitDocument, GateEntry};
use crate::{QuantumError, Result};
use std::path::Path;

/// Shots requested by the generated script for measured circuits
const EXPORT_SHOTS: usize = 1024;

/// Generates Qiskit code from a circuit document
///
/// # Example
/// ```
/// use qsim_core::serialization::{CircuitDocument, GateEntry, QiskitExporter};
///
/// let mut doc = CircuitDocument::new(2);
/// doc.gates.push(GateEntry::new("H", vec![0], 0));
/// doc.gates.push(GateEntry::new("CNOT", vec![0, 1], 1));
///
/// let code = QiskitExporter::new(&doc).generate();
/// assert!(code.contains("qc = QuantumCircuit(2)"));
/// assert!(code.contains("qc.cx(0, 1)"));
/// ```
#[derive(Debug, Clone)]
pub struct QiskitExporter<'a> {
    document: &'a CircuitDocument,
    include_visualization: bool,
}

impl<'a> QiskitExporter<'a> {
    pub fn new(document: &'a CircuitDocument) -> Self {
        Self {
            document,
            include_visualization: true,
        }
    }

    /// Toggle the `print(qc.draw())` block
    pub fn with_visualization(mut self, include: bool) -> Self {
        self.include_visualization = include;
        self
    }

    /// Produce the script
    pub fn generate(&self) -> String {
        let doc = self.document;
        let n = doc.num_qubits;
        let has_measurement = doc.has_measurements();

        let mut lines: Vec<String> = vec![
            "from qiskit import QuantumCircuit, QuantumRegister, ClassicalRegister, transpile"
                .into(),
            "from qiskit_aer import AerSimulator".into(),
            "from numpy import pi".into(),
            String::new(),
            "# Create quantum circuit".into(),
        ];

        if has_measurement {
            lines.push(format!("qr = QuantumRegister({}, 'q')", n));
            lines.push(format!("cr = ClassicalRegister({}, 'c')", n));
            lines.push("qc = QuantumCircuit(qr, cr)".into());
        } else {
            lines.push(format!("qc = QuantumCircuit({})", n));
        }
        lines.push(String::new());

        if let Some(state) = doc.initial_state.as_deref().filter(|s| !s.is_empty()) {
            lines.push("# Initialize custom state".into());
            lines.push(format!("initial_state = {}", format_initial_state(state)));
            lines.push(format!("qc.initialize(initial_state, range({}))", n));
            lines.push(String::new());
        }

        lines.push("# Apply gates (in order of execution time)".into());
        for entry in doc.sorted_gates() {
            if entry.gate.eq_ignore_ascii_case("I") || entry.gate.eq_ignore_ascii_case("ID") {
                lines.push(format!(
                    "# Time {}: Identity gate on qubit(s) {:?} - no operation",
                    entry.time, entry.qubits
                ));
                continue;
            }
            match gate_call(entry) {
                Ok(call) => lines.push(format!("{}  # Time: {}", call, entry.time)),
                Err(err) => lines.push(format!("# ERROR at time {}: {}", entry.time, err)),
            }
        }
        lines.push(String::new());

        if !has_measurement {
            lines.push("qc.save_statevector()".into());
        }

        if self.include_visualization {
            lines.push("# Visualize circuit".into());
            lines.push("print(qc.draw())".into());
            lines.push(String::new());
        }

        lines.push("# Execute circuit".into());
        lines.push("simulator = AerSimulator()".into());
        lines.push("qc_t = transpile(qc, simulator)".into());
        if has_measurement {
            lines.push(format!(
                "result = simulator.run(qc_t, shots={}).result()",
                EXPORT_SHOTS
            ));
            lines.push("counts = result.get_counts()".into());
            lines.push("print('Measurement results:')".into());
            lines.push("print(counts)".into());
        } else {
            lines.push("result = simulator.run(qc_t).result()".into());
            lines.push("statevector = result.get_statevector(qc_t)".into());
            lines.push("probabilities = statevector.probabilities_dict()".into());
            lines.push("print('Final statevector:')".into());
            lines.push("print(statevector)".into());
            lines.push("print('Probabilities:')".into());
            lines.push("print(probabilities)".into());
        }

        lines.join("\n")
    }

    /// Write the script to `path`
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.generate()).map_err(|e| {
            QuantumError::Serialization(format!("cannot write {}: {}", path.display(), e))
        })
    }
}

/// Qiskit call for one entry
fn gate_call(entry: &GateEntry) -> std::result::Result<String, String> {
    let name = entry.gate.to_ascii_uppercase();
    let arity = match name.as_str() {
        "H" | "X" | "Y" | "Z" | "S" | "T" | "M" => 1,
        "CNOT" | "CX" | "CZ" | "SWAP" => 2,
        "CCNOT" | "CCX" | "TOFFOLI" => 3,
        _ => {
            return Err(format!(
                "Unsupported gate: {}. Only I, H, X, Y, Z, S, T, CNOT, CZ, SWAP, CCNOT, M are supported.",
                entry.gate
            ))
        }
    };
    if entry.qubits.len() < arity {
        return Err(format!(
            "Gate {} needs {} qubits, got {:?}",
            entry.gate, arity, entry.qubits
        ));
    }

    let q = &entry.qubits;
    let call = match name.as_str() {
        "M" => format!("qc.measure({}, {})", q[0], q[0]),
        "CNOT" | "CX" => format!("qc.cx({0}, {1})  # control: {0}, target: {1}", q[0], q[1]),
        "CZ" => format!("qc.cz({0}, {1})  # control: {0}, target: {1}", q[0], q[1]),
        "SWAP" => format!("qc.swap({}, {})", q[0], q[1]),
        "CCNOT" | "CCX" | "TOFFOLI" => format!(
            "qc.ccx({0}, {1}, {2})  # controls: [{0}, {1}], target: {2}",
            q[0], q[1], q[2]
        ),
        single => format!("qc.{}({})", single.to_ascii_lowercase(), q[0]),
    };
    Ok(call)
}

/// Python list literal of complex amplitudes, e.g. `[1.0+0.0j, 0.0-0.5j]`
fn format_initial_state(state: &[[f64; 2]]) -> String {
    let amplitudes: Vec<String> = state
        .iter()
        .map(|[re, im]| {
            if *im >= 0.0 {
                format!("{:?}+{:?}j", re, im)
            } else {
                format!("{:?}{:?}j", re, im)
            }
        })
        .collect();
    format!("[{}]", amplitudes.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_initial_state() {
        assert_eq!(
            format_initial_state(&[[1.0, 0.0], [0.0, -0.5]]),
            "[1.0+0.0j, 0.0-0.5j]"
        );
    }

    #[test]
    fn test_gate_calls() {
        let call = |g: &str, q: Vec<usize>| gate_call(&GateEntry::new(g, q, 0));
        assert_eq!(call("h", vec![2]).unwrap(), "qc.h(2)");
        assert_eq!(call("T", vec![0]).unwrap(), "qc.t(0)");
        assert_eq!(
            call("CX", vec![1, 0]).unwrap(),
            "qc.cx(1, 0)  # control: 1, target: 0"
        );
        assert_eq!(
            call("Toffoli", vec![0, 1, 2]).unwrap(),
            "qc.ccx(0, 1, 2)  # controls: [0, 1], target: 2"
        );
        assert_eq!(call("M", vec![1]).unwrap(), "qc.measure(1, 1)");
        assert!(call("FOO", vec![0]).unwrap_err().contains("Unsupported gate: FOO"));
        assert!(call("CNOT", vec![0]).is_err());
    }
}
