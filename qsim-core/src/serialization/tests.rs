//! Tests for circuit documents and Qiskit interchange

use crate::circuit::{Circuit, Operation};
use crate::serialization::{CircuitDocument, GateEntry, QiskitExporter, QiskitImporter};
use crate::{Complex64, ErrorKind, QuantumError};

const BELL_JSON: &str = r#"{
  "num_qubits": 2,
  "gates": [
    {"id": 3, "gate": "M", "qubits": [0], "time": 2, "selected": false},
    {"id": 2, "gate": "CNOT", "qubits": [0, 1], "time": 1, "selected": false},
    {"id": 1, "gate": "H", "qubits": [0], "time": 0, "selected": false}
  ],
  "initial_state": null
}"#;

#[test]
fn test_document_parses_and_orders_by_time() {
    let doc = CircuitDocument::from_json(BELL_JSON).unwrap();
    assert_eq!(doc.num_qubits, 2);
    assert_eq!(doc.gates.len(), 3);
    assert!(doc.initial_state.is_none());

    let circuit = doc.into_circuit().unwrap();
    assert_eq!(
        circuit.operations(),
        &[
            Operation::apply("H", &[0]),
            Operation::apply("CNOT", &[0, 1]),
            Operation::measure(0),
        ]
    );
}

#[test]
fn test_equal_times_keep_document_order() {
    let mut doc = CircuitDocument::new(3);
    doc.gates.push(GateEntry::new("X", vec![2], 1));
    doc.gates.push(GateEntry::new("H", vec![0], 0));
    doc.gates.push(GateEntry::new("Z", vec![1], 1));
    doc.gates.push(GateEntry::new("Y", vec![0], 1));

    let names: Vec<String> = doc
        .to_circuit()
        .unwrap()
        .operations()
        .iter()
        .map(|op| op.to_string())
        .collect();
    assert_eq!(names, vec!["H q0", "X q2", "Z q1", "Y q0"]);
}

#[test]
fn test_missing_fields_use_defaults() {
    let doc = CircuitDocument::from_json(r#"{"num_qubits": 1}"#).unwrap();
    assert!(doc.gates.is_empty());
    assert!(doc.initial_state.is_none());
    assert!(doc.to_circuit().unwrap().is_empty());
}

#[test]
fn test_initial_state_pairs() {
    let json = r#"{"num_qubits": 1, "gates": [], "initial_state": [[0.0, 0.0], [0.0, 1.0]]}"#;
    let circuit = CircuitDocument::from_json(json).unwrap().into_circuit().unwrap();
    assert_eq!(
        circuit.initial_state(),
        Some(&[Complex64::new(0.0, 0.0), Complex64::new(0.0, 1.0)][..])
    );
}

#[test]
fn test_zero_qubits_rejected() {
    let err = CircuitDocument::new(0).to_circuit().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_measurement_needs_one_qubit() {
    let mut doc = CircuitDocument::new(2);
    doc.gates.push(GateEntry::new("M", vec![0, 1], 0));
    let err = doc.to_circuit().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTarget);
}

#[test]
fn test_malformed_json() {
    let err = CircuitDocument::from_json("{\"gates\": []}").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serialization);
}

#[test]
fn test_from_circuit_roundtrip() {
    let mut circuit = Circuit::new(2)
        .with_initial_state(vec![
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
        ]);
    circuit.gate("H", &[1]).gate("CZ", &[1, 0]).measure(1);

    let doc = CircuitDocument::from_circuit(&circuit);
    assert_eq!(doc.gates[2], GateEntry::new("M", vec![1], 2));

    let parsed = CircuitDocument::from_json(&doc.to_json().unwrap()).unwrap();
    assert_eq!(parsed.to_circuit().unwrap(), circuit);
}

#[test]
fn test_qiskit_statevector_script() {
    let mut doc = CircuitDocument::new(2);
    doc.gates.push(GateEntry::new("CNOT", vec![0, 1], 1));
    doc.gates.push(GateEntry::new("H", vec![0], 0));
    doc.gates.push(GateEntry::new("I", vec![1], 0));

    let code = QiskitExporter::new(&doc).generate();
    let h = code.find("qc.h(0)  # Time: 0").unwrap();
    let cx = code.find("qc.cx(0, 1)  # control: 0, target: 1  # Time: 1").unwrap();
    assert!(h < cx);
    assert!(code.contains("# Time 0: Identity gate on qubit(s) [1] - no operation"));
    assert!(code.contains("qc = QuantumCircuit(2)"));
    assert!(code.contains("qc.save_statevector()"));
    assert!(code.contains("print(qc.draw())"));
    assert!(code.contains("statevector = result.get_statevector(qc_t)"));
    assert!(!code.contains("ClassicalRegister(2"));
}

#[test]
fn test_qiskit_measured_script() {
    let doc = CircuitDocument::from_json(BELL_JSON).unwrap();
    let code = QiskitExporter::new(&doc).with_visualization(false).generate();

    assert!(code.contains("qr = QuantumRegister(2, 'q')"));
    assert!(code.contains("cr = ClassicalRegister(2, 'c')"));
    assert!(code.contains("qc.measure(0, 0)  # Time: 2"));
    assert!(code.contains("result = simulator.run(qc_t, shots=1024).result()"));
    assert!(code.contains("simulator = AerSimulator()"));
    assert!(!code.contains("save_statevector"));
    assert!(!code.contains("qc.draw()"));
}

#[test]
fn test_qiskit_initial_state_and_errors() {
    let mut doc = CircuitDocument::new(1);
    doc.initial_state = Some(vec![[0.6, 0.0], [0.0, -0.8]]);
    doc.gates.push(GateEntry::new("RX", vec![0], 4));

    let code = QiskitExporter::new(&doc).generate();
    assert!(code.contains("initial_state = [0.6+0.0j, 0.0-0.8j]"));
    assert!(code.contains("qc.initialize(initial_state, range(1))"));
    assert!(code.contains("# ERROR at time 4: Unsupported gate: RX."));
}

fn gate_list(doc: &CircuitDocument) -> Vec<(String, Vec<usize>)> {
    doc.sorted_gates()
        .into_iter()
        .map(|entry| (entry.gate.clone(), entry.qubits.clone()))
        .collect()
}

#[test]
fn test_qiskit_import_reads_exported_script() {
    let mut doc = CircuitDocument::new(3);
    doc.initial_state = Some(vec![
        [0.5, 0.0],
        [0.0, -0.5],
        [0.0, 0.0],
        [0.0, 0.0],
        [-0.5, 0.0],
        [0.0, 0.0],
        [0.0, 0.5],
        [0.0, 0.0],
    ]);
    doc.gates.push(GateEntry::new("H", vec![0], 0));
    doc.gates.push(GateEntry::new("I", vec![1], 1));
    doc.gates.push(GateEntry::new("CNOT", vec![0, 1], 2));
    doc.gates.push(GateEntry::new("SWAP", vec![1, 2], 3));
    doc.gates.push(GateEntry::new("CCNOT", vec![0, 1, 2], 4));
    doc.gates.push(GateEntry::new("CZ", vec![2, 0], 5));
    doc.gates.push(GateEntry::new("M", vec![1], 6));

    let script = QiskitExporter::new(&doc).generate();
    let mut importer = QiskitImporter::new();
    let imported = importer.parse(&script).unwrap();

    assert!(importer.warnings().is_empty(), "{:?}", importer.warnings());
    assert_eq!(imported.num_qubits, 3);
    assert_eq!(imported.initial_state, doc.initial_state);
    imported.validate().unwrap();

    // identity entries are exported as comments
    let expected: Vec<(String, Vec<usize>)> = gate_list(&doc)
        .into_iter()
        .filter(|(gate, _)| gate != "I")
        .collect();
    assert_eq!(gate_list(&imported), expected);

    let times: Vec<u64> = imported.gates.iter().map(|entry| entry.time).collect();
    assert_eq!(times, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_qiskit_import_statevector_script() {
    let mut doc = CircuitDocument::new(2);
    doc.gates.push(GateEntry::new("H", vec![0], 0));
    doc.gates.push(GateEntry::new("T", vec![1], 0));
    doc.gates.push(GateEntry::new("CNOT", vec![1, 0], 1));

    let script = QiskitExporter::new(&doc).generate();
    let imported = QiskitImporter::new().parse(&script).unwrap();

    assert!(imported.initial_state.is_none());
    assert_eq!(gate_list(&imported), gate_list(&doc));
    assert_eq!(
        imported.to_circuit().unwrap(),
        doc.to_circuit().unwrap()
    );
}

#[test]
fn test_qiskit_import_register_arguments() {
    let source = "
qr = QuantumRegister(2, 'q')
cr = ClassicalRegister(2, 'c')
qc = QuantumCircuit(qr, cr)
qc.h(qr[0])
qc.cx(qr[0], qr[1])
qc.barrier()
qc.measure(qr[1], cr[1])
";
    let mut importer = QiskitImporter::new();
    let imported = importer.parse(source).unwrap();
    assert_eq!(imported.num_qubits, 2);
    assert_eq!(
        imported.gates,
        vec![
            GateEntry::new("H", vec![0], 1),
            GateEntry::new("CNOT", vec![0, 1], 2),
            GateEntry::new("M", vec![1], 3),
        ]
    );
    assert!(importer.warnings().is_empty());
}

#[test]
fn test_qiskit_import_literal_initialize() {
    let source = "qc = QuantumCircuit(1)\nqc.initialize([0.6, 0.8j], 0)\nqc.x(0)\n";
    let imported = QiskitImporter::new().parse(source).unwrap();
    assert_eq!(imported.initial_state, Some(vec![[0.6, 0.0], [0.0, 0.8]]));
    assert_eq!(imported.gates, vec![GateEntry::new("X", vec![0], 1)]);
}

#[test]
fn test_qiskit_import_warns_on_unsupported_methods() {
    let source = "
qc = QuantumCircuit(2)
qc.rx(0.5, 0)
qc.h(1)
qc.u(0.1, 0.2, 0.3, 1)
";
    let mut importer = QiskitImporter::new();
    let imported = importer.parse(source).unwrap();

    assert_eq!(imported.gates, vec![GateEntry::new("H", vec![1], 1)]);
    assert_eq!(
        importer.warnings(),
        &[
            "line 3: unsupported gate method: rx".to_string(),
            "line 5: unsupported gate method: u".to_string(),
        ]
    );

    // warnings belong to a single parse
    importer.parse("qc = QuantumCircuit(1)\nqc.h(0)").unwrap();
    assert!(importer.warnings().is_empty());
}

#[test]
fn test_qiskit_import_errors() {
    let err = QiskitImporter::new().parse("qc.h(0)\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serialization);
    assert!(err.to_string().contains("number of qubits"));

    let err = QiskitImporter::new()
        .parse("qc = QuantumCircuit(1)\ninitial_state = [1/sqrt(2), 0]\n")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serialization);
    assert!(err.to_string().contains("line 2"));

    let err = QiskitImporter::new()
        .parse("qc = QuantumCircuit(1)\nqc.x(-1)\n")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Serialization);
}

#[test]
fn test_validate_checks_register() {
    let imported = QiskitImporter::new()
        .parse("qc = QuantumCircuit(2)\nqc.cx(0, 2)\n")
        .unwrap();
    let err = imported.validate().unwrap_err();
    assert_eq!(err, QuantumError::qubit_out_of_range(2, 2));

    let imported = QiskitImporter::new()
        .parse("qc = QuantumCircuit(2)\ninitial_state = [1, 0, 0]\n")
        .unwrap();
    assert_eq!(
        imported.validate().unwrap_err(),
        QuantumError::StateLengthMismatch {
            expected: 4,
            actual: 3
        }
    );

    let err = CircuitDocument::new(0).validate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(CircuitDocument::new(usize::BITS as usize).validate().is_err());
    assert!(CircuitDocument::new(4).validate().is_ok());
}
