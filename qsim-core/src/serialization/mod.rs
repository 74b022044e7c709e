//! Circuit documents and code export
//!
//! A circuit document is the JSON exchange form of a circuit: a qubit count,
//! a list of time-stamped gate entries and an optional initial state given as
//! `[re, im]` pairs. [`CircuitDocument`] reads and writes that form and
//! converts it to and from [`Circuit`](crate::Circuit). [`QiskitExporter`]
//! renders a document as a runnable Qiskit script and [`QiskitImporter`]
//! reads such scripts back.

pub mod document;
pub mod qiskit;
pub mod qiskit_import;

#[cfg(test)]
mod tests;

pub use document::{CircuitDocument, GateEntry};
pub use qiskit::QiskitExporter;
pub use qiskit_import::QiskitImporter;

/// Gate name used by documents for a computational-basis measurement
pub const MEASUREMENT_GATE: &str = "M";
