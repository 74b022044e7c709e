//! Core types for the QSim state-vector simulator
//!
//! This crate provides the building blocks shared by the other QSim crates:
//! - [`complex`]: amplitude arithmetic on [`Complex64`]
//! - [`QubitId`]: qubit addressing and the basis-index bit convention
//! - [`Circuit`]: ordered gate and measurement operations
//! - [`QuantumError`]: the error taxonomy
//! - [`serialization`]: JSON circuit documents and Qiskit export
//!
//! # Example
//! ```
//! use qsim_core::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new(2);
//! circuit.gate("H", &[0]).gate("CNOT", &[0, 1]);
//! assert_eq!(circuit.operations()[1].qubits()[1], QubitId::new(1));
//! ```

pub mod circuit;
pub mod complex;
pub mod error;
pub mod qubit;
pub mod serialization;

// Re-exports for convenience
pub use circuit::{Circuit, Operation};
pub use error::{ErrorKind, QuantumError};
pub use num_complex::Complex64;
pub use qubit::QubitId;

/// Type alias for results in QSim
pub type Result<T> = std::result::Result<T, QuantumError>;
