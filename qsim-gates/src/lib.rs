//! Gate catalog for QSim
//!
//! The simulator supports a fixed set of 1-, 2- and 3-qubit unitaries:
//!
//! | Arity | Gates |
//! |-------|-------|
//! | 1 | `I`, `X`, `Y`, `Z`, `H`, `S`, `T` |
//! | 2 | `CNOT`, `CZ`, `SWAP` |
//! | 3 | `CCNOT` |
//!
//! Matrices are compile-time constants in [`matrices`]; [`lookup`] resolves a
//! name (case-insensitive, with the aliases `CX`, `CCX`, `TOFFOLI` and `ID`)
//! to its [`Gate`] entry.
//!
//! # Example
//! ```
//! use qsim_gates::{lookup, matrix_ops::is_unitary};
//!
//! let h = lookup("H").unwrap();
//! assert_eq!(h.title, "Hadamard");
//! assert!(is_unitary(h.matrix, 1e-9));
//! ```

pub mod catalog;
pub mod matrices;
pub mod matrix_ops;

pub use catalog::{all, lookup, Gate};
