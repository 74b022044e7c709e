//! State-vector representation and gate application for QSim
//!
//! - [`StateVector`]: the 2^n amplitudes of a register, with measurement,
//!   collapse and per-qubit inspection
//! - [`expansion`]: applies a k-qubit gate in place without building the
//!   full-register operator, sequentially or on the rayon pool
//! - [`measurement`]: measurement records and alias-table shot sampling
//! - [`BlochVector`]: single-qubit reduced states
//!
//! # Example
//!
//! ```
//! use qsim_gates::lookup;
//! use qsim_state::{StateVector, DEFAULT_ZERO_PROBABILITY};
//!
//! let mut state = StateVector::new(1).unwrap();
//! state.apply(lookup("X").unwrap().matrix, &[0usize]).unwrap();
//!
//! let m = state.measure_qubit(0, 0.5, DEFAULT_ZERO_PROBABILITY).unwrap();
//! assert_eq!(m.outcome, 1);
//! ```

pub mod bloch;
pub mod expansion;
pub mod measurement;
pub mod state_vector;

pub use bloch::{BlochAngles, BlochVector};
pub use expansion::{apply_gate, TargetLayout};
pub use measurement::{AliasTable, QubitMeasurement, SamplingResult};
pub use state_vector::StateVector;

/// Largest register a state vector can hold (2^24 amplitudes, 256 MiB)
pub const MAX_QUBITS: usize = 24;

/// Tolerance on `|Σ|aᵢ|² − 1|` for externally supplied states
pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Outcome probabilities below this are treated as exactly zero
pub const DEFAULT_ZERO_PROBABILITY: f64 = 1e-10;

/// Register size from which gates run on the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 14;
