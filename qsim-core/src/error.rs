//! Error types for QSim
//!
//! Every failure the engine can report falls into one of a few categories,
//! exposed through [`QuantumError::kind`]. All of them are deterministic
//! caller or logic errors: nothing here is retried.

use crate::QubitId;
use thiserror::Error;

/// Broad category of a [`QuantumError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Gate name not present in the catalog
    UnknownGate,
    /// Wrong number of targets, or out-of-range / duplicate target qubits
    InvalidTarget,
    /// Malformed register: bad size, length or normalization
    InvalidState,
    /// Collapse onto an outcome with no probability mass
    DegenerateMeasurement,
    /// Operation issued before the register was initialized
    NotInitialized,
    /// Circuit document could not be read or written
    Serialization,
}

/// Errors that can occur while building or simulating a circuit
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    /// Gate name not found in the catalog
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// Gate applied to the wrong number of qubits
    #[error("Gate '{gate}' requires {expected} target qubits, but {actual} were provided")]
    ArityMismatch {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Qubit index outside the register
    #[error("Invalid qubit index {index}: register has only {num_qubits} qubits")]
    QubitOutOfRange { index: usize, num_qubits: usize },

    /// Same qubit named twice in one gate operation
    #[error("Duplicate qubit {0} in gate operation")]
    DuplicateQubit(QubitId),

    /// Register size outside the supported range
    #[error("Register must have between 1 and {max} qubits, got {num_qubits}")]
    InvalidQubitCount { num_qubits: usize, max: usize },

    /// Custom state has the wrong number of amplitudes
    #[error("Initial state must have {expected} amplitudes, got {actual}")]
    StateLengthMismatch { expected: usize, actual: usize },

    /// Custom state is not normalized
    #[error("Initial state is not normalized: sum of |a|^2 = {norm_squared}")]
    NotNormalized { norm_squared: f64 },

    /// Measurement would collapse onto a zero-probability outcome
    #[error("Cannot collapse qubit {qubit} onto outcome {outcome}: probability {probability:e}")]
    DegenerateMeasurement {
        qubit: usize,
        outcome: u8,
        probability: f64,
    },

    /// Engine used before `initialize`
    #[error("Register has not been initialized")]
    NotInitialized,

    /// Circuit document parse or format failure
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QuantumError {
    /// Create a qubit-out-of-range error
    pub fn qubit_out_of_range(index: usize, num_qubits: usize) -> Self {
        Self::QubitOutOfRange { index, num_qubits }
    }

    /// Create an arity mismatch error
    pub fn arity_mismatch(gate: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ArityMismatch {
            gate: gate.into(),
            expected,
            actual,
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownGate(_) => ErrorKind::UnknownGate,
            Self::ArityMismatch { .. } | Self::QubitOutOfRange { .. } | Self::DuplicateQubit(_) => {
                ErrorKind::InvalidTarget
            }
            Self::InvalidQubitCount { .. }
            | Self::StateLengthMismatch { .. }
            | Self::NotNormalized { .. } => ErrorKind::InvalidState,
            Self::DegenerateMeasurement { .. } => ErrorKind::DegenerateMeasurement,
            Self::NotInitialized => ErrorKind::NotInitialized,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

impl From<serde_json::Error> for QuantumError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_mismatch_message() {
        let err = QuantumError::arity_mismatch("CNOT", 2, 1);
        let msg = err.to_string();
        assert!(msg.contains("CNOT"));
        assert!(msg.contains('2'));
        assert!(msg.contains('1'));
        assert_eq!(err.kind(), ErrorKind::InvalidTarget);
    }

    #[test]
    fn test_out_of_range_message() {
        let err = QuantumError::qubit_out_of_range(5, 3);
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            QuantumError::UnknownGate("FOO".into()).kind(),
            ErrorKind::UnknownGate
        );
        assert_eq!(
            QuantumError::DuplicateQubit(QubitId::new(1)).kind(),
            ErrorKind::InvalidTarget
        );
        assert_eq!(
            QuantumError::StateLengthMismatch {
                expected: 4,
                actual: 3
            }
            .kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            QuantumError::NotNormalized { norm_squared: 2.0 }.kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            QuantumError::DegenerateMeasurement {
                qubit: 0,
                outcome: 1,
                probability: 0.0
            }
            .kind(),
            ErrorKind::DegenerateMeasurement
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let err: QuantumError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }
}
