//! Error types for the simulator

use qsim_core::{ErrorKind, QuantumError};
use thiserror::Error;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;

/// Errors that can occur during simulation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulatorError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A circuit operation failed; later operations were not run
    #[error("Operation {index} failed: {source}")]
    Operation {
        index: usize,
        #[source]
        source: QuantumError,
    },

    /// Failure outside any single operation, such as register setup
    #[error(transparent)]
    Core(#[from] QuantumError),
}

impl SimulatorError {
    /// Category of the underlying engine error, if there is one
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::InvalidConfig(_) => None,
            Self::Operation { source, .. } | Self::Core(source) => Some(source.kind()),
        }
    }

    /// Index of the failing operation
    pub fn operation_index(&self) -> Option<usize> {
        match self {
            Self::Operation { index, .. } => Some(*index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_error() {
        let err = SimulatorError::Operation {
            index: 3,
            source: QuantumError::UnknownGate("FOO".into()),
        };
        assert_eq!(err.operation_index(), Some(3));
        assert_eq!(err.kind(), Some(ErrorKind::UnknownGate));
        let msg = err.to_string();
        assert!(msg.contains("Operation 3"));
        assert!(msg.contains("FOO"));
    }

    #[test]
    fn test_core_conversion() {
        let err: SimulatorError = QuantumError::NotInitialized.into();
        assert_eq!(err.kind(), Some(ErrorKind::NotInitialized));
        assert_eq!(err.operation_index(), None);
        assert_eq!(SimulatorError::InvalidConfig("x".into()).kind(), None);
    }
}
