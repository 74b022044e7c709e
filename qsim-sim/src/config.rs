//! Simulator configuration

use crate::error::{Result, SimulatorError};
use qsim_state::{
    DEFAULT_NORM_TOLERANCE, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_ZERO_PROBABILITY, MAX_QUBITS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the quantum simulator
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```
/// use qsim_sim::SimulatorConfig;
///
/// let config = SimulatorConfig::from_json(r#"{ "seed": 7, "shots": 200 }"#).unwrap();
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.max_qubits, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Largest register a session will initialize
    ///
    /// Each extra qubit doubles memory; the hard ceiling is
    /// [`MAX_QUBITS`](qsim_state::MAX_QUBITS).
    ///
    /// Default: 8
    pub max_qubits: usize,

    /// Minimum number of qubits to enable parallel gate application
    ///
    /// Smaller registers use the sequential sweep to avoid pool overhead.
    ///
    /// Default: 14
    pub parallel_threshold: usize,

    /// Number of shots used by `run_shots` callers that don't pass one
    ///
    /// Default: 1024
    pub shots: usize,

    /// Random number generator seed for reproducibility
    ///
    /// If None, each session seeds from OS entropy.
    ///
    /// Default: None (random)
    pub seed: Option<u64>,

    /// Allowed deviation of a custom initial state's squared norm from 1
    ///
    /// Default: 1e-9
    pub normalization_tolerance: f64,

    /// Outcome probabilities below this are treated as exactly zero
    ///
    /// Default: 1e-10
    pub zero_probability_epsilon: f64,

    /// Enable execution statistics collection
    ///
    /// Default: false
    pub collect_statistics: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: 8,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            shots: 1024,
            seed: None,
            normalization_tolerance: DEFAULT_NORM_TOLERANCE,
            zero_probability_epsilon: DEFAULT_ZERO_PROBABILITY,
            collect_statistics: false,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration optimized for speed
    ///
    /// Parallel sweeps start earlier and no statistics are kept.
    pub fn fast() -> Self {
        Self {
            parallel_threshold: 10,
            collect_statistics: false,
            ..Default::default()
        }
    }

    /// Create a configuration for sampling accuracy
    ///
    /// More shots and statistics collection.
    pub fn accurate() -> Self {
        Self {
            shots: 10_000,
            collect_statistics: true,
            ..Default::default()
        }
    }

    /// Create a configuration for debugging
    ///
    /// Statistics collection and a fixed seed.
    pub fn debug() -> Self {
        Self {
            collect_statistics: true,
            seed: Some(42),
            ..Default::default()
        }
    }

    /// Allow registers up to the state vector's hard limit
    pub fn large() -> Self {
        Self {
            max_qubits: MAX_QUBITS,
            ..Default::default()
        }
    }

    /// Set the largest register size
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Set the parallel threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Set the number of measurement shots
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Set the random seed for deterministic execution
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_normalization_tolerance(mut self, tolerance: f64) -> Self {
        self.normalization_tolerance = tolerance;
        self
    }

    pub fn with_zero_probability_epsilon(mut self, epsilon: f64) -> Self {
        self.zero_probability_epsilon = epsilon;
        self
    }

    /// Enable statistics collection
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.collect_statistics = enabled;
        self
    }

    /// Parse a configuration from a JSON object; missing keys take their
    /// defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| SimulatorError::InvalidConfig(e.to_string()))?;
        // serde would otherwise fill the struct positionally from an array
        if !value.is_object() {
            return Err(SimulatorError::InvalidConfig(
                "configuration must be a JSON object".to_string(),
            ));
        }
        let config: Self = serde_json::from_value(value)
            .map_err(|e| SimulatorError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SimulatorError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_qubits == 0 || self.max_qubits > MAX_QUBITS {
            return Err(SimulatorError::InvalidConfig(format!(
                "max_qubits must be in [1,{}], got {}",
                MAX_QUBITS, self.max_qubits
            )));
        }

        if self.shots == 0 {
            return Err(SimulatorError::InvalidConfig("shots must be > 0".to_string()));
        }

        if !(self.normalization_tolerance.is_finite() && self.normalization_tolerance > 0.0) {
            return Err(SimulatorError::InvalidConfig(format!(
                "normalization_tolerance must be positive, got {}",
                self.normalization_tolerance
            )));
        }

        let eps = self.zero_probability_epsilon;
        if !(eps > 0.0 && eps < 0.5) {
            return Err(SimulatorError::InvalidConfig(format!(
                "zero_probability_epsilon must be in (0,0.5), got {}",
                self.zero_probability_epsilon
            )));
        }

        Ok(())
    }

    /// Seed for the `index`-th independent session, if seeded
    pub(crate) fn session_seed(&self, index: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(index as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulatorConfig::default();
        assert_eq!(config.max_qubits, 8);
        assert_eq!(config.parallel_threshold, 14);
        assert_eq!(config.shots, 1024);
        assert_eq!(config.seed, None);
        assert_eq!(config.normalization_tolerance, 1e-9);
        assert_eq!(config.zero_probability_epsilon, 1e-10);
        assert!(!config.collect_statistics);
    }

    #[test]
    fn test_presets() {
        assert_eq!(SimulatorConfig::fast().parallel_threshold, 10);

        let accurate = SimulatorConfig::accurate();
        assert_eq!(accurate.shots, 10_000);
        assert!(accurate.collect_statistics);

        assert_eq!(SimulatorConfig::debug().seed, Some(42));
        assert_eq!(SimulatorConfig::large().max_qubits, MAX_QUBITS);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SimulatorConfig::new()
            .with_shots(2048)
            .with_max_qubits(12)
            .with_seed(42);

        assert_eq!(config.shots, 2048);
        assert_eq!(config.max_qubits, 12);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate() {
        assert!(SimulatorConfig::default().validate().is_ok());

        let invalid = SimulatorConfig {
            max_qubits: MAX_QUBITS + 1,
            ..Default::default()
        };
        assert!(invalid.validate().is_err());

        let invalid = SimulatorConfig {
            shots: 0,
            ..Default::default()
        };
        assert!(invalid.validate().is_err());

        for eps in [0.5, 0.0, -1e-10, f64::NAN] {
            let invalid = SimulatorConfig::default().with_zero_probability_epsilon(eps);
            assert!(invalid.validate().is_err(), "epsilon {} accepted", eps);
        }

        let invalid = SimulatorConfig {
            normalization_tolerance: f64::NAN,
            ..Default::default()
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = SimulatorConfig::from_json(r#"{"max_qubits": 10, "collect_statistics": true}"#)
            .unwrap();
        assert_eq!(config.max_qubits, 10);
        assert!(config.collect_statistics);
        assert_eq!(config.shots, 1024);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            SimulatorConfig::from_json(r#"{"shots": 0}"#),
            Err(SimulatorError::InvalidConfig(_))
        ));
        for json in ["[1, 2]", "[]", "8", "null", r#""max_qubits""#] {
            assert!(
                matches!(SimulatorConfig::from_json(json), Err(SimulatorError::InvalidConfig(_))),
                "{} accepted",
                json
            );
        }
        assert!(SimulatorConfig::from_json(r#"{"zero_probability_epsilon": 0.0}"#).is_err());
    }

    #[test]
    fn test_session_seed() {
        let config = SimulatorConfig::default().with_seed(u64::MAX);
        assert_eq!(config.session_seed(0), Some(u64::MAX));
        assert_eq!(config.session_seed(1), Some(0));
        assert_eq!(SimulatorConfig::default().session_seed(3), None);
    }
}
