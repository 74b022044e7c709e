//! Circuit engine session
//!
//! An [`Engine`] owns one register and one random source. It starts
//! uninitialized; [`Engine::initialize`] allocates the register (and resets
//! it on later calls), after which gates and measurements update it in place.
//! Every operation validates its arguments before touching the amplitudes, so
//! a failed call leaves the register as it was.

use crate::config::SimulatorConfig;
use num_complex::Complex64;
use qsim_core::{QuantumError, Result};
use qsim_state::{AliasTable, QubitMeasurement, SamplingResult, StateVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// One simulation session
///
/// # Example
///
/// ```
/// use qsim_sim::{Engine, SimulatorConfig};
///
/// let mut engine = Engine::new(SimulatorConfig::default().with_seed(1));
/// engine.initialize(2, None).unwrap();
/// engine.apply_gate("H", &[0usize]).unwrap();
/// engine.apply_gate("CNOT", &[0usize, 1]).unwrap();
///
/// let p = engine.probabilities().unwrap();
/// assert!((p[0] - 0.5).abs() < 1e-12);
/// assert!((p[3] - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct Engine {
    config: SimulatorConfig,
    state: Option<StateVector>,
    rng: StdRng,
}

impl Engine {
    /// Create an uninitialized session
    ///
    /// The RNG is seeded from `config.seed`, or from OS entropy when unset.
    pub fn new(config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Create a session drawing from the given generator
    pub fn with_rng(config: SimulatorConfig, rng: StdRng) -> Self {
        Self {
            config,
            state: None,
            rng,
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Restart the random source from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Allocate a register of `num_qubits`, as |0...0⟩ or a custom state
    ///
    /// Any previous register is replaced, but only once the new one has been
    /// validated.
    ///
    /// # Errors
    /// `InvalidQubitCount` above `config.max_qubits`; `StateLengthMismatch`
    /// or `NotNormalized` for a bad custom state.
    pub fn initialize(&mut self, num_qubits: usize, initial_state: Option<&[Complex64]>) -> Result<()> {
        if num_qubits == 0 || num_qubits > self.config.max_qubits {
            return Err(QuantumError::InvalidQubitCount {
                num_qubits,
                max: self.config.max_qubits,
            });
        }

        let state = match initial_state {
            Some(amplitudes) => StateVector::from_amplitudes(
                num_qubits,
                amplitudes.to_vec(),
                self.config.normalization_tolerance,
            )?,
            None => StateVector::new(num_qubits)?,
        };

        debug!(
            num_qubits,
            custom = initial_state.is_some(),
            "register initialized"
        );
        self.state = Some(state.with_parallel_threshold(self.config.parallel_threshold));
        Ok(())
    }

    /// Apply a catalog gate
    ///
    /// Controls come first in `targets`, then the target qubit.
    ///
    /// # Errors
    /// `NotInitialized`, `UnknownGate`, `ArityMismatch`, `QubitOutOfRange`
    /// or `DuplicateQubit`.
    pub fn apply_gate<Q: Copy + Into<usize>>(&mut self, name: &str, targets: &[Q]) -> Result<()> {
        let state = self.state.as_mut().ok_or(QuantumError::NotInitialized)?;
        let gate = qsim_gates::lookup(name)?;
        gate.check_arity(targets.len())?;
        state.apply(gate.matrix, targets)?;
        debug!(gate = gate.name, arity = targets.len(), "gate applied");
        Ok(())
    }

    /// Measure one qubit and return the outcome with a snapshot of the
    /// collapsed amplitudes
    pub fn measure(&mut self, qubit: usize) -> Result<(QubitMeasurement, Vec<Complex64>)> {
        let record = self.measure_in_place(qubit)?;
        let snapshot = self.amplitudes()?.to_vec();
        Ok((record, snapshot))
    }

    /// Measure one qubit using the session's own random source
    pub fn measure_in_place(&mut self, qubit: usize) -> Result<QubitMeasurement> {
        let epsilon = self.config.zero_probability_epsilon;
        let state = self.state.as_mut().ok_or(QuantumError::NotInitialized)?;
        measure_state(state, qubit, epsilon, &mut self.rng)
    }

    /// Measure one qubit with a caller-supplied random source
    pub fn measure_with<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> Result<QubitMeasurement> {
        let epsilon = self.config.zero_probability_epsilon;
        let state = self.state.as_mut().ok_or(QuantumError::NotInitialized)?;
        measure_state(state, qubit, epsilon, rng)
    }

    /// Draw `shots` full-register outcomes without collapsing the register
    pub fn sample(&mut self, shots: usize) -> Result<SamplingResult> {
        let state = self.state.as_ref().ok_or(QuantumError::NotInitialized)?;
        let table = AliasTable::new(&state.probabilities())?;
        Ok(table.sample_many(shots, &mut self.rng))
    }

    pub fn state(&self) -> Result<&StateVector> {
        self.state.as_ref().ok_or(QuantumError::NotInitialized)
    }

    /// Hand the register over, leaving the session uninitialized
    pub fn take_state(&mut self) -> Option<StateVector> {
        self.state.take()
    }

    pub fn amplitudes(&self) -> Result<&[Complex64]> {
        Ok(self.state()?.amplitudes())
    }

    pub fn probabilities(&self) -> Result<Vec<f64>> {
        Ok(self.state()?.probabilities())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

fn measure_state<R: Rng + ?Sized>(
    state: &mut StateVector,
    qubit: usize,
    epsilon: f64,
    rng: &mut R,
) -> Result<QubitMeasurement> {
    let p0 = state.probability_of(qubit, 0)?;
    let p1 = state.probability_of(qubit, 1)?;
    let smaller = p0.min(p1);
    if smaller > 0.0 && smaller < epsilon {
        warn!(qubit, probability = smaller, "near-degenerate outcome treated as impossible");
    }

    let record = state.measure_qubit(qubit, rng.gen::<f64>(), epsilon)?;
    debug!(
        qubit,
        outcome = record.outcome,
        probability = record.probability,
        "qubit measured"
    );
    Ok(record)
}
