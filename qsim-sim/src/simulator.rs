//! Core simulator implementation

use num_complex::Complex64;
use qsim_core::{Circuit, Operation, QuantumError};
use qsim_state::{QubitMeasurement, StateVector};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

use crate::{
    config::SimulatorConfig,
    engine::Engine,
    error::{Result, SimulatorError},
    result::{bitstring, classical_register, MeasurementCounts, SimulationResult, StepSnapshot},
    statistics::ExecutionStatistics,
};

/// Quantum circuit simulator
///
/// Runs [`Circuit`] descriptors through fresh [`Engine`] sessions. Each run
/// executes the operations in order; the first failing operation aborts the
/// run and is reported with its index.
///
/// # Example
///
/// ```
/// use qsim_core::Circuit;
/// use qsim_sim::{Simulator, SimulatorConfig};
///
/// let simulator = Simulator::new(SimulatorConfig::default().with_seed(7)).unwrap();
///
/// let mut circuit = Circuit::new(2);
/// circuit.gate("H", &[0]).gate("CNOT", &[0, 1]);
///
/// let result = simulator.run(&circuit).unwrap();
/// let p = result.probabilities();
/// assert!((p[0] - 0.5).abs() < 1e-12);
/// assert!((p[3] - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a new simulator with the given configuration
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration does not validate.
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the simulator configuration
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run a quantum circuit simulation
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The register is too large or the initial state is malformed
    /// - An operation fails (`SimulatorError::Operation` with its index)
    pub fn run(&self, circuit: &Circuit) -> Result<SimulationResult> {
        self.run_session(circuit, 0)
    }

    /// Run in step mode
    ///
    /// Returns the initial state followed by one snapshot per operation.
    pub fn run_steps(&self, circuit: &Circuit) -> Result<Vec<StepSnapshot>> {
        let mut engine = self.session(0);
        self.initialize(&mut engine, circuit)?;

        let mut snapshots = Vec::with_capacity(circuit.len() + 1);
        snapshots.push(StepSnapshot {
            step: 0,
            operation: None,
            measurement: None,
            state: engine.state()?.clone(),
        });

        self.execute(&mut engine, circuit, None, |index, op, measurement, state| {
            snapshots.push(StepSnapshot {
                step: index + 1,
                operation: Some(op.clone()),
                measurement,
                state: state.clone(),
            });
        })?;

        Ok(snapshots)
    }

    /// Run a circuit `shots` times and count classical outcomes
    ///
    /// A circuit without measurements is simulated once and its final
    /// distribution sampled; otherwise each shot re-runs the circuit and
    /// records the classical register, qubit 0's last outcome first.
    pub fn run_shots(&self, circuit: &Circuit, shots: usize) -> Result<MeasurementCounts> {
        if shots == 0 {
            return Err(SimulatorError::InvalidConfig("shots must be > 0".to_string()));
        }

        let start = Instant::now();
        let num_qubits = circuit.num_qubits();
        let mut engine = self.session(0);

        let counts = if circuit.has_measurements() {
            let mut counts = MeasurementCounts::new();
            for _ in 0..shots {
                self.initialize(&mut engine, circuit)?;
                let measurements = self.execute(&mut engine, circuit, None, |_, _, _, _| {})?;
                let register = classical_register(&measurements, num_qubits);
                counts.add(bitstring(register, num_qubits), 1);
            }
            counts
        } else {
            self.initialize(&mut engine, circuit)?;
            self.execute(&mut engine, circuit, None, |_, _, _, _| {})?;
            let sampling = engine.sample(shots)?;
            MeasurementCounts::from_sampling(&sampling, num_qubits)
        };

        info!(
            num_qubits,
            shots,
            outcomes = counts.num_outcomes(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "shots complete"
        );
        Ok(counts)
    }

    /// Run independent circuits in parallel
    ///
    /// Each circuit gets its own session; when seeded, circuit `i` uses
    /// `seed + i` so results don't depend on scheduling.
    pub fn run_batch(&self, circuits: &[Circuit]) -> Vec<Result<SimulationResult>> {
        circuits
            .par_iter()
            .enumerate()
            .map(|(index, circuit)| self.run_session(circuit, index))
            .collect()
    }

    fn session(&self, index: usize) -> Engine {
        let config = SimulatorConfig {
            seed: self.config.session_seed(index),
            ..self.config.clone()
        };
        Engine::new(config)
    }

    fn run_session(&self, circuit: &Circuit, index: usize) -> Result<SimulationResult> {
        let total_start = Instant::now();
        let num_qubits = circuit.num_qubits();

        let mut stats = if self.config.collect_statistics {
            Some(ExecutionStatistics::new())
        } else {
            None
        };

        let mut engine = self.session(index);

        let init_start = Instant::now();
        self.initialize(&mut engine, circuit)?;
        if let Some(s) = stats.as_mut() {
            s.initialization_time = init_start.elapsed();
        }

        let measurements = self.execute(&mut engine, circuit, stats.as_mut(), |_, _, _, _| {})?;
        let state = engine.take_state().ok_or(QuantumError::NotInitialized)?;

        info!(
            num_qubits,
            operations = circuit.len(),
            measurements = measurements.len(),
            elapsed_us = total_start.elapsed().as_micros() as u64,
            "circuit simulated"
        );

        let mut result = SimulationResult::new(state, measurements);
        if let Some(mut s) = stats {
            s.peak_memory_bytes = result.state.dimension() * std::mem::size_of::<Complex64>();
            s.final_norm_squared = result.state.norm_squared();
            s.total_time = total_start.elapsed();
            result = result.with_statistics(s);
        }

        Ok(result)
    }

    fn initialize(&self, engine: &mut Engine, circuit: &Circuit) -> Result<()> {
        engine.initialize(circuit.num_qubits(), circuit.initial_state())?;
        Ok(())
    }

    /// Execute every operation in order, calling `observe` after each one
    fn execute<F>(
        &self,
        engine: &mut Engine,
        circuit: &Circuit,
        mut stats: Option<&mut ExecutionStatistics>,
        mut observe: F,
    ) -> Result<Vec<QubitMeasurement>>
    where
        F: FnMut(usize, &Operation, Option<QubitMeasurement>, &StateVector),
    {
        let parallel = circuit.num_qubits() >= self.config.parallel_threshold;
        let mut measurements = Vec::new();

        for (index, op) in circuit.operations().iter().enumerate() {
            let op_start = Instant::now();

            let measurement = match op {
                Operation::ApplyGate { gate, targets } => {
                    engine
                        .apply_gate(gate, targets.as_slice())
                        .map_err(|source| SimulatorError::Operation { index, source })?;
                    if let Some(s) = stats.as_deref_mut() {
                        s.gate_application_time += op_start.elapsed();
                        s.gates_applied += 1;
                        s.parallel_gates += usize::from(parallel);
                    }
                    None
                }
                Operation::Measure { qubit } => {
                    let record = engine
                        .measure_in_place(qubit.index())
                        .map_err(|source| SimulatorError::Operation { index, source })?;
                    if let Some(s) = stats.as_deref_mut() {
                        s.measurement_time += op_start.elapsed();
                        s.measurements += 1;
                    }
                    measurements.push(record);
                    Some(record)
                }
            };

            debug!(index, operation = %op, "operation complete");
            observe(index, op, measurement, engine.state()?);
        }

        Ok(measurements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qsim_core::ErrorKind;

    fn seeded() -> Simulator {
        Simulator::new(SimulatorConfig::default().with_seed(42)).unwrap()
    }

    #[test]
    fn test_simulator_creation() {
        let sim = Simulator::new(SimulatorConfig::default()).unwrap();
        assert_eq!(sim.config().shots, 1024);

        let bad = SimulatorConfig::default().with_shots(0);
        assert!(matches!(Simulator::new(bad), Err(SimulatorError::InvalidConfig(_))));
    }

    #[test]
    fn test_simple_circuit() {
        let mut circuit = Circuit::new(2);
        circuit.gate("H", &[0]).gate("CNOT", &[0, 1]);

        let result = seeded().run(&circuit).unwrap();
        assert_eq!(result.num_qubits(), 2);
        assert!(result.measurements.is_empty());
        assert!(result.statistics.is_none());
    }

    #[test]
    fn test_empty_circuit_returns_initial_state() {
        let result = seeded().run(&Circuit::new(2)).unwrap();
        assert_relative_eq!(result.probabilities()[0], 1.0);
    }

    #[test]
    fn test_too_many_qubits() {
        let sim = Simulator::new(SimulatorConfig::default().with_max_qubits(4)).unwrap();
        let err = sim.run(&Circuit::new(5)).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::InvalidState));
        assert_eq!(err.operation_index(), None);
    }

    #[test]
    fn test_with_statistics() {
        let sim = Simulator::new(SimulatorConfig::debug()).unwrap();

        let mut circuit = Circuit::new(2);
        circuit.gate("X", &[0]).gate("H", &[1]).measure(1);

        let result = sim.run(&circuit).unwrap();
        let stats = result.statistics.unwrap();
        assert_eq!(stats.gates_applied, 2);
        assert_eq!(stats.measurements, 1);
        assert_eq!(stats.parallel_gates, 0);
        assert_eq!(stats.peak_memory_bytes, 4 * 16);
        assert_relative_eq!(stats.final_norm_squared, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_steps_include_initial_state() {
        let mut circuit = Circuit::new(2);
        circuit.gate("H", &[0]).gate("CNOT", &[0, 1]).measure(0);

        let steps = seeded().run_steps(&circuit).unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].label(), "initial");
        assert_eq!(steps[1].label(), "H q0");
        assert!(steps[3].measurement.is_some());
        // H on qubit 0 splits |00⟩ and |10⟩
        assert_relative_eq!(steps[1].probabilities()[0b10], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_shots_without_measurement_sample_distribution() {
        let mut circuit = Circuit::new(2);
        circuit.gate("H", &[0]).gate("CNOT", &[0, 1]);

        let counts = seeded().run_shots(&circuit, 2000).unwrap();
        assert_eq!(counts.total_shots(), 2000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
        assert!((counts.probability("00") - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_shots_with_measurement_count_register() {
        let mut circuit = Circuit::new(2);
        circuit.gate("X", &[1]).measure(1);

        let counts = seeded().run_shots(&circuit, 50).unwrap();
        assert_eq!(counts.get("01"), 50);
    }

    #[test]
    fn test_zero_shots_rejected() {
        assert!(seeded().run_shots(&Circuit::new(1), 0).is_err());
    }

    #[test]
    fn test_batch_keeps_order() {
        let circuits: Vec<Circuit> = (0..4)
            .map(|q| {
                let mut c = Circuit::new(4);
                c.gate("X", &[q]);
                c
            })
            .collect();

        let results = seeded().run_batch(&circuits);
        for (q, result) in results.into_iter().enumerate() {
            let (index, p) = result.unwrap().most_likely();
            assert_eq!(index, 0b1000 >> q);
            assert_relative_eq!(p, 1.0);
        }
    }
}
