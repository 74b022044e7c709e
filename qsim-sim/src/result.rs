//! Simulation result types

use num_complex::Complex64;
use qsim_core::{Operation, QubitId};
use qsim_state::{BlochVector, QubitMeasurement, SamplingResult, StateVector};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::statistics::ExecutionStatistics;

/// Result of a quantum circuit simulation
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Final quantum state after all operations have run
    pub state: StateVector,

    /// Mid-circuit measurement outcomes, in the order they happened
    pub measurements: Vec<QubitMeasurement>,

    /// Execution statistics (if statistics collection was enabled)
    pub statistics: Option<ExecutionStatistics>,
}

impl SimulationResult {
    /// Create a new simulation result
    pub fn new(state: StateVector, measurements: Vec<QubitMeasurement>) -> Self {
        Self {
            state,
            measurements,
            statistics: None,
        }
    }

    /// Add execution statistics to the result
    pub fn with_statistics(mut self, stats: ExecutionStatistics) -> Self {
        self.statistics = Some(stats);
        self
    }

    /// Get the number of qubits in the final state
    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        self.state.amplitudes()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.state.probabilities()
    }

    /// Classical register, read like a basis index: qubit 0's last outcome
    /// is the most-significant bit
    pub fn classical_register(&self) -> usize {
        classical_register(&self.measurements, self.num_qubits())
    }

    /// Last outcome recorded for a qubit
    pub fn outcome_of(&self, qubit: usize) -> Option<u8> {
        self.measurements
            .iter()
            .rev()
            .find(|m| m.qubit == qubit)
            .map(|m| m.outcome)
    }

    /// Basis index with the highest probability; ties go to the lower index
    pub fn most_likely(&self) -> (usize, f64) {
        self.probabilities()
            .into_iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, p)| if p > best.1 { (i, p) } else { best })
    }

    /// Serializable summary of the run
    pub fn report(&self) -> RunReport {
        let n = self.num_qubits();
        RunReport {
            num_qubits: n,
            amplitudes: self
                .amplitudes()
                .iter()
                .enumerate()
                .map(|(i, &amplitude)| AmplitudeEntry {
                    basis: bitstring(i, n),
                    amplitude,
                    probability: amplitude.norm_sqr(),
                })
                .collect(),
            measurements: self.measurements.clone(),
            classical_register: bitstring(self.classical_register(), n),
            bloch_vectors: self.state.bloch_vectors(),
            statistics: self.statistics.clone(),
        }
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final state: {}", self.state)?;
        for m in &self.measurements {
            writeln!(
                f,
                "  measured q{} -> {} (p = {:.4})",
                m.qubit, m.outcome, m.probability
            )?;
        }
        Ok(())
    }
}

/// One basis state of a [`RunReport`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmplitudeEntry {
    /// Bitstring, qubit 0 first
    pub basis: String,
    /// Serialized as `[re, im]`
    pub amplitude: Complex64,
    pub probability: f64,
}

/// JSON-friendly view of a [`SimulationResult`]
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub num_qubits: usize,
    pub amplitudes: Vec<AmplitudeEntry>,
    pub measurements: Vec<QubitMeasurement>,
    pub classical_register: String,
    pub bloch_vectors: Vec<BlochVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ExecutionStatistics>,
}

/// Register state after one step of a step-mode run
#[derive(Debug, Clone)]
pub struct StepSnapshot {
    /// 0 for the initial state, then one per operation
    pub step: usize,
    /// Operation that produced this state; None for the initial state
    pub operation: Option<Operation>,
    /// Outcome, when the operation was a measurement
    pub measurement: Option<QubitMeasurement>,
    pub state: StateVector,
}

impl StepSnapshot {
    pub fn amplitudes(&self) -> &[Complex64] {
        self.state.amplitudes()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.state.probabilities()
    }

    /// Per-qubit Bloch vectors at this step
    pub fn bloch_vectors(&self) -> Vec<BlochVector> {
        self.state.bloch_vectors()
    }

    /// "initial", or the operation as text
    pub fn label(&self) -> String {
        match &self.operation {
            Some(op) => op.to_string(),
            None => "initial".to_string(),
        }
    }
}

impl fmt::Display for StepSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.step, self.label(), self.state)?;
        if let Some(m) = &self.measurement {
            write!(f, "  (outcome {})", m.outcome)?;
        }
        Ok(())
    }
}

/// Measurement outcome counts
///
/// Maps bitstrings (qubit 0 first) to the number of times they were
/// observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementCounts {
    /// Map from bitstring to count
    counts: BTreeMap<String, usize>,
    /// Total number of shots
    total_shots: usize,
}

impl MeasurementCounts {
    /// Create an empty counts object
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
            total_shots: 0,
        }
    }

    /// Create from a counts map
    pub fn from_counts(counts: BTreeMap<String, usize>) -> Self {
        let total_shots = counts.values().sum();
        Self {
            counts,
            total_shots,
        }
    }

    /// Convert basis-index samples to bitstring counts
    pub fn from_sampling(result: &SamplingResult, num_qubits: usize) -> Self {
        Self {
            counts: result.to_bitstring_counts(num_qubits),
            total_shots: result.shots,
        }
    }

    /// Add `count` observations of a bitstring
    pub fn add(&mut self, bitstring: String, count: usize) {
        *self.counts.entry(bitstring).or_insert(0) += count;
        self.total_shots += count;
    }

    /// Get the count for a specific bitstring
    pub fn get(&self, bitstring: &str) -> usize {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Get the observed frequency of a specific bitstring
    pub fn probability(&self, bitstring: &str) -> f64 {
        if self.total_shots == 0 {
            0.0
        } else {
            self.get(bitstring) as f64 / self.total_shots as f64
        }
    }

    /// Get all bitstrings that were observed
    pub fn bitstrings(&self) -> impl Iterator<Item = &String> {
        self.counts.keys()
    }

    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    pub fn total_shots(&self) -> usize {
        self.total_shots
    }

    /// Get number of unique outcomes observed
    pub fn num_outcomes(&self) -> usize {
        self.counts.len()
    }

    /// Get the most common outcome; ties go to the smaller bitstring
    pub fn most_common(&self) -> Option<(&String, usize)> {
        self.sorted().into_iter().next()
    }

    /// Get outcomes sorted by frequency (descending)
    pub fn sorted(&self) -> Vec<(&String, usize)> {
        let mut sorted: Vec<_> = self.counts.iter().map(|(bs, &count)| (bs, count)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    /// Convert to a probability distribution
    pub fn to_probabilities(&self) -> BTreeMap<String, f64> {
        self.counts
            .keys()
            .map(|bs| (bs.clone(), self.probability(bs)))
            .collect()
    }
}

impl Default for MeasurementCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MeasurementCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Measurement Counts ({} shots):", self.total_shots)?;

        let sorted = self.sorted();
        for (bitstring, count) in sorted.iter().take(16) {
            let prob = *count as f64 / self.total_shots as f64;
            writeln!(f, "  {}: {} ({:.2}%)", bitstring, count, prob * 100.0)?;
        }

        if sorted.len() > 16 {
            writeln!(f, "  ... and {} more outcomes", sorted.len() - 16)?;
        }

        Ok(())
    }
}

pub(crate) fn classical_register(measurements: &[QubitMeasurement], num_qubits: usize) -> usize {
    measurements.iter().fold(0, |register, m| {
        let mask = QubitId::new(m.qubit).mask(num_qubits);
        if m.outcome == 1 {
            register | mask
        } else {
            register & !mask
        }
    })
}

pub(crate) fn bitstring(value: usize, num_qubits: usize) -> String {
    format!("{:0width$b}", value, width = num_qubits)
}
