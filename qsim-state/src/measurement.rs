//! Measurement records and shot sampling
//!
//! Single-qubit collapse lives on [`StateVector`](crate::StateVector); this
//! module holds what a measurement reports and the machinery for drawing many
//! full-register samples from a fixed distribution:
//! - [`QubitMeasurement`]: outcome and probability of one collapse
//! - [`SamplingResult`]: outcome counts over many shots
//! - [`AliasTable`]: O(1) sampling after O(2^n) setup

use qsim_core::{QuantumError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of measuring one qubit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QubitMeasurement {
    pub qubit: usize,
    /// 0 or 1
    pub outcome: u8,
    /// Probability the outcome had before collapse
    pub probability: f64,
}

/// Counts of full-register outcomes over a number of shots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingResult {
    /// Basis index -> number of shots that produced it
    pub counts: BTreeMap<usize, usize>,
    pub shots: usize,
}

impl SamplingResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one shot
    pub fn add_outcome(&mut self, outcome: usize) {
        *self.counts.entry(outcome).or_insert(0) += 1;
        self.shots += 1;
    }

    pub fn count(&self, outcome: usize) -> usize {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Observed frequency of an outcome
    pub fn frequency(&self, outcome: usize) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.count(outcome) as f64 / self.shots as f64
    }

    /// Outcomes by descending count, ties by ascending index
    pub fn sorted_outcomes(&self) -> Vec<(usize, usize)> {
        let mut outcomes: Vec<_> = self.counts.iter().map(|(&k, &v)| (k, v)).collect();
        outcomes.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        outcomes
    }

    /// Counts keyed by bitstring, qubit 0 first
    pub fn to_bitstring_counts(&self, num_qubits: usize) -> BTreeMap<String, usize> {
        self.counts
            .iter()
            .map(|(&outcome, &count)| (format!("{:0width$b}", outcome, width = num_qubits), count))
            .collect()
    }

    /// Fold another result into this one
    pub fn merge(&mut self, other: &SamplingResult) {
        for (&outcome, &count) in &other.counts {
            *self.counts.entry(outcome).or_insert(0) += count;
        }
        self.shots += other.shots;
    }
}

/// Walker's alias table over a discrete distribution
///
/// Reference: Walker, A. J. (1977). "An Efficient Method for Generating
/// Discrete Random Variables with General Distributions"
#[derive(Debug, Clone)]
pub struct AliasTable {
    /// Probability of keeping column `i` rather than taking its alias
    prob: Vec<f64>,
    alias: Vec<usize>,
}

impl AliasTable {
    /// Build a table from non-negative weights
    ///
    /// Weights are normalized by their sum, so a state's probabilities can be
    /// passed directly even with rounding drift.
    pub fn new(weights: &[f64]) -> Result<Self> {
        let n = weights.len();
        let total: f64 = weights.iter().sum();
        if n == 0 || total.is_nan() || total <= 0.0 {
            return Err(QuantumError::NotNormalized {
                norm_squared: total,
            });
        }

        let mut scaled: Vec<f64> = weights.iter().map(|&w| w * n as f64 / total).collect();
        let mut prob = vec![1.0; n];
        let mut alias: Vec<usize> = (0..n).collect();

        let (mut small, mut large): (Vec<usize>, Vec<usize>) = (0..n).partition(|&i| scaled[i] < 1.0);

        while let (Some(&s), Some(&l)) = (small.last(), large.last()) {
            small.pop();
            large.pop();

            prob[s] = scaled[s];
            alias[s] = l;
            scaled[l] = (scaled[l] + scaled[s]) - 1.0;

            if scaled[l] < 1.0 {
                small.push(l);
            } else {
                large.push(l);
            }
        }
        // leftovers in either list keep prob = 1 (rounding residue)

        Ok(Self { prob, alias })
    }

    /// Number of outcomes
    pub fn len(&self) -> usize {
        self.prob.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prob.is_empty()
    }

    /// Draw one outcome
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let column = rng.gen_range(0..self.prob.len());
        if rng.gen::<f64>() < self.prob[column] {
            column
        } else {
            self.alias[column]
        }
    }

    /// Draw `shots` outcomes
    pub fn sample_many<R: Rng + ?Sized>(&self, shots: usize, rng: &mut R) -> SamplingResult {
        let mut result = SamplingResult::new();
        for _ in 0..shots {
            result.add_outcome(self.sample(rng));
        }
        result
    }
}
