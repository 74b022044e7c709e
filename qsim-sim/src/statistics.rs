//! Execution statistics tracking

use serde::Serialize;
use std::time::Duration;

/// Execution statistics for a simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionStatistics {
    /// Total execution time
    pub total_time: Duration,

    /// Time spent initializing state
    pub initialization_time: Duration,

    /// Time spent applying gates
    pub gate_application_time: Duration,

    /// Time spent on measurements
    pub measurement_time: Duration,

    /// Number of gates applied
    pub gates_applied: usize,

    /// Number of gates applied on the rayon pool
    pub parallel_gates: usize,

    /// Number of mid-circuit measurements
    pub measurements: usize,

    /// Register size in bytes (2^n amplitudes, 16 bytes each)
    pub peak_memory_bytes: usize,

    /// Squared norm of the final state
    pub final_norm_squared: f64,
}

impl ExecutionStatistics {
    /// Create a new statistics object
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the gate execution rate (gates per second)
    pub fn gates_per_second(&self) -> f64 {
        let secs = self.gate_application_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.gates_applied as f64 / secs
        }
    }

    /// Fraction of gates that ran in parallel
    pub fn parallel_fraction(&self) -> f64 {
        if self.gates_applied == 0 {
            0.0
        } else {
            self.parallel_gates as f64 / self.gates_applied as f64
        }
    }

    /// Get peak memory usage in MB
    pub fn peak_memory_mb(&self) -> f64 {
        self.peak_memory_bytes as f64 / 1_000_000.0
    }
}

impl std::fmt::Display for ExecutionStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Execution Statistics:")?;
        writeln!(f, "  Total time: {:?}", self.total_time)?;
        writeln!(f, "    Initialization: {:?}", self.initialization_time)?;
        writeln!(f, "    Gate application: {:?}", self.gate_application_time)?;
        writeln!(f, "    Measurement: {:?}", self.measurement_time)?;

        writeln!(f, "\n  Operations:")?;
        writeln!(
            f,
            "    Gates: {} ({:.1}% parallel)",
            self.gates_applied,
            self.parallel_fraction() * 100.0
        )?;
        writeln!(f, "    Measurements: {}", self.measurements)?;
        writeln!(f, "    Execution rate: {:.0} gates/sec", self.gates_per_second())?;

        writeln!(f, "\n  State:")?;
        writeln!(f, "    Memory: {:.2} MB", self.peak_memory_mb())?;
        writeln!(f, "    Final norm²: {:.12}", self.final_norm_squared)?;

        Ok(())
    }
}
