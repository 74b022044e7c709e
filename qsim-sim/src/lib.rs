//! Quantum circuit simulator
//!
//! This crate runs circuits against the dense state vector from
//! `qsim-state`, using gates from the `qsim-gates` catalog.
//!
//! # Features
//!
//! - **Engine sessions**: initialize a register, apply named gates, measure
//! - **Circuit runs**: whole-circuit execution with per-operation error indices
//! - **Step mode**: a snapshot of the register after every operation
//! - **Shot sampling**: alias-table sampling or per-shot re-simulation
//! - **Batches**: independent circuits simulated in parallel on rayon
//! - **Telemetry**: `tracing` events and optional execution statistics
//!
//! # Example
//!
//! ```
//! use qsim_core::Circuit;
//! use qsim_sim::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig {
//!     seed: Some(1),
//!     shots: 500,
//!     ..Default::default()
//! };
//! let simulator = Simulator::new(config).unwrap();
//!
//! let mut circuit = Circuit::new(2);
//! circuit.gate("H", &[0]).gate("CNOT", &[0, 1]);
//!
//! let counts = simulator.run_shots(&circuit, simulator.config().shots).unwrap();
//! assert_eq!(counts.get("01") + counts.get("10"), 0);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod result;
pub mod simulator;
pub mod statistics;

pub use config::SimulatorConfig;
pub use engine::Engine;
pub use error::{Result, SimulatorError};
pub use result::{AmplitudeEntry, MeasurementCounts, RunReport, SimulationResult, StepSnapshot};
pub use simulator::Simulator;
pub use statistics::ExecutionStatistics;
