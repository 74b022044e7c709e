//! QSim - state vector quantum circuit simulator
//! Command-line interface for running circuit documents and exchanging them with Qiskit

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use qsim_core::serialization::{CircuitDocument, QiskitExporter, QiskitImporter};
use qsim_core::Circuit;
use qsim_sim::{Simulator, SimulatorConfig};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qsim")]
#[command(version)]
#[command(about = "QSim - state vector quantum circuit simulator", long_about = None)]
struct Cli {
    /// Simulator configuration file (JSON)
    #[arg(short, long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a circuit document and print the final state
    Run {
        /// Circuit document (.json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the register after every operation
        #[arg(long)]
        steps: bool,

        /// Seed for measurement randomness
        #[arg(long)]
        seed: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a circuit repeatedly and count classical outcomes
    Shots {
        /// Circuit document (.json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of shots (defaults to the configured value)
        #[arg(short = 'n', long)]
        shots: Option<usize>,

        /// Seed for measurement randomness
        #[arg(long)]
        seed: Option<u64>,

        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a Qiskit Python script from a circuit document
    ExportQiskit {
        /// Circuit document (.json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output script (.py); stdout if omitted
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Leave out the circuit drawing
        #[arg(long)]
        no_visualization: bool,
    },

    /// Read a Qiskit Python script into a circuit document
    ImportQiskit {
        /// Qiskit script (.py)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output document (.json); stdout if omitted
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// List the gate catalog
    Gates,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = dispatch(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "qsim_sim=debug,qsim_cli=debug,info",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            file,
            steps,
            seed,
            json,
        } => run_command(&file, with_seed(config, seed), steps, json),
        Commands::Shots {
            file,
            shots,
            seed,
            json,
        } => shots_command(&file, with_seed(config, seed), shots, json),
        Commands::ExportQiskit {
            file,
            output,
            no_visualization,
        } => export_command(&file, output.as_deref(), !no_visualization),
        Commands::ImportQiskit { file, output } => import_command(&file, output.as_deref()),
        Commands::Gates => {
            gates_command();
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SimulatorConfig> {
    match path {
        Some(path) => {
            let config = SimulatorConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => Ok(SimulatorConfig::default()),
    }
}

fn with_seed(config: SimulatorConfig, seed: Option<u64>) -> SimulatorConfig {
    match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    }
}

fn load_circuit(file: &Path) -> Result<Circuit> {
    let document = CircuitDocument::load(file)
        .with_context(|| format!("reading circuit document {}", file.display()))?;
    let circuit = document
        .into_circuit()
        .with_context(|| format!("converting {}", file.display()))?;
    info!(
        num_qubits = circuit.num_qubits(),
        operations = circuit.len(),
        "circuit loaded"
    );
    Ok(circuit)
}

fn run_command(file: &Path, config: SimulatorConfig, steps: bool, json: bool) -> Result<()> {
    let circuit = load_circuit(file)?;
    let simulator = Simulator::new(config)?;

    if steps {
        let snapshots = simulator.run_steps(&circuit)?;
        if json {
            let entries: Vec<_> = snapshots
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "step": s.step,
                        "operation": s.label(),
                        "amplitudes": s.amplitudes(),
                        "probabilities": s.probabilities(),
                        "measurement": s.measurement,
                        "bloch_vectors": s.bloch_vectors(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            for snapshot in &snapshots {
                println!("{}", snapshot);
                for (q, v) in snapshot.bloch_vectors().iter().enumerate() {
                    println!("    q{}: {}", q, v.describe());
                }
            }
        }
        return Ok(());
    }

    let result = simulator.run(&circuit)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result.report())?);
        return Ok(());
    }

    print!("{}", result);
    println!("\nProbabilities:");
    for (i, p) in result.probabilities().iter().enumerate() {
        if *p > simulator.config().zero_probability_epsilon {
            println!("  {}  {:.6}", result.state.basis_label(i), p);
        }
    }
    println!("\nBloch vectors:");
    for (q, v) in result.state.bloch_vectors().iter().enumerate() {
        println!("  q{}: {}", q, v.describe());
    }
    if let Some(stats) = &result.statistics {
        println!("\n{}", stats);
    }
    Ok(())
}

fn shots_command(
    file: &Path,
    config: SimulatorConfig,
    shots: Option<usize>,
    json: bool,
) -> Result<()> {
    let circuit = load_circuit(file)?;
    let shots = shots.unwrap_or(config.shots);
    if shots == 0 {
        bail!("--shots must be at least 1");
    }

    let simulator = Simulator::new(config)?;
    let counts = simulator.run_shots(&circuit, shots)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        print!("{}", counts);
    }
    Ok(())
}

fn export_command(file: &Path, output: Option<&Path>, visualization: bool) -> Result<()> {
    let document = CircuitDocument::load(file)
        .with_context(|| format!("reading circuit document {}", file.display()))?;
    let exporter = QiskitExporter::new(&document).with_visualization(visualization);

    match output {
        Some(path) => {
            exporter
                .export(path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Qiskit script written to {}", path.display());
        }
        None => print!("{}", exporter.generate()),
    }
    Ok(())
}

fn import_command(file: &Path, output: Option<&Path>) -> Result<()> {
    let mut importer = QiskitImporter::new();
    let document = importer
        .import(file)
        .with_context(|| format!("importing {}", file.display()))?;
    for warning in importer.warnings() {
        warn!(file = %file.display(), "{}", warning);
    }
    info!(
        num_qubits = document.num_qubits,
        gates = document.gates.len(),
        "qiskit script imported"
    );

    match output {
        Some(path) => {
            document
                .save(path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Circuit document written to {}", path.display());
        }
        None => println!("{}", document.to_json()?),
    }
    Ok(())
}

fn gates_command() {
    println!("{:<6} {:<8} {:<28} Description", "Name", "Qubits", "Title");
    for gate in qsim_gates::all() {
        println!(
            "{:<6} {:<8} {:<28} {}",
            gate.name, gate.arity, gate.title, gate.description
        );
    }
    println!("{:<6} {:<8} {:<28} Collapse onto |0⟩ or |1⟩", "M", 1, "Measurement");
}
