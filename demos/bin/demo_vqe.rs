//! VQE (Variational Quantum Eigensolver) Demo
//!
//! Lowers the energy `w₀·⟨X₁⟩ + w₁·⟨Y₁⟩` of a two-term Hamiltonian by
//! optimising its classical weights. Each energy evaluation runs one circuit
//! per Pauli term, the way a host framework splits a Hamiltonian into
//! separately measured observables.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use qlane_demos::circuits::vqe_circuit;
use qlane_demos::optimizers::{GradientDescent, minimize};
use qlane_demos::{
    create_progress_bar, init_logging, print_header, print_info, print_result, print_section,
    print_success,
};
use qlane_device::{BackendKind, DeviceOptions, DeviceRegistry};

#[derive(Parser, Debug)]
#[command(name = "demo-vqe")]
#[command(about = "Minimise a two-term Pauli Hamiltonian over its weights")]
struct Args {
    /// Device short name
    #[arg(short, long, default_value = "qlane.simulator")]
    device: String,

    /// Step size
    #[arg(long, default_value = "0.5")]
    stepsize: f64,

    /// Optimization steps
    #[arg(short, long, default_value = "20")]
    iterations: usize,

    /// Shots per expectation value
    #[arg(short, long)]
    shots: Option<u64>,

    /// Account user name for qlane.ibm
    #[arg(long, env = "QLANE_IBM_USER")]
    user: Option<String>,

    /// Account password for qlane.ibm
    #[arg(long, env = "QLANE_IBM_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    print_header("VQE Demo");

    let backend = BackendKind::from_name(&args.device)?;
    let mut options = DeviceOptions::new(backend).with("wires", 2);
    if let Some(shots) = args.shots {
        options = options.with("shots", shots);
    }
    if let Some(user) = &args.user {
        options = options.with("user", user.as_str());
    }
    if let Some(password) = &args.password {
        options = options.with("password", password.as_str());
    }

    let registry = DeviceRegistry::with_local_engines();
    let mut device = registry
        .create(backend.short_name(), &options)
        .with_context(|| format!("Failed to create device {backend}"))?;

    info!(device = device.short_name(), wires = device.num_wires(), "Device ready");

    print_section("Problem Setup");
    print_result("Device", device.short_name());
    print_result("Ansatz", "H₀ RX₀(0.5) RY₁(0.9) CNOT₀₁");
    print_result("Hamiltonian", "w₀·X₁ + w₁·Y₁");

    // The ansatz has no free parameters, so the term values are fixed and
    // the energy is linear in the weights.
    let mut term = |observable: &str| -> Result<f64> {
        let values = device.execute(&vqe_circuit(observable))?;
        values.first().copied().context("circuit returned no values")
    };
    let terms = [term("PauliX")?, term("PauliY")?];
    info!(x = terms[0], y = terms[1], "Hamiltonian terms measured");
    print_result("⟨X₁⟩", format!("{:+.7}", terms[0]));
    print_result("⟨Y₁⟩", format!("{:+.7}", terms[1]));

    print_section("Optimization");
    let pb = create_progress_bar(args.iterations as u64, "optimizing");
    let mut optimizer = GradientDescent::new(args.stepsize);
    let result = minimize(
        &mut optimizer,
        |weights: &[f64]| -> Result<(f64, Vec<f64>)> {
            let energy = weights[0] * terms[0] + weights[1] * terms[1];
            debug!(?weights, energy, "Optimizer step");
            pb.inc(1);
            Ok((energy, terms.to_vec()))
        },
        vec![0.0, 0.0],
        args.iterations,
    )?;
    pb.finish_and_clear();

    for (step, value) in result.history.iter().enumerate() {
        print_info(&format!("Cost after step {step:5}: {value:+.7}"));
    }

    print_section("Results");
    print_result(
        "Weights",
        format!(
            "[{:+.5}, {:+.5}]",
            result.optimal_params[0], result.optimal_params[1]
        ),
    );
    print_result("Energy", format!("{:+.7}", result.optimal_value));
    if result.history.windows(2).all(|w| w[1] <= w[0]) {
        print_success("Energy decreased at every step");
    } else {
        print_info("Energy did not decrease monotonically; try a smaller step size");
    }

    Ok(())
}
