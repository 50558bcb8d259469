//! Qubit Rotation Demo
//!
//! Rotates one qubit with `RX(φ1)` and `RY(φ2)` and optimises both angles so
//! that the qubit is measured in `|1⟩` with certainty, i.e. `⟨Z⟩ = -1`.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use qlane_demos::circuits::qubit_rotation;
use qlane_demos::gradient::parameter_shift;
use qlane_demos::optimizers::{Adagrad, GradientDescent, minimize};
use qlane_demos::{
    create_progress_bar, init_logging, print_header, print_info, print_result, print_section,
    print_success,
};
use qlane_device::{BackendKind, DeviceOptions, DeviceRegistry};

#[derive(Parser, Debug)]
#[command(name = "demo-qubit-rotation")]
#[command(about = "Optimise two rotation angles to flip a qubit")]
struct Args {
    /// Device short name
    #[arg(short, long, default_value = "qlane.simulator")]
    device: String,

    /// Optimizer (gd, adagrad)
    #[arg(short, long, default_value = "gd")]
    optimizer: String,

    /// Step size
    #[arg(long, default_value = "0.5")]
    stepsize: f64,

    /// Optimization steps
    #[arg(short, long, default_value = "100")]
    iterations: usize,

    /// Shots per expectation value (0 = exact where the device allows it)
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

    print_header("Qubit Rotation Demo");

    let backend = BackendKind::from_name(&args.device)?;
    let mut options = DeviceOptions::new(backend).with("wires", 1);
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
    print_result("Circuit", "RX(φ1) RY(φ2) on wire 0, measure ⟨Z⟩");
    print_result("Optimizer", &args.optimizer);
    print_result("Step size", args.stepsize);

    let initial = vec![0.011, 0.012];
    let mut cost = |params: &[f64]| -> Result<f64> {
        let angles: [f64; 2] = params
            .try_into()
            .context("qubit rotation takes exactly two angles")?;
        let values = device.execute(&qubit_rotation(angles))?;
        values.first().copied().context("circuit returned no values")
    };
    print_result("Initial angles", format!("{initial:?}"));
    print_result("Initial cost", format!("{:+.7}", cost(&initial)?));

    print_section("Optimization");
    let pb = create_progress_bar(args.iterations as u64, "optimizing");
    let value_and_grad = |params: &[f64]| -> Result<(f64, Vec<f64>)> {
        let value = cost(params)?;
        let grad = parameter_shift(&mut cost, params)?;
        debug!(?params, value, ?grad, "Optimizer step");
        pb.inc(1);
        pb.set_message(format!("cost {value:+.5}"));
        Ok((value, grad))
    };

    let result = match args.optimizer.to_lowercase().as_str() {
        "gd" => minimize(
            &mut GradientDescent::new(args.stepsize),
            value_and_grad,
            initial,
            args.iterations,
        )?,
        "adagrad" => minimize(
            &mut Adagrad::new(args.stepsize),
            value_and_grad,
            initial,
            args.iterations,
        )?,
        other => anyhow::bail!("Unknown optimizer: {other}. Available: gd, adagrad"),
    };
    pb.finish_and_clear();

    for (step, value) in result.history.iter().enumerate().step_by(10) {
        print_info(&format!("Cost after step {step:5}: {value:+.7}"));
    }

    print_section("Results");
    print_result(
        "Optimized angles",
        format!(
            "[{:.5}, {:.5}]",
            result.optimal_params[0], result.optimal_params[1]
        ),
    );
    print_result("Final ⟨Z⟩", format!("{:+.7}", result.optimal_value));
    print_result("Iterations", result.num_iterations);

    if result.optimal_value < -0.99 {
        print_success("Qubit flipped to |1⟩");
    } else {
        print_info("Not converged; try more iterations or a larger step size");
    }

    Ok(())
}
