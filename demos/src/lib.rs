//! qlane Demo Suite
//!
//! Variational workflows driven through the same device contract a host
//! framework uses:
//!
//! - **Qubit rotation**: tune `RX(φ1)`, `RY(φ2)` until `⟨Z⟩ = -1`
//! - **VQE**: lower `a·⟨X₁⟩ + b·⟨Y₁⟩` over the weights of a fixed ansatz
//!
//! Gradients of circuit parameters come from the parameter-shift rule, so
//! every demo runs unchanged on any device, including the shot-based ones.
//!
//! ```
//! use qlane_demos::circuits::qubit_rotation;
//! use qlane_device::{Device, SimulatorConfig, SimulatorDevice};
//!
//! let mut dev = SimulatorDevice::new(SimulatorConfig::new(1)).unwrap();
//! let z = dev.execute(&qubit_rotation([std::f64::consts::PI, 0.0])).unwrap();
//! assert!((z[0] + 1.0).abs() < 1e-9);
//! ```

pub mod circuits;
pub mod gradient;
pub mod optimizers;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for optimisation loops.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Initialise logging with `-v` counting.
pub fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_target(false)
        .try_init();
}
