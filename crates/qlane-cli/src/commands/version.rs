//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum devices for automatic-differentiation frameworks",
        style("qlane").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qlane-hal          Backend engine seam");
    println!("  qlane-device       Simulator, IBM and classical devices");
    println!("  qlane-adapter-sim  In-process statevector and bit engines");
    println!("  qlane-cli          Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
