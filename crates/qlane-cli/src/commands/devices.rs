//! Devices command implementation.

use anyhow::Result;
use console::style;

use qlane_device::BackendKind;

/// Execute the devices command.
pub fn execute() -> Result<()> {
    println!("{} Available devices:\n", style("qlane").cyan().bold());

    for backend in BackendKind::ALL {
        let ops: Vec<_> = backend.operations().into_iter().collect();
        let obs: Vec<_> = backend.observables().into_iter().collect();

        println!(
            "  {} {}",
            style("●").green(),
            style(backend.short_name()).bold()
        );
        println!("    Operations:  {}", ops.join(", "));
        println!("    Observables: {}", obs.join(", "));
        println!("    Options:     {}", backend.option_keys().join(", "));
        println!();
    }

    Ok(())
}
