//! qlane Command-Line Interface
//!
//! Runs host-framework circuits on qlane devices from the shell.
//!
//! ```text
//! qlane run -i bell.json -d qlane.simulator --shots 1000
//! qlane run -i bell.json -d qlane.ibm -c qlane.yaml
//! qlane devices
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{devices, run, version};

/// qlane - run variational circuits on simulator and queue-style devices
#[derive(Parser)]
#[command(name = "qlane")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a circuit and print one value per observable
    Run {
        /// Circuit file (JSON or YAML)
        #[arg(short, long)]
        input: String,

        /// Device short name (qlane.simulator, qlane.ibm, qlane.classical)
        #[arg(short, long, default_value = "qlane.simulator")]
        device: String,

        /// Configuration file with one section per device
        #[arg(short, long, env = "QLANE_CONFIG")]
        config: Option<String>,

        /// Number of wires (defaults to the config file, then to the circuit)
        #[arg(short, long)]
        wires: Option<usize>,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u64>,

        /// Account user name for qlane.ibm
        #[arg(long, env = "QLANE_IBM_USER")]
        user: Option<String>,

        /// Account password for qlane.ibm
        #[arg(long, env = "QLANE_IBM_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Extra device option as key=value (repeatable)
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// List devices with their supported operations and observables
    Devices,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Run {
            input,
            device,
            config,
            wires,
            shots,
            user,
            password,
            options,
            format,
        } => run::execute(&run::RunArgs {
            input: &input,
            device: &device,
            config: config.as_deref(),
            wires,
            shots,
            user: user.as_deref(),
            password: password.as_deref(),
            options: &options,
            format: &format,
        }),

        Commands::Devices => devices::execute(),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
