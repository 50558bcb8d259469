//! Run command implementation.

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use qlane_device::{BackendKind, DeviceRegistry};

use super::common::{self, ConfigFile};

/// JSON output of `qlane run`.
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    device: &'a str,
    wires: usize,
    shots: u64,
    values: &'a [f64],
}

/// Arguments of `qlane run`.
pub struct RunArgs<'a> {
    pub input: &'a str,
    pub device: &'a str,
    pub config: Option<&'a str>,
    pub wires: Option<usize>,
    pub shots: Option<u64>,
    pub user: Option<&'a str>,
    pub password: Option<&'a str>,
    pub options: &'a [String],
    pub format: &'a str,
}

pub fn execute(args: &RunArgs<'_>) -> Result<()> {
    if !matches!(args.format, "table" | "json") {
        anyhow::bail!("Unknown output format: {}", args.format);
    }

    println!(
        "{} Running {} on {}",
        style("→").cyan().bold(),
        style(args.input).green(),
        style(args.device).yellow()
    );

    let backend = BackendKind::from_name(args.device)?;
    let circuit = common::load_circuit(args.input)?;
    let config = args.config.map(common::load_config).transpose()?;

    let overrides = overrides(args, backend, config.as_ref(), common::circuit_wires(&circuit))?;
    let options = common::device_options(backend, config.as_ref(), &overrides);
    debug!("Device options: {:?}", options);

    let registry = DeviceRegistry::with_local_engines();
    let mut device = registry
        .create(backend.short_name(), &options)
        .with_context(|| format!("Failed to create device {}", backend))?;

    println!(
        "  Wires: {}, shots: {}",
        device.num_wires(),
        if device.shots() == 0 {
            "exact".to_string()
        } else {
            device.shots().to_string()
        }
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!(
        "Executing {} operations...",
        circuit.operations.len()
    ));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = device.execute(&circuit);
    spinner.finish_and_clear();
    let values = result?;

    match args.format {
        "json" => {
            let output = RunReport {
                device: backend.short_name(),
                wires: device.num_wires(),
                shots: device.shots(),
                values: &values,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => common::print_values(&circuit, &values),
    }

    Ok(())
}

/// Command-line values in the order they override the config file.
fn overrides(
    args: &RunArgs<'_>,
    backend: BackendKind,
    config: Option<&ConfigFile>,
    circuit_wires: usize,
) -> Result<Vec<(String, Value)>> {
    let mut overrides = Vec::new();

    let configured_wires = config
        .and_then(|c| c.get(backend.short_name()))
        .is_some_and(|section| section.contains_key("wires"));
    match args.wires {
        Some(wires) => overrides.push(("wires".to_string(), json!(wires))),
        None if !configured_wires => overrides.push(("wires".to_string(), json!(circuit_wires))),
        None => {}
    }

    if let Some(shots) = args.shots {
        overrides.push(("shots".to_string(), json!(shots)));
    }
    if let Some(user) = args.user {
        overrides.push(("user".to_string(), json!(user)));
    }
    if let Some(password) = args.password {
        overrides.push(("password".to_string(), json!(password)));
    }

    for raw in args.options {
        overrides.push(common::parse_option(raw)?);
    }

    Ok(overrides)
}
