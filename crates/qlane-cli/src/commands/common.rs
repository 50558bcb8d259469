//! Shared helpers for CLI commands.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use qlane_device::{BackendKind, Circuit, DeviceOptions};

/// Per-device option sections of a configuration file.
pub type ConfigFile = BTreeMap<String, Map<String, Value>>;

/// Load a circuit from a JSON or YAML file.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    let ext = path_obj.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Failed to parse circuit: {path}")),
        _ => serde_json::from_str(&source)
            .with_context(|| format!("Failed to parse circuit: {path}")),
    }
}

/// Load a YAML configuration file keyed by device short name.
///
/// ```yaml
/// qlane.ibm:
///   user: alice
///   password: secret
///   num_runs: 2048
/// ```
pub fn load_config(path: &str) -> Result<ConfigFile> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;
    parse_config(&source).with_context(|| format!("Failed to parse config: {path}"))
}

/// Parse configuration file contents.
pub fn parse_config(source: &str) -> Result<ConfigFile> {
    if source.trim().is_empty() {
        return Ok(ConfigFile::new());
    }
    Ok(serde_yaml_ng::from_str(source)?)
}

/// Parse a `key=value` option; values that are valid JSON keep their type.
pub fn parse_option(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Empty option name in '{raw}'");
    }
    let value = serde_json::from_str(value.trim())
        .unwrap_or_else(|_| Value::String(value.trim().to_string()));
    Ok((key.to_string(), value))
}

/// Number of wires a circuit needs.
pub fn circuit_wires(circuit: &Circuit) -> usize {
    circuit
        .operations
        .iter()
        .flat_map(|op| op.wires.iter())
        .chain(circuit.observables.iter().flat_map(|obs| obs.wires.iter()))
        .max()
        .map_or(1, |w| w + 1)
}

/// Merge config-file section and command-line overrides into device options.
///
/// Later sources win: config file, then `overrides` in order.
pub fn device_options(
    backend: BackendKind,
    config: Option<&ConfigFile>,
    overrides: &[(String, Value)],
) -> DeviceOptions {
    let mut merged = config
        .and_then(|c| c.get(backend.short_name()))
        .cloned()
        .unwrap_or_default();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    DeviceOptions::from_map(backend, &merged)
}

/// Print one value per observable.
pub fn print_values(circuit: &Circuit, values: &[f64]) {
    use console::style;

    println!("\n{} Results:", style("✓").green().bold());

    for (obs, value) in circuit.observables.iter().zip(values) {
        let statistic = match obs.return_type {
            qlane_device::ReturnType::Expectation => "expval",
            qlane_device::ReturnType::Variance => "var",
        };
        let wires: Vec<_> = obs.wires.iter().map(ToString::to_string).collect();
        println!(
            "  {}({}[{}]) = {}",
            statistic,
            style(&obs.name).cyan(),
            wires.join(", "),
            style(format!("{value:+.6}")).yellow()
        );
    }
}
