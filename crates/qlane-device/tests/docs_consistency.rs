//! The operation and observable lists in each device's documentation must
//! match what the device actually supports.

use std::collections::BTreeSet;

use qlane_device::{
    ClassicalConfig, ClassicalDevice, Device, IbmConfig, IbmDevice, SimulatorConfig,
    SimulatorDevice,
};

const SIMULATOR_DOCS: &str = include_str!("../docs/simulator.md");
const IBM_DOCS: &str = include_str!("../docs/ibm.md");
const CLASSICAL_DOCS: &str = include_str!("../docs/classical.md");

/// Names listed as `` - `Name` `` under the given heading.
fn documented(docs: &str, heading: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut in_section = false;
    for line in docs.lines() {
        if let Some(title) = line.strip_prefix("# ") {
            in_section = title.trim() == heading;
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some(item) = line.trim().strip_prefix("- `") {
            if let Some(name) = item.strip_suffix('`') {
                names.insert(name.to_string());
            }
        }
    }
    names
}

fn check(docs: &str, dev: &dyn Device) {
    let ops: BTreeSet<String> = dev.operations().into_iter().map(String::from).collect();
    let obs: BTreeSet<String> = dev.observables().into_iter().map(String::from).collect();
    assert_eq!(
        documented(docs, "Supported operations"),
        ops,
        "operation list of {}",
        dev.short_name()
    );
    assert_eq!(
        documented(docs, "Supported observables"),
        obs,
        "observable list of {}",
        dev.short_name()
    );
}

#[test]
fn test_simulator_docs() {
    let dev = SimulatorDevice::new(SimulatorConfig::default()).unwrap();
    check(SIMULATOR_DOCS, &dev);
}

#[test]
fn test_ibm_docs() {
    let dev = IbmDevice::new(IbmConfig::new(1, "user", "secret")).unwrap();
    check(IBM_DOCS, &dev);
}

#[test]
fn test_classical_docs() {
    let dev = ClassicalDevice::new(ClassicalConfig::default()).unwrap();
    check(CLASSICAL_DOCS, &dev);
}

#[test]
fn test_parser_ignores_other_sections() {
    let docs = "# Options\n\n- `wires`\n\n# Supported operations\n\n- `PauliX`\n- `CNOT`\n";
    let names = documented(docs, "Supported operations");
    assert_eq!(names, BTreeSet::from(["CNOT", "PauliX"].map(String::from)));
}
