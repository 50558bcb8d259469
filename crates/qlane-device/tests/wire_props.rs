//! Property tests for wire validation.

use proptest::prelude::*;

use qlane_device::{
    ClassicalConfig, ClassicalDevice, Device, DeviceError, ErrorCategory, Param, SimulatorConfig,
    SimulatorDevice,
};

fn wires_strategy() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (1usize..5).prop_flat_map(|n| (Just(n), prop::collection::vec(0usize..7, 0..4)))
}

fn distinct(wires: &[usize]) -> bool {
    wires
        .iter()
        .enumerate()
        .all(|(k, w)| !wires[..k].contains(w))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn single_qubit_gate_wires((n, wires) in wires_strategy()) {
        let mut dev = SimulatorDevice::new(SimulatorConfig::new(n).with_seed(1)).unwrap();
        let result = dev.apply("Hadamard", &wires, &[]);
        let valid = wires.len() == 1 && wires[0] < n;
        prop_assert_eq!(result.is_ok(), valid);
        if let Err(err) = result {
            prop_assert_eq!(err.category(), ErrorCategory::Usage);
        }
    }

    #[test]
    fn two_qubit_gate_wires((n, wires) in wires_strategy()) {
        let mut dev = ClassicalDevice::new(ClassicalConfig::new(n)).unwrap();
        let result = dev.apply("CNOT", &wires, &[]);
        let valid = wires.len() == 2 && wires.iter().all(|&w| w < n) && distinct(&wires);
        prop_assert_eq!(result.is_ok(), valid);
    }

    #[test]
    fn basis_state_length_must_match((n, wires) in wires_strategy(), bits in prop::collection::vec(0u8..2, 0..4)) {
        let mut dev = SimulatorDevice::new(SimulatorConfig::new(n).with_seed(1)).unwrap();
        let result = dev.apply("BasisState", &wires, &[Param::bits(&bits)]);
        let valid = !wires.is_empty()
            && bits.len() == wires.len()
            && wires.iter().all(|&w| w < n)
            && distinct(&wires);
        prop_assert_eq!(result.is_ok(), valid);
        if let Err(err) = result {
            let out_of_order = matches!(err, DeviceError::OperationOrder { .. });
            prop_assert!(!out_of_order, "unexpected ordering error: {}", err);
        }
    }

    #[test]
    fn expectation_values_stay_in_range(theta in -7.0f64..7.0, phi in -7.0f64..7.0) {
        let mut dev = SimulatorDevice::new(SimulatorConfig::new(2).with_seed(3)).unwrap();
        dev.apply("RX", &[0], &[Param::Real(theta)]).unwrap();
        dev.apply("RY", &[1], &[Param::Real(phi)]).unwrap();
        dev.apply("CNOT", &[0, 1], &[]).unwrap();
        dev.pre_measure().unwrap();
        for name in ["PauliX", "PauliY", "PauliZ", "Hadamard"] {
            for wire in 0..2 {
                let e = dev.expval(name, &[wire], &[]).unwrap();
                prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&e));
                let v = dev.var(name, &[wire], &[]).unwrap();
                prop_assert!(v >= -1e-9);
            }
        }
        dev.post_measure().unwrap();
    }
}
