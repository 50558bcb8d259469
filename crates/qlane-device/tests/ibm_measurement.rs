//! `qlane.ibm` measurement path against a recording engine with fixed
//! probabilities.

use std::f64::consts::FRAC_PI_4;
use std::sync::{Arc, Mutex};

use qlane_device::{
    Circuit, Device, DeviceError, ErrorCategory, IbmConfig, IbmDevice, ObservableRequest,
    OperationRecord, Param,
};
use qlane_hal::{Engine, Gate, HalResult, Probabilities, ProbabilityEngine, QubitId};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Allocate(usize),
    Deallocate(usize),
    Apply(Gate, Vec<QubitId>),
    Measure(QubitId),
    Flush(bool),
}

type Log = Arc<Mutex<Vec<Event>>>;

/// Engine that logs every call and answers probability queries from a
/// fixed table.
struct MockQueue {
    log: Log,
    table: Probabilities,
    next_id: u32,
}

impl Engine for MockQueue {
    fn name(&self) -> &str {
        "mock-queue"
    }

    fn allocate_qureg(&mut self, n: usize) -> HalResult<Vec<QubitId>> {
        self.log.lock().unwrap().push(Event::Allocate(n));
        let reg = (self.next_id..self.next_id + n as u32).map(QubitId).collect();
        self.next_id += n as u32;
        Ok(reg)
    }

    fn deallocate_qureg(&mut self, qubits: &[QubitId]) -> HalResult<()> {
        self.log.lock().unwrap().push(Event::Deallocate(qubits.len()));
        Ok(())
    }

    fn apply(&mut self, gate: &Gate, qubits: &[QubitId]) -> HalResult<()> {
        self.log
            .lock()
            .unwrap()
            .push(Event::Apply(gate.clone(), qubits.to_vec()));
        Ok(())
    }

    fn measure(&mut self, qubit: QubitId) -> HalResult<bool> {
        self.log.lock().unwrap().push(Event::Measure(qubit));
        Ok(false)
    }

    fn flush(&mut self, deallocate: bool) -> HalResult<()> {
        self.log.lock().unwrap().push(Event::Flush(deallocate));
        Ok(())
    }
}

impl ProbabilityEngine for MockQueue {
    fn probabilities(&mut self, _qubits: &[QubitId]) -> HalResult<Probabilities> {
        Ok(self.table.clone())
    }
}

fn mock_table() -> Probabilities {
    [("00", 0.1), ("01", 0.3), ("10", 0.2), ("11", 0.4)]
        .into_iter()
        .collect()
}

fn mock_device(wires: usize, table: Probabilities) -> (IbmDevice<MockQueue>, Log) {
    let log: Log = Arc::default();
    let engine_log = Arc::clone(&log);
    let device = IbmDevice::with_factory(IbmConfig::new(wires, "user", "secret"), move |_| {
        Ok(MockQueue {
            log: Arc::clone(&engine_log),
            table: table.clone(),
            next_id: 0,
        })
    })
    .unwrap();
    log.lock().unwrap().clear();
    (device, log)
}

#[test]
fn test_expval_from_probabilities() {
    let (mut dev, _) = mock_device(2, mock_table());
    dev.set_observable_queue(vec![
        ObservableRequest::expval("PauliX", vec![0]),
        ObservableRequest::expval("PauliZ", vec![1]),
    ]);
    dev.pre_measure().unwrap();

    for name in ["PauliX", "PauliY", "PauliZ", "Hadamard"] {
        let e0 = dev.expval(name, &[0], &[]).unwrap();
        assert!((e0 - -0.2).abs() < 1e-12, "{name}: {e0}");
        let e1 = dev.expval(name, &[1], &[]).unwrap();
        assert!((e1 - -0.4).abs() < 1e-12, "{name}: {e1}");
    }
    let identity = dev.expval("Identity", &[0], &[]).unwrap();
    assert!((identity - 1.0).abs() < 1e-12);

    let var = dev.var("PauliZ", &[0], &[]).unwrap();
    assert!((var - 0.96).abs() < 1e-12);
}

#[test]
fn test_pre_measure_rotations_in_queue_order() {
    let (mut dev, log) = mock_device(3, mock_table());
    dev.set_observable_queue(vec![
        ObservableRequest::expval("PauliX", vec![0]),
        ObservableRequest::expval("PauliY", vec![1]),
        ObservableRequest::expval("Hadamard", vec![2]),
        ObservableRequest::expval("PauliZ", vec![0]),
        ObservableRequest::expval("Identity", vec![1]),
    ]);
    dev.pre_measure().unwrap();

    let q = |i| vec![QubitId(i)];
    let expected = vec![
        Event::Apply(Gate::H, q(0)),
        Event::Apply(Gate::Z, q(1)),
        Event::Apply(Gate::S, q(1)),
        Event::Apply(Gate::H, q(1)),
        Event::Apply(Gate::Ry(-FRAC_PI_4), q(2)),
        Event::Measure(QubitId(0)),
        Event::Measure(QubitId(1)),
        Event::Measure(QubitId(2)),
        Event::Flush(false),
    ];
    assert_eq!(*log.lock().unwrap(), expected);
}

#[test]
fn test_pre_measure_without_queue_measures_only() {
    let (mut dev, log) = mock_device(2, mock_table());
    dev.pre_measure().unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            Event::Measure(QubitId(0)),
            Event::Measure(QubitId(1)),
            Event::Flush(false)
        ]
    );
}

#[test]
fn test_non_z_without_queue_is_usage_error() {
    let (mut dev, _) = mock_device(2, mock_table());
    dev.pre_measure().unwrap();
    let err = dev.expval("PauliX", &[0], &[]).unwrap_err();
    assert!(matches!(err, DeviceError::MissingObservableQueue { .. }));
    assert_eq!(err.category(), ErrorCategory::Usage);

    assert!(dev.expval("PauliZ", &[0], &[]).is_ok());
    assert!(dev.expval("Identity", &[0], &[]).is_ok());
}

#[test]
fn test_hermitian_not_implemented() {
    let (mut dev, _) = mock_device(1, mock_table());
    let err = dev.expval("Hermitian", &[0], &[]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotImplemented);

    dev.set_observable_queue(vec![ObservableRequest {
        name: "Hermitian".into(),
        wires: vec![0],
        params: vec![Param::Matrix(vec![])],
        return_type: Default::default(),
    }]);
    let err = dev.pre_measure().unwrap_err();
    assert!(matches!(err, DeviceError::NotImplemented(_)));
}

#[test]
fn test_repeated_observable_rotates_once() {
    let (mut dev, log) = mock_device(2, mock_table());
    dev.set_observable_queue(vec![
        ObservableRequest::expval("PauliX", vec![0]),
        ObservableRequest::var("PauliX", vec![0]),
        ObservableRequest::expval("PauliZ", vec![0]),
    ]);
    dev.pre_measure().unwrap();

    let rotations: Vec<_> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, Event::Apply(..)))
        .cloned()
        .collect();
    assert_eq!(rotations, vec![Event::Apply(Gate::H, vec![QubitId(0)])]);
}

#[test]
fn test_conflicting_bases_on_one_wire() {
    let (mut dev, log) = mock_device(2, mock_table());
    dev.set_observable_queue(vec![
        ObservableRequest::expval("PauliX", vec![0]),
        ObservableRequest::expval("PauliY", vec![1]),
        ObservableRequest::expval("PauliY", vec![0]),
    ]);
    let err = dev.pre_measure().unwrap_err();
    assert!(matches!(
        err,
        DeviceError::ConflictingBases { first: "PauliX", second: "PauliY", .. }
    ));
    assert_eq!(err.category(), ErrorCategory::Usage);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_execute_expval_and_var_of_same_observable() {
    let mut dev = IbmDevice::new(IbmConfig {
        num_runs: Some(20_000),
        ..IbmConfig::new(1, "user", "secret")
    })
    .unwrap();
    let circuit = Circuit {
        operations: vec![OperationRecord::new("Hadamard", vec![0], vec![])],
        observables: vec![
            ObservableRequest::expval("PauliX", vec![0]),
            ObservableRequest::var("PauliX", vec![0]),
        ],
    };
    let values = dev.execute(&circuit).unwrap();
    assert!((values[0] - 1.0).abs() < 1e-9, "{values:?}");
    assert!(values[1].abs() < 1e-9, "{values:?}");
}

#[test]
fn test_post_measure_releases_register() {
    let (mut dev, log) = mock_device(2, mock_table());
    dev.pre_measure().unwrap();
    dev.post_measure().unwrap();
    assert_eq!(log.lock().unwrap().last(), Some(&Event::Deallocate(2)));
}

#[test]
fn test_reset_builds_fresh_engine() {
    let (mut dev, log) = mock_device(2, mock_table());
    dev.apply("PauliX", &[0], &[]).unwrap();
    dev.reset().unwrap();
    let events = log.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            Event::Apply(Gate::X, vec![QubitId(0)]),
            Event::Deallocate(2),
            Event::Allocate(2),
        ]
    );
}

#[test]
fn test_credentials_required() {
    let config = IbmConfig {
        password: None,
        ..IbmConfig::new(1, "user", "")
    };
    let err = IbmDevice::new(config).err().unwrap();
    assert!(matches!(err, DeviceError::Configuration(_)));

    let config = IbmConfig {
        user: None,
        ..IbmConfig::new(1, "", "secret")
    };
    let err = IbmDevice::new(config).err().unwrap();
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[test]
fn test_num_runs_overrides_shots() {
    let config = IbmConfig {
        num_runs: Some(77),
        ..IbmConfig::new(1, "user", "secret").with_shots(10)
    };
    let dev = IbmDevice::new(config).unwrap();
    assert_eq!(dev.shots(), 77);
    assert_eq!(dev.config().shots, 77);
}

#[test]
fn test_local_basis_rotations() {
    let mut dev = IbmDevice::new(IbmConfig {
        num_runs: Some(20_000),
        ..IbmConfig::new(3, "user", "secret")
    })
    .unwrap();
    dev.apply("Hadamard", &[0], &[]).unwrap();
    dev.apply("RX", &[1], &[Param::Real(-std::f64::consts::FRAC_PI_2)])
        .unwrap();
    dev.set_observable_queue(vec![
        ObservableRequest::expval("PauliX", vec![0]),
        ObservableRequest::expval("PauliY", vec![1]),
        ObservableRequest::expval("Hadamard", vec![2]),
    ]);
    dev.pre_measure().unwrap();
    assert!((dev.expval("PauliX", &[0], &[]).unwrap() - 1.0).abs() < 1e-9);
    assert!((dev.expval("PauliY", &[1], &[]).unwrap() - 1.0).abs() < 1e-9);
    let h = dev.expval("Hadamard", &[2], &[]).unwrap();
    assert!((h - std::f64::consts::FRAC_1_SQRT_2).abs() < 0.05);
    dev.post_measure().unwrap();
}
