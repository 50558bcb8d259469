//! Observables requested at measurement time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operation::Param;

/// Every observable name a qlane device recognises.
///
/// `Hermitian` is recognised only so devices can reject it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObservableKind {
    PauliX,
    PauliY,
    PauliZ,
    Hadamard,
    Identity,
    Hermitian,
}

impl ObservableKind {
    /// All kinds.
    pub const ALL: [ObservableKind; 6] = [
        ObservableKind::PauliX,
        ObservableKind::PauliY,
        ObservableKind::PauliZ,
        ObservableKind::Hadamard,
        ObservableKind::Identity,
        ObservableKind::Hermitian,
    ];

    /// Host-framework name.
    pub fn name(self) -> &'static str {
        match self {
            ObservableKind::PauliX => "PauliX",
            ObservableKind::PauliY => "PauliY",
            ObservableKind::PauliZ => "PauliZ",
            ObservableKind::Hadamard => "Hadamard",
            ObservableKind::Identity => "Identity",
            ObservableKind::Hermitian => "Hermitian",
        }
    }

    /// Parse a host-framework name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for ObservableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Statistic to return for an observable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    #[default]
    Expectation,
    Variance,
}

/// An observable as requested by the host framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservableRequest {
    pub name: String,
    pub wires: Vec<usize>,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub return_type: ReturnType,
}

impl ObservableRequest {
    /// Expectation-value request without parameters.
    pub fn expval(name: impl Into<String>, wires: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            wires,
            params: Vec::new(),
            return_type: ReturnType::Expectation,
        }
    }

    /// Variance request without parameters.
    pub fn var(name: impl Into<String>, wires: Vec<usize>) -> Self {
        Self {
            return_type: ReturnType::Variance,
            ..Self::expval(name, wires)
        }
    }
}
