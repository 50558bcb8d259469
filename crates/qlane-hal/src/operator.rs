//! Weighted Pauli-string operators.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// Single-qubit Pauli factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    X,
    Y,
    Z,
}

/// One term of a [`QubitOperator`]: `coefficient · ⊗ P_i`.
///
/// An empty factor list is the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    pub coefficient: f64,
    /// `(local index, Pauli)` pairs, indices into the queried qubit slice.
    pub factors: Vec<(usize, Pauli)>,
}

/// A real linear combination of Pauli strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QubitOperator {
    pub terms: Vec<PauliTerm>,
}

impl QubitOperator {
    /// Single Pauli on local index `index` with unit weight.
    pub fn pauli(pauli: Pauli, index: usize) -> Self {
        Self {
            terms: vec![PauliTerm {
                coefficient: 1.0,
                factors: vec![(index, pauli)],
            }],
        }
    }

    /// The identity with unit weight.
    pub fn identity() -> Self {
        Self {
            terms: vec![PauliTerm {
                coefficient: 1.0,
                factors: Vec::new(),
            }],
        }
    }

    /// Largest local index referenced, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.terms
            .iter()
            .flat_map(|t| t.factors.iter().map(|(i, _)| *i))
            .max()
    }
}

impl Add for QubitOperator {
    type Output = QubitOperator;

    fn add(mut self, rhs: QubitOperator) -> QubitOperator {
        self.terms.extend(rhs.terms);
        self
    }
}

impl Mul<QubitOperator> for f64 {
    type Output = QubitOperator;

    fn mul(self, mut rhs: QubitOperator) -> QubitOperator {
        for term in &mut rhs.terms {
            term.coefficient *= self;
        }
        rhs
    }
}
