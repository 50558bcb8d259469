//! Bitstring probability tables.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Outcome probabilities keyed by bitstring.
///
/// Character `i` of a key is the value of the `i`-th queried qubit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Probabilities(FxHashMap<String, f64>);

impl Probabilities {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `p` to the probability of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, p: f64) {
        *self.0.entry(bitstring.into()).or_insert(0.0) += p;
    }

    /// Probability of an exact bitstring (zero if absent).
    pub fn get(&self, bitstring: &str) -> f64 {
        self.0.get(bitstring).copied().unwrap_or(0.0)
    }

    /// Total probability mass.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Probability that qubit `index` reads `1`.
    pub fn marginal_one(&self, index: usize) -> f64 {
        self.marginal(index, b'1')
    }

    /// Probability that qubit `index` reads `0`.
    pub fn marginal_zero(&self, index: usize) -> f64 {
        self.marginal(index, b'0')
    }

    fn marginal(&self, index: usize, bit: u8) -> f64 {
        self.0
            .iter()
            .filter(|(state, _)| state.as_bytes().get(index) == Some(&bit))
            .map(|(_, p)| p)
            .sum()
    }

    /// Iterate over `(bitstring, probability)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no outcome is recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Probabilities {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut table = Probabilities::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}
