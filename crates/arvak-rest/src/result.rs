//! Uniform measurement results.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Register name used when a service returns one flat histogram per circuit.
pub const GLOBAL_REGISTER_NAME: &str = "__global__";

/// Measurement counts: bitstring → number of observations.
///
/// Serializes as a flat JSON object, e.g. `{"00": 48, "11": 52}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` observations of `bitstring`, replacing any previous value.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        self.counts.insert(bitstring.into(), count);
    }

    /// Get the count for a bitstring.
    pub fn get(&self, bitstring: &str) -> Option<u64> {
        self.counts.get(bitstring).copied()
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no outcomes were recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate over `(bitstring, count)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries sorted by descending count, ties broken by bitstring.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// The most frequently observed bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.sorted().into_iter().next()
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Counts for one named register of one circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Register the counts belong to.
    pub register: String,
    /// Observed outcomes.
    pub counts: Counts,
}

impl ExecutionResult {
    /// Create a result for a named register.
    pub fn new(counts: Counts, register: impl Into<String>) -> Self {
        Self {
            counts,
            register: register.into(),
        }
    }

    /// Create a result tagged with [`GLOBAL_REGISTER_NAME`].
    pub fn global(counts: Counts) -> Self {
        Self::new(counts, GLOBAL_REGISTER_NAME)
    }
}

/// Results of a batch, one entry per submitted circuit in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleResult {
    results: Vec<ExecutionResult>,
}

impl SampleResult {
    /// Build from per-circuit results.
    pub fn new(results: Vec<ExecutionResult>) -> Self {
        Self { results }
    }

    /// Per-circuit results in submission order.
    pub fn results(&self) -> &[ExecutionResult] {
        &self.results
    }

    /// Number of circuits covered.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if the result covers no circuits.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Result of the `index`-th submitted circuit.
    pub fn get(&self, index: usize) -> Option<&ExecutionResult> {
        self.results.get(index)
    }

    /// Append the results of another job, keeping order.
    pub fn extend(&mut self, other: SampleResult) {
        self.results.extend(other.results);
    }

    /// Consume into the per-circuit results.
    pub fn into_results(self) -> Vec<ExecutionResult> {
        self.results
    }
}
