use serde::{Deserialize, Serialize};

/// Ordered round multipliers, index 0 is the earliest round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeSequence(Vec<f64>);

impl OutcomeSequence {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for OutcomeSequence {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

// One round as exported by the history API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    #[serde(alias = "crash_point", alias = "crashPoint")]
    pub multiplier: f64,
}

// Accepted JSON layouts: bare numbers or round records
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawRounds {
    Values(Vec<f64>),
    Records(Vec<RoundRecord>),
}

impl RawRounds {
    pub(crate) fn into_values(self) -> Vec<f64> {
        match self {
            RawRounds::Values(values) => values,
            RawRounds::Records(records) => records.into_iter().map(|r| r.multiplier).collect(),
        }
    }
}
