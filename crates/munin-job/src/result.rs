//! Result payload types.
//!
//! Mirrors the remote SDK's result-serialization contract: one
//! [`SavedResult`] per job, one [`ExperimentResult`] per executed circuit.
//! Values outside plain JSON (statevectors, probability arrays, raw
//! buffers) live in [`ExperimentData::extra`] as [`TypedValue`]s.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::tagged::TypedValue;

/// Execution outcome for a whole job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedResult {
    /// Backend the job ran on.
    pub backend_name: String,
    /// Backend software/hardware version, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_version: Option<String>,
    /// Job identifier as a plain string.
    pub job_id: String,
    /// Whether every experiment succeeded.
    pub success: bool,
    /// Final status string reported by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Completion timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Per-circuit results, in submission order.
    pub results: Vec<ExperimentResult>,
}

impl SavedResult {
    /// Create a result shell with no experiments.
    pub fn new(backend_name: impl Into<String>, job_id: impl Into<String>, success: bool) -> Self {
        Self {
            backend_name: backend_name.into(),
            backend_version: None,
            job_id: job_id.into(),
            success,
            status: None,
            date: None,
            results: Vec::new(),
        }
    }

    /// Set the completion timestamp.
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Append one experiment's result.
    pub fn with_experiment(mut self, experiment: ExperimentResult) -> Self {
        self.results.push(experiment);
        self
    }
}

/// Execution outcome for a single circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Number of shots executed.
    pub shots: u64,
    /// Whether this experiment succeeded.
    pub success: bool,
    /// Per-experiment status string, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Circuit header passed through from submission (name, qubit labels...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<serde_json::Map<String, serde_json::Value>>,
    /// Measurement data.
    pub data: ExperimentData,
}

impl ExperimentResult {
    /// Create an experiment result with empty data.
    pub fn new(shots: u64, success: bool) -> Self {
        Self {
            shots,
            success,
            status: None,
            header: None,
            data: ExperimentData::default(),
        }
    }

    /// Replace the measurement data.
    pub fn with_data(mut self, data: ExperimentData) -> Self {
        self.data = data;
        self
    }
}

/// Measurement data for one experiment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentData {
    /// Bitstring → observation count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<FxHashMap<String, u64>>,
    /// Per-shot bitstrings, when memory was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<Vec<String>>,
    /// Any further payload the backend attached, tagged-value encoded.
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty", default)]
    pub extra: BTreeMap<String, TypedValue>,
}

impl ExperimentData {
    /// Create data holding only counts.
    pub fn from_counts(counts: impl IntoIterator<Item = (String, u64)>) -> Self {
        Self {
            counts: Some(counts.into_iter().collect()),
            memory: None,
            extra: BTreeMap::new(),
        }
    }

    /// Attach an extra tagged value.
    pub fn with_extra(mut self, key: impl Into<String>, value: TypedValue) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use num_complex::Complex64;

    fn sample_result() -> SavedResult {
        let data = ExperimentData::from_counts([("00".to_string(), 512), ("11".to_string(), 488)])
            .with_extra(
                "statevector",
                TypedValue::ComplexArray(
                    array![Complex64::new(0.707, 0.0), Complex64::new(0.707, 0.0)].into_dyn(),
                ),
            );
        SavedResult::new("ibm_torino", "job-1", true)
            .with_date(Utc::now())
            .with_experiment(ExperimentResult::new(1000, true).with_data(data))
    }

    #[test]
    fn test_result_json_roundtrip() {
        let result = sample_result();
        let json = serde_json::to_string(&result).unwrap();
        let back: SavedResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_extra_values_are_tagged_on_the_wire() {
        let result = sample_result();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value["results"][0]["data"]["statevector"]["__type__"],
            "ndarray_c"
        );
    }

    #[test]
    fn test_optional_fields_omitted() {
        let result = SavedResult::new("sim", "job-2", false);
        let value = serde_json::to_value(&result).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("status"));
        assert!(!obj.contains_key("date"));
        assert!(!obj.contains_key("backend_version"));
    }
}
