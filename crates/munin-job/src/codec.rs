//! Document codec: one archived job to/from one JSON document.
//!
//! The persisted document is the job's field set wrapped in a version
//! envelope. Decoding is strict: a document written by a newer format
//! revision is rejected instead of being half-read.

use serde::{Deserialize, Serialize};

use crate::error::{JobError, JobResult};
use crate::saved_job::SavedJob;

/// Document format version written by this build.
pub const DOCUMENT_VERSION: u32 = 1;

/// The on-disk document: version envelope around the job fields.
#[derive(Debug, Serialize, Deserialize)]
struct JobDocument {
    version: u32,
    #[serde(flatten)]
    job: SavedJob,
}

/// Encode a job into a single UTF-8 JSON document.
pub fn encode_job(job: &SavedJob) -> JobResult<String> {
    let document = JobDocument {
        version: DOCUMENT_VERSION,
        job: job.clone(),
    };
    Ok(serde_json::to_string(&document)?)
}

/// Decode a JSON document back into a job.
///
/// The reconstructed job has the same accessor surface as one freshly
/// copied from a live handle; only the live-connection operations are
/// (deliberately) absent.
pub fn decode_job(document: &str) -> JobResult<SavedJob> {
    let document: JobDocument = serde_json::from_str(document)?;
    if document.version != DOCUMENT_VERSION {
        return Err(JobError::UnsupportedVersion(document.version));
    }
    Ok(document.job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::job::JobId;
    use crate::layout::{QubitRef, TranspileLayout};
    use crate::result::{ExperimentData, ExperimentResult, SavedResult};
    use crate::saved_job::{CircuitLayouts, JobSource};
    use crate::tagged::TypedValue;

    struct ArchiveSource;

    impl JobSource for ArchiveSource {
        fn job_id(&self) -> JobId {
            JobId::new("crk5q2b4vvp0008h4rdg")
        }

        fn backend_name(&self) -> Option<String> {
            Some("ibm_sherbrooke".into())
        }

        fn tags(&self) -> Option<Vec<String>> {
            Some(vec!["repetition-code".into()])
        }

        fn name(&self) -> Option<String> {
            Some("rep-d5".into())
        }

        fn creation_date(&self) -> Option<chrono::DateTime<Utc>> {
            Some(Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap())
        }

        fn backend_options(&self) -> Option<serde_json::Map<String, serde_json::Value>> {
            let mut opts = serde_json::Map::new();
            opts.insert("shots".into(), serde_json::json!(2048));
            opts.insert("memory".into(), serde_json::json!(true));
            Some(opts)
        }

        fn circuit_layouts(&self) -> Vec<CircuitLayouts> {
            vec![
                CircuitLayouts {
                    initial: Some(
                        TranspileLayout::new()
                            .assign(QubitRef::new(2, "ancilla", 0), 0)
                            .assign(QubitRef::new(2, "code", 0), 2),
                    ),
                    final_: Some(
                        TranspileLayout::new().assign(QubitRef::new(2, "code", 0), 3),
                    ),
                },
                // Circuit without any layout assigned.
                CircuitLayouts::default(),
            ]
        }
    }

    fn archived_job() -> SavedJob {
        let mut job = SavedJob::from_source(&ArchiveSource);
        let data = ExperimentData::from_counts([("00".to_string(), 1024), ("11".to_string(), 1024)])
            .with_extra("fidelity", TypedValue::Float(0.993));
        let result = SavedResult::new("ibm_sherbrooke", "crk5q2b4vvp0008h4rdg", true)
            .with_date(Utc.with_ymd_and_hms(2025, 3, 14, 10, 2, 11).unwrap())
            .with_experiment(ExperimentResult::new(2048, true).with_data(data));
        job.attach_result(result).unwrap();
        job
    }

    #[test]
    fn test_roundtrip_preserves_every_accessor() {
        let job = archived_job();
        let encoded = encode_job(&job).unwrap();
        let decoded = decode_job(&encoded).unwrap();

        assert_eq!(decoded.job_id(), job.job_id());
        assert_eq!(decoded.backend_name(), job.backend_name());
        assert_eq!(decoded.tags(), job.tags());
        assert_eq!(decoded.name(), job.name());
        assert_eq!(decoded.creation_date(), job.creation_date());
        assert_eq!(decoded.backend_options(), job.backend_options());
        assert_eq!(decoded.initial_layouts(), job.initial_layouts());
        assert_eq!(decoded.final_layouts(), job.final_layouts());
        assert_eq!(decoded.result(), job.result());
        assert_eq!(decoded, job);
    }

    #[test]
    fn test_none_layout_entries_survive() {
        let job = archived_job();
        let decoded = decode_job(&encode_job(&job).unwrap()).unwrap();

        let initial = decoded.initial_layouts().unwrap();
        assert!(initial[0].is_some());
        assert!(initial[1].is_none());
    }

    #[test]
    fn test_document_carries_version() {
        let encoded = encode_job(&archived_job()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["version"], DOCUMENT_VERSION);
    }

    #[test]
    fn test_future_version_rejected() {
        let encoded = encode_job(&archived_job()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        value["version"] = serde_json::json!(99);

        let err = decode_job(&value.to_string()).unwrap_err();
        assert!(matches!(err, JobError::UnsupportedVersion(99)));
    }

    #[test]
    fn test_reconstructed_job_refuses_network_operations() {
        let decoded = decode_job(&encode_job(&archived_job()).unwrap()).unwrap();
        assert!(decoded.submit().is_err());
        assert!(decoded.status().is_err());
    }
}
