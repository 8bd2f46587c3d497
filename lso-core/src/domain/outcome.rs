//! Run outcome types
//!
//! A [`RunOutcome`] is the terminal result of one accepted run. It is built
//! once the process has finished and serialized as the callback body.

use serde::{Deserialize, Serialize};

use super::job::JobId;

/// Terminal status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failure,
}

/// Result reported to the callback address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub job_id: JobId,
    pub status: RunStatus,
    /// Only set on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Combined stdout and stderr of the process, verbatim
    pub process_output: String,
}

impl RunOutcome {
    pub fn success(job_id: JobId, process_output: String) -> Self {
        Self {
            job_id,
            status: RunStatus::Success,
            reason: None,
            process_output,
        }
    }

    pub fn failure(job_id: JobId, reason: impl Into<String>, process_output: String) -> Self {
        Self {
            job_id,
            status: RunStatus::Failure,
            reason: Some(reason.into()),
            process_output,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_payload_has_no_reason() {
        let job_id = JobId::new();
        let outcome = RunOutcome::success(job_id, "PLAY RECAP ok=3".to_string());

        assert!(outcome.is_success());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({
                "job_id": job_id.to_string(),
                "status": "success",
                "process_output": "PLAY RECAP ok=3",
            })
        );
    }

    #[test]
    fn test_failure_payload_carries_reason() {
        let job_id = JobId::new();
        let outcome = RunOutcome::failure(job_id, "playbook process failed", "fatal".to_string());

        assert!(!outcome.is_success());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["reason"], "playbook process failed");
        assert_eq!(json["process_output"], "fatal");
    }
}
