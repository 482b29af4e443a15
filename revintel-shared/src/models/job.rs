/// Insight generation jobs
///
/// A job is created when a tenant asks for insights and is advanced by the
/// insight worker. Callers poll the job by id to learn which insight it
/// produced.
///
/// # State Machine
///
/// ```text
/// queued ──> running ──> completed
///    │          │
///    └──────────┴──────> failed
/// ```

use super::TenantScoped;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Job lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, waiting for the generation delay to elapse
    Queued,

    /// Insight is being built
    Running,

    /// Insight stored; `insight_id` is set
    Completed,

    /// Generation failed; `error` is set
    Failed,
}

impl JobStatus {
    /// Converts status to its wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Checks if the job has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Checks if transition to target state is valid
    pub fn can_transition_to(&self, target: JobStatus) -> bool {
        matches!(
            (self, target),
            (JobStatus::Queued, JobStatus::Running)
                | (JobStatus::Queued, JobStatus::Failed)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Failed)
        )
    }
}

/// Parameters of an insight generation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightRequest {
    /// Analysis scope (e.g. "revenue", "marketing")
    pub scope: Option<String>,

    /// Areas the generated insight should talk about
    pub focus_areas: Vec<String>,

    /// Look-back window (e.g. "30d")
    pub time_window: Option<String>,
}

/// A queued or finished insight generation job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightJob {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub status: JobStatus,

    #[serde(flatten)]
    pub request: InsightRequest,

    /// Insight produced by the job, set once completed
    pub insight_id: Option<Uuid>,

    /// Failure reason, set once failed
    pub error: Option<String>,

    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl InsightJob {
    /// Builds a queued job
    pub fn queued(id: Uuid, tenant_id: Uuid, request: InsightRequest) -> Self {
        Self {
            id,
            tenant_id,
            status: JobStatus::Queued,
            request,
            insight_id: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Moves the job to `target`, returning false if the transition is invalid
    pub fn transition_to(&mut self, target: JobStatus) -> bool {
        if !self.status.can_transition_to(target) {
            return false;
        }
        self.status = target;
        if target.is_terminal() {
            self.completed_at = Some(Utc::now());
        }
        true
    }

    /// Marks the job completed with the produced insight
    pub fn complete(&mut self, insight_id: Uuid) -> bool {
        if !self.transition_to(JobStatus::Completed) {
            return false;
        }
        self.insight_id = Some(insight_id);
        true
    }

    /// Marks the job failed with a reason
    pub fn fail(&mut self, error: impl Into<String>) -> bool {
        if !self.transition_to(JobStatus::Failed) {
            return false;
        }
        self.error = Some(error.into());
        true
    }
}

impl TenantScoped for InsightJob {
    fn id(&self) -> Uuid {
        self.id
    }

    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> InsightJob {
        InsightJob::queued(Uuid::new_v4(), Uuid::new_v4(), InsightRequest::default())
    }

    #[test]
    fn test_happy_path() {
        let mut job = job();
        assert!(job.transition_to(JobStatus::Running));
        assert!(job.completed_at.is_none());

        let insight_id = Uuid::new_v4();
        assert!(job.complete(insight_id));
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.insight_id, Some(insight_id));
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_cannot_complete_from_queued() {
        let mut job = job();
        assert!(!job.complete(Uuid::new_v4()));
        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.insight_id.is_none());
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut job = job();
        assert!(job.fail("boom"));
        assert_eq!(job.error.as_deref(), Some("boom"));
        assert!(!job.transition_to(JobStatus::Running));
        assert!(!job.fail("again"));
    }

    #[test]
    fn test_request_fields_are_flattened() {
        let mut job = job();
        job.request.focus_areas = vec!["pricing".to_string()];

        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["status"], "queued");
        assert_eq!(json["focus_areas"][0], "pricing");
    }
}
