/// Insight job queue
///
/// The API side of insight generation. [`InsightQueue::enqueue`] stores a
/// `queued` job record and hands its id to the worker over an unbounded
/// channel; the caller gets the job back immediately and polls it by id.
///
/// # Example
///
/// ```
/// use revintel_shared::ids::RandomIdGenerator;
/// use revintel_shared::models::job::{InsightRequest, JobStatus};
/// use revintel_shared::store::Stores;
/// use revintel_worker::queue::InsightQueue;
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stores = Stores::in_memory();
/// let (queue, _receiver) = InsightQueue::new(stores.jobs.clone(), Arc::new(RandomIdGenerator));
///
/// let job = queue.enqueue(Uuid::new_v4(), InsightRequest::default()).await?;
/// assert_eq!(job.status, JobStatus::Queued);
/// # Ok(())
/// # }
/// ```

use revintel_shared::ids::IdGenerator;
use revintel_shared::models::job::{InsightJob, InsightRequest};
use revintel_shared::store::{StoreError, TenantRepository};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Receiving end handed to the worker
pub type JobReceiver = mpsc::UnboundedReceiver<Uuid>;

/// Insight queue error
#[derive(Debug, Error)]
pub enum QueueError {
    /// Job store error
    #[error("Job store error: {0}")]
    Store(#[from] StoreError),

    /// The worker has stopped and will not pick up new jobs
    #[error("Insight worker is not running")]
    WorkerUnavailable,
}

/// Producer side of the insight job channel
#[derive(Clone)]
pub struct InsightQueue {
    jobs: Arc<dyn TenantRepository<InsightJob>>,
    ids: Arc<dyn IdGenerator>,
    sender: mpsc::UnboundedSender<Uuid>,
}

impl InsightQueue {
    /// Creates a queue and the receiver the worker consumes
    pub fn new(
        jobs: Arc<dyn TenantRepository<InsightJob>>,
        ids: Arc<dyn IdGenerator>,
    ) -> (Self, JobReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (InsightQueue { jobs, ids, sender }, receiver)
    }

    /// Records a queued job and schedules it
    ///
    /// # Errors
    ///
    /// - `Store` if the job record cannot be written
    /// - `WorkerUnavailable` if the worker has shut down; the stored job is
    ///   marked failed before returning
    pub async fn enqueue(
        &self,
        tenant_id: Uuid,
        request: InsightRequest,
    ) -> Result<InsightJob, QueueError> {
        let job = InsightJob::queued(self.ids.next_id(), tenant_id, request);
        self.jobs.insert(job.clone()).await?;

        if self.sender.send(job.id).is_err() {
            tracing::error!(job_id = %job.id, "Insight worker channel closed");

            let mut failed = job;
            failed.fail("Insight worker is not running");
            self.jobs.update(failed).await?;
            return Err(QueueError::WorkerUnavailable);
        }

        tracing::debug!(job_id = %job.id, tenant_id = %tenant_id, "Insight job queued");
        Ok(job)
    }

    /// Fetches a job owned by `tenant_id`
    pub async fn get(&self, tenant_id: Uuid, job_id: Uuid) -> Result<Option<InsightJob>, QueueError> {
        Ok(self.jobs.get(tenant_id, job_id).await?)
    }
}
