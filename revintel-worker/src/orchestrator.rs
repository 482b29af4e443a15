/// Insight worker
///
/// Consumes job ids from the [`InsightQueue`](crate::queue::InsightQueue)
/// channel and runs each job in its own Tokio task.
///
/// # Job Lifecycle
///
/// ```text
/// InsightWorker
///   ├─> wait the configured delay
///   ├─> mark job running
///   ├─> InsightGenerator: build insight
///   ├─> insight store: insert
///   └─> mark job completed (or failed, with the error)
/// ```
///
/// # Shutdown
///
/// Cancelling the [`shutdown_token`](InsightWorker::shutdown_token) stops the
/// receive loop. Jobs still waiting out their delay are marked failed.
///
/// # Example
///
/// ```no_run
/// use revintel_shared::ids::RandomIdGenerator;
/// use revintel_shared::store::Stores;
/// use revintel_worker::generator::TemplateGenerator;
/// use revintel_worker::orchestrator::{InsightWorker, WorkerConfig};
/// use revintel_worker::queue::InsightQueue;
/// use std::sync::Arc;
///
/// # async fn example() {
/// let stores = Stores::in_memory();
/// let ids = Arc::new(RandomIdGenerator);
/// let (queue, receiver) = InsightQueue::new(stores.jobs.clone(), ids.clone());
///
/// let worker = InsightWorker::new(
///     stores.jobs.clone(),
///     stores.insights.clone(),
///     Arc::new(TemplateGenerator::new(ids)),
///     WorkerConfig::default(),
/// );
/// let shutdown = worker.shutdown_token();
///
/// tokio::spawn(worker.run(receiver));
/// // ... enqueue jobs through `queue` ...
/// shutdown.cancel();
/// # }
/// ```

use crate::generator::InsightGenerator;
use crate::queue::JobReceiver;
use revintel_shared::models::insight::Insight;
use revintel_shared::models::job::{InsightJob, JobStatus};
use revintel_shared::store::{StoreError, TenantRepository};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Default delay before a job is processed
pub const DEFAULT_DELAY_MS: u64 = 2000;

/// Insight worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Time a job waits in the queue before it runs
    pub delay: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

/// Background executor for insight jobs
pub struct InsightWorker {
    jobs: Arc<dyn TenantRepository<InsightJob>>,
    insights: Arc<dyn TenantRepository<Insight>>,
    generator: Arc<dyn InsightGenerator>,
    config: WorkerConfig,
    shutdown_token: CancellationToken,
}

impl InsightWorker {
    pub fn new(
        jobs: Arc<dyn TenantRepository<InsightJob>>,
        insights: Arc<dyn TenantRepository<Insight>>,
        generator: Arc<dyn InsightGenerator>,
        config: WorkerConfig,
    ) -> Self {
        InsightWorker {
            jobs,
            insights,
            generator,
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Gets shutdown token
    ///
    /// Used to signal graceful shutdown from external handlers.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Runs the receive loop until shutdown or until every queue handle is dropped
    pub async fn run(self, mut receiver: JobReceiver) {
        tracing::info!(
            generator = self.generator.name(),
            delay_ms = self.config.delay.as_millis() as u64,
            "Insight worker starting"
        );

        loop {
            tokio::select! {
                _ = self.shutdown_token.cancelled() => {
                    tracing::info!("Shutdown requested, insight worker stopping");
                    break;
                }
                next = receiver.recv() => match next {
                    Some(job_id) => self.dispatch(job_id),
                    None => {
                        tracing::info!("Insight queue closed, insight worker stopping");
                        break;
                    }
                },
            }
        }
    }

    fn dispatch(&self, job_id: Uuid) {
        let jobs = self.jobs.clone();
        let insights = self.insights.clone();
        let generator = self.generator.clone();
        let delay = self.config.delay;
        let shutdown = self.shutdown_token.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = sleep(delay) => {}
                _ = shutdown.cancelled() => {
                    if let Err(e) = fail_job(jobs.as_ref(), job_id, "Worker shut down before the job ran").await {
                        tracing::error!(job_id = %job_id, error = %e, "Failed to mark job as failed");
                    }
                    return;
                }
            }

            if let Err(e) = execute_job(jobs.as_ref(), insights.as_ref(), generator.as_ref(), job_id).await {
                tracing::error!(job_id = %job_id, error = %e, "Insight job execution failed");
            }
        });
    }
}

/// Runs one job to a terminal state
///
/// Generation errors are recorded on the job. Only store errors are returned.
pub async fn execute_job(
    jobs: &dyn TenantRepository<InsightJob>,
    insights: &dyn TenantRepository<Insight>,
    generator: &dyn InsightGenerator,
    job_id: Uuid,
) -> Result<(), StoreError> {
    let Some(mut job) = jobs.find_by_id(job_id).await? else {
        tracing::warn!(job_id = %job_id, "Insight job not found");
        return Ok(());
    };

    if !job.transition_to(JobStatus::Running) {
        tracing::warn!(job_id = %job_id, status = job.status.as_str(), "Insight job is not queued");
        return Ok(());
    }
    jobs.update(job.clone()).await?;

    tracing::info!(job_id = %job_id, tenant_id = %job.tenant_id, "Generating insight");

    let generated = match generator.generate(&job).await {
        Ok(insight) => insights.insert(insight.clone()).await.map(|_| insight).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match generated {
        Ok(insight) => {
            job.complete(insight.id);
            tracing::info!(job_id = %job_id, insight_id = %insight.id, "Insight job completed");
        }
        Err(message) => {
            tracing::error!(job_id = %job_id, error = %message, "Insight job failed");
            job.fail(message);
        }
    }

    jobs.update(job).await
}

async fn fail_job(
    jobs: &dyn TenantRepository<InsightJob>,
    job_id: Uuid,
    reason: &str,
) -> Result<(), StoreError> {
    if let Some(mut job) = jobs.find_by_id(job_id).await? {
        if job.fail(reason) {
            tracing::warn!(job_id = %job_id, reason, "Insight job failed");
            jobs.update(job).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorError, TemplateGenerator};
    use crate::queue::InsightQueue;
    use async_trait::async_trait;
    use revintel_shared::ids::SequentialIdGenerator;
    use revintel_shared::models::job::InsightRequest;
    use revintel_shared::store::MemoryRepository;

    struct FailingGenerator;

    #[async_trait]
    impl InsightGenerator for FailingGenerator {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn generate(&self, _job: &InsightJob) -> Result<Insight, GeneratorError> {
            Err(GeneratorError::Failed("model offline".to_string()))
        }
    }

    struct Harness {
        queue: InsightQueue,
        jobs: Arc<MemoryRepository<InsightJob>>,
        insights: Arc<MemoryRepository<Insight>>,
        shutdown: CancellationToken,
    }

    fn start(generator: Arc<dyn InsightGenerator>) -> Harness {
        let ids = Arc::new(SequentialIdGenerator::new());
        let jobs: Arc<MemoryRepository<InsightJob>> = Arc::new(MemoryRepository::new("insight_jobs"));
        let insights: Arc<MemoryRepository<Insight>> = Arc::new(MemoryRepository::new("insights"));
        let (queue, receiver) = InsightQueue::new(jobs.clone(), ids);

        let worker = InsightWorker::new(jobs.clone(), insights.clone(), generator, WorkerConfig::default());
        let shutdown = worker.shutdown_token();
        tokio::spawn(worker.run(receiver));

        Harness {
            queue,
            jobs,
            insights,
            shutdown,
        }
    }

    fn template() -> Arc<dyn InsightGenerator> {
        Arc::new(TemplateGenerator::new(Arc::new(SequentialIdGenerator::new())))
    }

    #[test]
    fn test_worker_config_default() {
        assert_eq!(WorkerConfig::default().delay, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_completes_after_delay() {
        let h = start(template());
        let tenant = Uuid::new_v4();

        let job = h.queue.enqueue(tenant, InsightRequest::default()).await.unwrap();

        sleep(Duration::from_millis(1500)).await;
        let pending = h.jobs.get(tenant, job.id).await.unwrap().unwrap();
        assert_eq!(pending.status, JobStatus::Queued);

        sleep(Duration::from_millis(1000)).await;
        let done = h.jobs.get(tenant, job.id).await.unwrap().unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert!(done.completed_at.is_some());

        let insight_id = done.insight_id.unwrap();
        let insight = h.insights.get(tenant, insight_id).await.unwrap().unwrap();
        assert_eq!(insight.tenant_id, tenant);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generator_failure_marks_job_failed() {
        let h = start(Arc::new(FailingGenerator));
        let tenant = Uuid::new_v4();

        let job = h.queue.enqueue(tenant, InsightRequest::default()).await.unwrap();
        sleep(Duration::from_secs(3)).await;

        let failed = h.jobs.get(tenant, job.id).await.unwrap().unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert!(failed.error.unwrap().contains("model offline"));
        assert!(failed.insight_id.is_none());
        assert!(h.insights.list(tenant).await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_fails_waiting_jobs() {
        let h = start(template());
        let tenant = Uuid::new_v4();

        let job = h.queue.enqueue(tenant, InsightRequest::default()).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        h.shutdown.cancel();
        sleep(Duration::from_millis(100)).await;

        let failed = h.jobs.get(tenant, job.id).await.unwrap().unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_execute_job_ignores_finished_jobs() {
        let jobs: MemoryRepository<InsightJob> = MemoryRepository::new("insight_jobs");
        let insights: MemoryRepository<Insight> = MemoryRepository::new("insights");
        let mut job = InsightJob::queued(Uuid::new_v4(), Uuid::new_v4(), InsightRequest::default());
        job.fail("cancelled");
        jobs.insert(job.clone()).await.unwrap();

        let generator = TemplateGenerator::new(Arc::new(SequentialIdGenerator::new()));
        execute_job(&jobs, &insights, &generator, job.id).await.unwrap();

        assert_eq!(jobs.find_by_id(job.id).await.unwrap(), Some(job));
        assert_eq!(insights.count().await.unwrap(), 0);
    }
}
