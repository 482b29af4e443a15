/// Insight generators
///
/// A generator turns a running job into an [`Insight`]. The worker owns one
/// generator behind the [`InsightGenerator`] trait; the production one,
/// [`TemplateGenerator`], fills a fixed template from the job's focus areas.

use async_trait::async_trait;
use chrono::Utc;
use revintel_shared::ids::IdGenerator;
use revintel_shared::models::insight::{Insight, InsightImpact, InsightType};
use revintel_shared::models::job::InsightJob;
use std::sync::Arc;
use thiserror::Error;

/// Focus area used when a request names none
pub const DEFAULT_FOCUS_AREA: &str = "revenue growth";

/// Time window used when a request names none
pub const DEFAULT_TIME_WINDOW: &str = "the last 30 days";

/// Confidence reported for template insights
pub const TEMPLATE_CONFIDENCE: u8 = 87;

/// Insight generation error
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The generator itself failed
    #[error("Insight generation failed: {0}")]
    Failed(String),
}

/// Produces an insight for a job
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// Generator name, used in log fields
    fn name(&self) -> &'static str;

    /// Builds the insight for `job`
    async fn generate(&self, job: &InsightJob) -> Result<Insight, GeneratorError>;
}

/// Canned insight built from the job's focus areas
pub struct TemplateGenerator {
    ids: Arc<dyn IdGenerator>,
}

impl TemplateGenerator {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        TemplateGenerator { ids }
    }
}

#[async_trait]
impl InsightGenerator for TemplateGenerator {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn generate(&self, job: &InsightJob) -> Result<Insight, GeneratorError> {
        let focus_areas: Vec<&str> = job
            .request
            .focus_areas
            .iter()
            .map(|area| area.trim())
            .filter(|area| !area.is_empty())
            .collect();

        let primary = focus_areas.first().copied().unwrap_or(DEFAULT_FOCUS_AREA);
        let covered = if focus_areas.is_empty() {
            DEFAULT_FOCUS_AREA.to_string()
        } else {
            focus_areas.join(", ")
        };
        let window = job.request.time_window.as_deref().unwrap_or(DEFAULT_TIME_WINDOW);

        Ok(Insight {
            id: self.ids.next_id(),
            tenant_id: job.tenant_id,
            insight_type: InsightType::Opportunity,
            title: format!("Growth opportunity in {}", primary),
            description: format!(
                "Analysis of {} over {} shows momentum worth acting on. \
                 Accounts engaging with {} convert at a higher rate than average.",
                covered, window, primary
            ),
            confidence: TEMPLATE_CONFIDENCE,
            impact: InsightImpact::High,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revintel_shared::ids::SequentialIdGenerator;
    use revintel_shared::models::job::InsightRequest;
    use uuid::Uuid;

    fn job(focus_areas: &[&str], time_window: Option<&str>) -> InsightJob {
        InsightJob::queued(
            Uuid::new_v4(),
            Uuid::new_v4(),
            InsightRequest {
                scope: None,
                focus_areas: focus_areas.iter().map(|s| s.to_string()).collect(),
                time_window: time_window.map(str::to_string),
            },
        )
    }

    #[tokio::test]
    async fn test_uses_focus_areas() {
        let generator = TemplateGenerator::new(Arc::new(SequentialIdGenerator::new()));
        let job = job(&["pricing", "expansion"], Some("Q3"));

        let insight = generator.generate(&job).await.unwrap();
        assert_eq!(insight.tenant_id, job.tenant_id);
        assert_eq!(insight.id, Uuid::from_u128(1));
        assert_eq!(insight.title, "Growth opportunity in pricing");
        assert!(insight.description.contains("pricing, expansion"));
        assert!(insight.description.contains("Q3"));
        assert_eq!(insight.confidence, TEMPLATE_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_defaults_without_focus_areas() {
        let generator = TemplateGenerator::new(Arc::new(SequentialIdGenerator::new()));

        let insight = generator.generate(&job(&["  "], None)).await.unwrap();
        assert_eq!(insight.title, "Growth opportunity in revenue growth");
        assert!(insight.description.contains(DEFAULT_TIME_WINDOW));
    }
}
