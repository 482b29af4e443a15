/// Churn prediction
///
/// Each client gets a uniformly random churn probability; repeated calls
/// give different answers. Pass a seeded generator to get stable output.

use super::round_to;
use crate::models::client::Client;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Probability at or above which a client counts as at risk
pub const DEFAULT_THRESHOLD: f64 = 0.5;

const HIGH_RISK: f64 = 0.7;
const MEDIUM_RISK: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_RISK {
            RiskLevel::High
        } else if probability >= MEDIUM_RISK {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnPrediction {
    pub client_id: Uuid,
    pub company_name: String,

    /// In `[0, 1)`, two decimal places
    pub churn_probability: f64,
    pub risk_level: RiskLevel,
    pub at_risk: bool,
}

/// Scores every client, or only those named in `client_ids`
pub fn predict_churn<R: Rng + ?Sized>(
    clients: &[Client],
    client_ids: Option<&[Uuid]>,
    threshold: f64,
    rng: &mut R,
) -> Vec<ChurnPrediction> {
    clients
        .iter()
        .filter(|client| client_ids.map_or(true, |ids| ids.contains(&client.id)))
        .map(|client| {
            // Truncate so a draw near 1 never rounds up to 1.00
            let probability = round_to((rng.gen::<f64>() * 100.0).floor() / 100.0, 2);

            ChurnPrediction {
                client_id: client.id,
                company_name: client.company_name.clone(),
                churn_probability: probability,
                risk_level: RiskLevel::from_probability(probability),
                at_risk: probability >= threshold,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::client::CreateClient;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn client(name: &str) -> Client {
        Client::new(
            Uuid::new_v4(),
            Uuid::nil(),
            CreateClient {
                company_name: name.to_string(),
                domain: None,
                industry: None,
                plan: Default::default(),
            },
        )
    }

    #[test]
    fn test_risk_buckets() {
        assert_eq!(RiskLevel::from_probability(0.99), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.7), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.69), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.4), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.39), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.0), RiskLevel::Low);
    }

    #[test]
    fn test_scores_every_client() {
        let clients = vec![client("a"), client("b"), client("c")];
        let mut rng = StdRng::seed_from_u64(7);

        let predictions = predict_churn(&clients, None, DEFAULT_THRESHOLD, &mut rng);
        assert_eq!(predictions.len(), 3);

        for p in &predictions {
            assert!((0.0..1.0).contains(&p.churn_probability));
            assert_eq!(p.risk_level, RiskLevel::from_probability(p.churn_probability));
            assert_eq!(p.at_risk, p.churn_probability >= DEFAULT_THRESHOLD);
        }
    }

    #[test]
    fn test_filters_by_client_ids() {
        let clients = vec![client("a"), client("b"), client("c")];
        let wanted = [clients[1].id];
        let mut rng = StdRng::seed_from_u64(7);

        let predictions = predict_churn(&clients, Some(&wanted), DEFAULT_THRESHOLD, &mut rng);
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].company_name, "b");
    }

    #[test]
    fn test_seeded_generator_is_reproducible() {
        let clients = vec![client("a"), client("b")];

        let first = predict_churn(&clients, None, 0.5, &mut StdRng::seed_from_u64(42));
        let second = predict_churn(&clients, None, 0.5, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_threshold_extremes() {
        let clients = vec![client("a"), client("b"), client("c")];
        let mut rng = StdRng::seed_from_u64(1);

        assert!(predict_churn(&clients, None, 0.0, &mut rng).iter().all(|p| p.at_risk));
        assert!(predict_churn(&clients, None, 1.0, &mut rng).iter().all(|p| !p.at_risk));
    }
}
