/// Connected third-party providers
///
/// Connecting is simulated: no OAuth handshake takes place. Every connect call
/// appends a new record, so repeated connects for one provider produce
/// duplicates.

use super::TenantScoped;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    Connected,
}

/// A provider connected to a tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    pub id: Uuid,
    pub tenant_id: Uuid,

    /// Provider slug as given in the connect path (e.g. "stripe")
    pub provider: String,

    pub status: IntegrationStatus,
    pub connected_at: DateTime<Utc>,
    pub last_sync: Option<DateTime<Utc>>,
}

impl Integration {
    /// Builds a freshly connected integration
    pub fn connected(id: Uuid, tenant_id: Uuid, provider: &str) -> Self {
        let now = Utc::now();
        Self {
            id,
            tenant_id,
            provider: provider.to_lowercase(),
            status: IntegrationStatus::Connected,
            connected_at: now,
            last_sync: Some(now),
        }
    }
}

impl TenantScoped for Integration {
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

    #[test]
    fn test_connected_integration() {
        let integration = Integration::connected(Uuid::new_v4(), Uuid::new_v4(), "HubSpot");
        assert_eq!(integration.provider, "hubspot");
        assert_eq!(integration.status, IntegrationStatus::Connected);
        assert_eq!(integration.last_sync, Some(integration.connected_at));
    }
}
