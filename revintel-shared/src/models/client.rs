/// Client (tenant) model
///
/// A client is a customer account. Clients created at registration own
/// themselves (`owner_tenant_id == id`); clients created through the API are
/// owned by the caller's tenant and only visible to it.
///
/// # Example
///
/// ```
/// use revintel_shared::models::client::{Client, ClientPlan, ClientStatus, CreateClient};
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// let client = Client::new(Uuid::new_v4(), owner, CreateClient {
///     company_name: "Acme Corp".to_string(),
///     domain: Some("acme.io".to_string()),
///     industry: None,
///     plan: ClientPlan::Professional,
/// });
///
/// assert_eq!(client.status, ClientStatus::Trial);
/// assert_eq!(client.health_score, 85);
/// assert_eq!(client.mrr, 0.0);
/// ```

use super::TenantScoped;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health score assigned to every new client
pub const DEFAULT_HEALTH_SCORE: u8 = 85;

/// Subscription plan tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientPlan {
    /// Entry tier
    #[default]
    Starter,

    /// Mid tier
    Professional,

    /// Custom contract
    Enterprise,
}

/// Account lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    /// Newly created, not yet paying
    Trial,

    /// Paying customer
    Active,

    /// Cancelled
    Churned,
}

/// Client account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique client ID; doubles as the tenant id for self-owned accounts
    pub id: Uuid,

    /// Tenant that can see and manage this client
    pub owner_tenant_id: Uuid,

    /// Company display name
    pub company_name: String,

    /// Primary web domain
    pub domain: Option<String>,

    /// Industry vertical
    pub industry: Option<String>,

    /// Current plan
    pub plan: ClientPlan,

    /// Monthly recurring revenue
    pub mrr: f64,

    /// Annual recurring revenue
    pub arr: f64,

    /// Lifecycle status
    pub status: ClientStatus,

    /// Health score (0-100)
    pub health_score: u8,

    /// Whether onboarding has been completed
    pub onboarding_completed: bool,

    /// SHA-256 hash of the API key issued at creation
    #[serde(skip_serializing)]
    pub api_key_hash: Option<String>,

    /// When the client was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClient {
    pub company_name: String,
    pub domain: Option<String>,
    pub industry: Option<String>,
    pub plan: ClientPlan,
}

impl Client {
    /// Builds a new trial client with zero revenue and the default health score
    pub fn new(id: Uuid, owner_tenant_id: Uuid, data: CreateClient) -> Self {
        Self {
            id,
            owner_tenant_id,
            company_name: data.company_name,
            domain: data.domain,
            industry: data.industry,
            plan: data.plan,
            mrr: 0.0,
            arr: 0.0,
            status: ClientStatus::Trial,
            health_score: DEFAULT_HEALTH_SCORE,
            onboarding_completed: false,
            api_key_hash: None,
            created_at: Utc::now(),
        }
    }

    /// Builds a client that owns itself, as created at registration
    pub fn new_tenant(id: Uuid, data: CreateClient) -> Self {
        Self::new(id, id, data)
    }
}

impl TenantScoped for Client {
    fn id(&self) -> Uuid {
        self.id
    }

    fn tenant_id(&self) -> Uuid {
        self.owner_tenant_id
    }
}
