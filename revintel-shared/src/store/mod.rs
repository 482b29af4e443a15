/// Storage interfaces
///
/// Handlers never touch a concrete map: they go through the traits defined
/// here, so an in-memory backend (used by the server and in tests) can be
/// replaced by a persistent one without touching handler logic.
///
/// # Traits
///
/// - [`TenantRepository`]: get/insert/update/list for records tagged with a tenant id
/// - [`UserStore`]: the credential store, keyed by normalized email
///
/// # Example
///
/// ```
/// use revintel_shared::store::Stores;
/// use revintel_shared::models::integration::Integration;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stores = Stores::in_memory();
/// let tenant_id = Uuid::new_v4();
///
/// stores
///     .integrations
///     .insert(Integration::connected(Uuid::new_v4(), tenant_id, "stripe"))
///     .await?;
///
/// assert_eq!(stores.integrations.list(tenant_id).await?.len(), 1);
/// assert!(stores.integrations.list(Uuid::new_v4()).await?.is_empty());
/// # Ok(())
/// # }
/// ```

pub mod memory;

use crate::models::{
    client::Client, insight::Insight, integration::Integration, job::InsightJob,
    revenue::RevenueRecord, user::User, TenantScoped,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub use memory::{MemoryRepository, MemoryUserStore};

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record with the same unique key already exists
    #[error("Duplicate key: {0}")]
    Conflict(String),

    /// The record to update does not exist
    #[error("Record not found: {0}")]
    NotFound(Uuid),
}

/// Storage result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Repository for records tagged with a tenant id
///
/// Every tenant-facing read takes the caller's tenant id, so records of one
/// tenant are never returned to another.
#[async_trait]
pub trait TenantRepository<T: TenantScoped>: Send + Sync {
    /// Inserts a new record, failing with `Conflict` if the id is taken
    async fn insert(&self, record: T) -> StoreResult<()>;

    /// Replaces an existing record, failing with `NotFound` if absent
    async fn update(&self, record: T) -> StoreResult<()>;

    /// Fetches a record visible to `tenant_id`
    async fn get(&self, tenant_id: Uuid, id: Uuid) -> StoreResult<Option<T>>;

    /// Fetches a record regardless of tenant
    ///
    /// Only for internal lookups (worker, registration); never expose the
    /// result to a tenant without checking ownership.
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<T>>;

    /// Lists records visible to `tenant_id` in insertion order
    async fn list(&self, tenant_id: Uuid) -> StoreResult<Vec<T>>;

    /// Counts all records in the store
    async fn count(&self) -> StoreResult<usize>;
}

/// Credential store keyed by normalized email
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user, failing with `Conflict` if the email is already taken
    ///
    /// The existence check and the insert happen atomically.
    async fn insert(&self, user: User) -> StoreResult<()>;

    /// Looks up a user by email (normalized before lookup)
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Counts all users
    async fn count(&self) -> StoreResult<usize>;
}

/// The full set of stores used by the application
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub clients: Arc<dyn TenantRepository<Client>>,
    pub revenue: Arc<dyn TenantRepository<RevenueRecord>>,
    pub insights: Arc<dyn TenantRepository<Insight>>,
    pub integrations: Arc<dyn TenantRepository<Integration>>,
    pub jobs: Arc<dyn TenantRepository<InsightJob>>,
}

impl Stores {
    /// Creates empty process-local stores
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            clients: Arc::new(MemoryRepository::new("clients")),
            revenue: Arc::new(MemoryRepository::new("revenue")),
            insights: Arc::new(MemoryRepository::new("insights")),
            integrations: Arc::new(MemoryRepository::new("integrations")),
            jobs: Arc::new(MemoryRepository::new("jobs")),
        }
    }
}
