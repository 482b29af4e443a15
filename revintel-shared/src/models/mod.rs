/// Domain models for RevIntel
///
/// # Models
///
/// - `user`: user accounts and credentials
/// - `client`: client (tenant) accounts
/// - `revenue`: revenue ledger records
/// - `insight`: generated insights
/// - `integration`: connected third-party providers
/// - `job`: insight generation jobs

pub mod client;
pub mod insight;
pub mod integration;
pub mod job;
pub mod revenue;
pub mod user;

use uuid::Uuid;

/// A record tagged with the tenant allowed to see it
///
/// Implemented by every model stored in a
/// [`TenantRepository`](crate::store::TenantRepository).
pub trait TenantScoped: Clone + Send + Sync + 'static {
    /// Unique record id
    fn id(&self) -> Uuid;

    /// Tenant the record is visible to
    fn tenant_id(&self) -> Uuid;
}
