//! # RevIntel Shared Library
//!
//! Types, storage, and business logic shared by the RevIntel API server and
//! the insight worker.
//!
//! ## Module Organization
//!
//! - `models`: domain records (users, clients, revenue, insights, jobs)
//! - `store`: repository traits and their in-memory backends
//! - `ids`: injectable id generation
//! - `auth`: password hashing, JWTs, API keys, bearer authentication
//! - `analytics`: summary, forecast, attribution, churn, and SEO computations

pub mod analytics;
pub mod auth;
pub mod ids;
pub mod models;
pub mod store;

/// Current version of the RevIntel shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
