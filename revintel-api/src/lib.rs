//! # RevIntel API Server Library
//!
//! Core of the RevIntel revenue intelligence API: multi-tenant revenue
//! analytics, client management, and asynchronous insight generation.
//!
//! ## Modules
//!
//! - `app`: Application state, service wiring, and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Response hardening layers
//! - `routes`: API route handlers
//! - `seed`: Demo data for local runs

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod seed;
