//! # RevIntel Worker Library
//!
//! Background insight generation. The API enqueues jobs through
//! [`queue::InsightQueue`]; an [`orchestrator::InsightWorker`] running on the
//! same runtime waits out a fixed delay, asks an
//! [`generator::InsightGenerator`] for the insight, and records the outcome on
//! the job.
//!
//! ## Modules
//!
//! - `queue`: job creation and the channel feeding the worker
//! - `generator`: insight generators
//! - `orchestrator`: the worker loop and per-job execution

pub mod generator;
pub mod orchestrator;
pub mod queue;
