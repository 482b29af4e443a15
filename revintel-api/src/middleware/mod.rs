/// Middleware modules for the API server
///
/// Bearer authentication lives in [`crate::app`] because it needs the
/// application state. This module holds the state-free layers.

pub mod security;
