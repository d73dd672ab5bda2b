//! Networking modules for the account REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the calls, `error` normalizes failures, and `types` defines
//! the wire schema shared with the backend.

pub mod api;
pub mod error;
pub mod types;
