//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from page and component
//! logic: `storage` wraps `localStorage`, `auth` wires the session store into
//! Leptos context.

pub mod auth;
pub mod storage;
