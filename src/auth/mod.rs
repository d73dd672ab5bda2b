//! Client-side authentication: session store, startup bootstrap, route guard.
//!
//! ARCHITECTURE
//! ============
//! `store` owns the session and is the only writer. `bootstrap` reconciles
//! persisted tokens with the backend once per load. `guard` turns a session
//! snapshot into a render/redirect decision for protected views.

pub mod bootstrap;
pub mod error;
pub mod guard;
pub mod store;

#[cfg(test)]
mod test_support;

pub use bootstrap::{BootstrapOutcome, bootstrap};
pub use error::AuthError;
pub use guard::{GuardDecision, RouteAccess, decide};
pub use store::{BrowserSessionStore, SessionStore};
