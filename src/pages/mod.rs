//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (form state, submit handling)
//! and delegates session changes to the store and gating to `ProtectedRoute`.

pub mod dashboard;
pub mod login;
pub mod register;
