//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the session mirror from Leptos context; none of them
//! mutate the session directly.

pub mod form_errors;
pub mod protected_route;
