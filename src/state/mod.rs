//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! Only the session lives here. Page-local form state stays in the pages as
//! signals since nothing outside a form reads it.

pub mod session;
