//! Route gating decisions for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! `components::protected_route` renders from these decisions; keeping them
//! as plain functions lets the redirect rules be tested without a router.
//! A pending session always yields `Pending`, never a redirect, so a reload
//! with a valid token does not bounce through the login page.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::error::AuthError;
use crate::net::types::Role;
use crate::state::session::{Session, SessionStatus};

pub const LOGIN_ROUTE: &str = "/login";
pub const REGISTER_ROUTE: &str = "/register";
const NEXT_PARAM: &str = "next";

/// Who may see a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteAccess {
    /// Any signed-in account.
    Authenticated,
    /// Only accounts of this role.
    Role(Role),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not settled; show a placeholder.
    Pending,
    Render,
    /// Anonymous visitor; replace the location with the login route.
    RedirectToLogin { to: String },
    /// Signed in with the wrong role; send the user to their own home.
    Denied { required: Role, redirect: String },
}

impl GuardDecision {
    /// Error to surface for a denial, if this is one.
    #[must_use]
    pub fn denial(&self) -> Option<AuthError> {
        match self {
            Self::Denied { required, .. } => Some(AuthError::Permission { required: *required }),
            _ => None,
        }
    }

    /// Location to navigate to, if any.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::RedirectToLogin { to } => Some(to),
            Self::Denied { redirect, .. } => Some(redirect),
            Self::Pending | Self::Render => None,
        }
    }
}

/// Decide what a guarded view should do for `session`.
///
/// `attempted` is the path the visitor asked for; it is carried to the login
/// route as `?next=` so a successful sign-in can return there.
#[must_use]
pub fn decide(session: &Session, access: RouteAccess, attempted: Option<&str>) -> GuardDecision {
    match session.status() {
        SessionStatus::Unresolved | SessionStatus::Resolving => GuardDecision::Pending,
        SessionStatus::Anonymous => GuardDecision::RedirectToLogin { to: login_route(attempted) },
        SessionStatus::Authenticated => {
            let Some(user) = session.user() else {
                return GuardDecision::RedirectToLogin { to: login_route(attempted) };
            };
            match access {
                RouteAccess::Role(required) if user.role != required => GuardDecision::Denied {
                    required,
                    redirect: user.role.home_path().to_owned(),
                },
                _ => GuardDecision::Render,
            }
        }
    }
}

/// Login route, with `next` when `attempted` is a safe return path.
#[must_use]
pub fn login_route(attempted: Option<&str>) -> String {
    match attempted.filter(|path| is_safe_return_path(path)) {
        Some(path) => format!("{LOGIN_ROUTE}?{NEXT_PARAM}={}", urlencoding::encode(path)),
        None => LOGIN_ROUTE.to_owned(),
    }
}

/// Where to go after signing in: the requested `next` path when safe and
/// open to `role`, otherwise the role's dashboard.
///
/// A `next` left over from another account's session (say `/candidate`
/// after a company signs in) would only bounce off the guard, so it is
/// dropped here.
#[must_use]
pub fn post_login_destination(next: Option<&str>, role: Role) -> String {
    next.filter(|path| is_safe_return_path(path) && !reserved_for_other_role(path, role))
        .map_or_else(|| role.home_path().to_owned(), str::to_owned)
}

fn reserved_for_other_role(path: &str, role: Role) -> bool {
    let other = match role {
        Role::Candidate => Role::Company,
        Role::Company => Role::Candidate,
    };
    let route = path.split(['?', '#']).next().unwrap_or_default();
    let home = other.home_path();
    route == home || route.strip_prefix(home).is_some_and(|rest| rest.starts_with('/'))
}

/// Same-origin absolute path that is not itself an auth page.
///
/// Rejects protocol-relative (`//host`) and backslash tricks so `next`
/// cannot send the user off-site. Control characters and whitespace are
/// refused outright: URL parsers drop tab and newline, which would turn
/// `/\t/host` into `//host`.
#[must_use]
pub fn is_safe_return_path(path: &str) -> bool {
    if path.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return false;
    }
    if !path.starts_with('/') || path.starts_with("//") || path.contains('\\') || path.contains("://") {
        return false;
    }
    let route = path.split(['?', '#']).next().unwrap_or_default();
    route != LOGIN_ROUTE && route != REGISTER_ROUTE
}
