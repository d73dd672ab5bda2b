//! Role dashboards and the `/` landing route.
//!
//! SYSTEM CONTEXT
//! ==============
//! These are the protected routes. Matching content is served by other
//! views; the dashboards here only show who is signed in and offer the
//! session actions (profile reload, sign out).

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::auth::error::AuthError;
use crate::auth::guard::RouteAccess;
use crate::components::form_errors::FormBanner;
use crate::components::protected_route::ProtectedRoute;
use crate::net::types::Role;
use crate::state::session::Session;
use crate::util::auth::{use_session, use_session_store};

/// The dashboard has no inputs; every error goes to the banner.
const NO_FIELDS: &[&str] = &[];

/// `/`: forwards any signed-in user to their role dashboard.
#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    Effect::new(move || {
        if let Some(home) = session.with(home_for) {
            navigate(home, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    view! {
        <ProtectedRoute access=RouteAccess::Authenticated>
            <div class="route-placeholder">"Opening your dashboard..."</div>
        </ProtectedRoute>
    }
}

#[component]
pub fn CandidateDashboardPage() -> impl IntoView {
    view! {
        <ProtectedRoute access=RouteAccess::Role(Role::Candidate)>
            <DashboardBody/>
        </ProtectedRoute>
    }
}

#[component]
pub fn CompanyDashboardPage() -> impl IntoView {
    view! {
        <ProtectedRoute access=RouteAccess::Role(Role::Company)>
            <DashboardBody/>
        </ProtectedRoute>
    }
}

#[component]
fn DashboardBody() -> impl IntoView {
    let session = use_session();
    let store = use_session_store();
    let error = RwSignal::new(None::<AuthError>);
    let busy = RwSignal::new(false);

    // The surrounding guard performs the one redirect to the login page.
    let logout_store = store.clone();
    let on_logout = move |_| logout_store.logout();

    let on_reload = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        error.set(None);

        #[cfg(feature = "hydrate")]
        {
            let store = store.clone();
            leptos::task::spawn_local(async move {
                if let Err(e) = store.reload_user().await {
                    error.set(Some(e));
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _unused = &store;
            busy.set(false);
        }
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-header">
                <h1>{move || session.with(greeting)}</h1>
                <span class="dashboard-header__role">{move || session.with(role_label)}</span>
                <button class="dashboard-button" on:click=on_reload disabled=move || busy.get()>
                    "Reload profile"
                </button>
                <button class="dashboard-button dashboard-button--secondary" on:click=on_logout>
                    "Sign out"
                </button>
            </header>
            <FormBanner error=error fields=NO_FIELDS/>
        </div>
    }
}

/// Dashboard route for a signed-in session.
pub(crate) fn home_for(session: &Session) -> Option<&'static str> {
    if !session.is_authenticated() {
        return None;
    }
    session.user().map(|user| user.role.home_path())
}

pub(crate) fn greeting(session: &Session) -> String {
    session
        .user()
        .map_or_else(String::new, |user| format!("Welcome, {}", user.display_name()))
}

fn role_label(session: &Session) -> &'static str {
    session.user().map_or("", |user| user.role.label())
}
