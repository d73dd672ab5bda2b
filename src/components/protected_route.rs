//! Wrapper that gates a view on the session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route renders through this component. It recomputes a
//! `GuardDecision` whenever the session mirror or the location changes,
//! navigates (replacing history) on redirects, and shows a placeholder for
//! anything other than `Render`.

#[cfg(test)]
#[path = "protected_route_test.rs"]
mod protected_route_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::auth::guard::{GuardDecision, RouteAccess, decide};
use crate::util::auth::use_session;

/// Render `children` only once the session allows it.
#[component]
pub fn ProtectedRoute(access: RouteAccess, children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let location = use_location();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| {
        let attempted = attempted_path(&location.pathname.get(), &location.search.get());
        decide(&session.get(), access, Some(&attempted))
    });

    Effect::new(move || {
        let decision = decision.get();
        if let Some(err) = decision.denial() {
            log::warn!("route guard: {err}");
        }
        if let Some(to) = decision.redirect_target() {
            navigate(to, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    view! {
        <Show
            when=move || decision.get() == GuardDecision::Render
            fallback=move || {
                view! { <div class="route-placeholder">{move || placeholder_text(&decision.get())}</div> }
            }
        >
            {children()}
        </Show>
    }
}

/// Path plus query string, tolerating a search with or without its `?`.
pub(crate) fn attempted_path(pathname: &str, search: &str) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() { pathname.to_owned() } else { format!("{pathname}?{search}") }
}

pub(crate) fn placeholder_text(decision: &GuardDecision) -> &'static str {
    match decision {
        GuardDecision::Pending => "Loading...",
        GuardDecision::RedirectToLogin { .. } => "Redirecting to login...",
        GuardDecision::Denied { .. } => "Access denied. Redirecting...",
        GuardDecision::Render => "",
    }
}
