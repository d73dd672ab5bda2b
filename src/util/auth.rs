//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store lives outside the reactive graph. `provide_session`
//! mirrors it into an `RwSignal<Session>` so views re-render on every status
//! change, and exposes both through context. Auth pages share the
//! signed-in redirect installed here.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::auth::guard::post_login_destination;
use crate::auth::store::BrowserSessionStore;
use crate::state::session::Session;

/// Provide the store and its reactive mirror to every descendant.
pub fn provide_session(store: BrowserSessionStore) -> RwSignal<Session> {
    let session = RwSignal::new(store.current_session());
    store.subscribe(move |next| session.set(next.clone()));
    provide_context(store);
    provide_context(session);
    session
}

/// Reactive session from context.
pub fn use_session() -> RwSignal<Session> {
    expect_context::<RwSignal<Session>>()
}

/// Session store from context, for views that run operations.
pub fn use_session_store() -> BrowserSessionStore {
    expect_context::<BrowserSessionStore>()
}

/// Where an auth page should send a visitor who is already signed in.
#[must_use]
pub fn signed_in_destination(session: &Session, next: Option<&str>) -> Option<String> {
    if !session.is_authenticated() {
        return None;
    }
    session.user().map(|user| post_login_destination(next, user.role))
}

/// Leave the login/register page once the session is authenticated.
pub fn install_signed_in_redirect<F>(session: RwSignal<Session>, next: Signal<Option<String>>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let state = session.get();
        let next = next.get();
        if let Some(to) = signed_in_destination(&state, next.as_deref()) {
            navigate(&to, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}

/// Delay between bootstrap attempts while another operation holds the store.
#[cfg(feature = "hydrate")]
const BOOTSTRAP_RETRY_MS: u32 = 100;

/// Run the one-shot bootstrap on the browser task queue, retrying until it
/// gets the store to itself.
#[cfg(feature = "hydrate")]
pub fn spawn_bootstrap(store: BrowserSessionStore) {
    use crate::auth::bootstrap::{BootstrapOutcome, bootstrap};

    leptos::task::spawn_local(async move {
        loop {
            match bootstrap(&store).await {
                BootstrapOutcome::Busy => {
                    log::debug!("bootstrap: store busy, retrying in {BOOTSTRAP_RETRY_MS} ms");
                    gloo_timers::future::TimeoutFuture::new(BOOTSTRAP_RETRY_MS).await;
                }
                BootstrapOutcome::Cleared(reason) => {
                    log::info!("session cleared at startup: {reason}");
                    break;
                }
                outcome => {
                    log::debug!("bootstrap finished: {outcome:?}");
                    break;
                }
            }
        }
    });
}
