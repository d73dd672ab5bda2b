//! Startup reconciliation of persisted credentials with the backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs once, right after the app shell creates the store. The persisted
//! token is only a hint: it is revalidated against `/accounts/me` before the
//! session becomes `Authenticated`. The cached user blob is never trusted on
//! its own; it is rewritten from the response.
//!
//! There is no retry. Any failure clears storage and settles on `Anonymous`,
//! and the HTTP layer's timeout bounds how long `Resolving` can last.

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod bootstrap_test;

use super::error::AuthError;
use super::store::SessionStore;
use crate::net::api::AccountApi;
use crate::state::session::Session;
use crate::util::storage::{self, ACCESS_TOKEN_KEY, KeyValueStore, REFRESH_TOKEN_KEY, USER_KEY};

/// How a bootstrap run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No persisted token; settled on `Anonymous` without a request.
    NoToken,
    /// Token accepted; session is `Authenticated`.
    Restored,
    /// Validation failed; storage cleared and session `Anonymous`.
    Cleared(AuthError),
    /// A logout landed while validation was in flight.
    Cancelled,
    /// This store was already bootstrapped; nothing was done.
    AlreadyRan,
    /// Another session operation held the store. The run was not claimed,
    /// so the caller should try again once that operation finishes.
    Busy,
}

/// Reconcile persisted credentials with backend truth, at most once per store.
pub async fn bootstrap<S, A>(store: &SessionStore<S, A>) -> BootstrapOutcome
where
    S: KeyValueStore,
    A: AccountApi,
{
    let Ok(_guard) = store.begin_operation() else {
        return BootstrapOutcome::Busy;
    };
    if !store.claim_bootstrap() {
        return BootstrapOutcome::AlreadyRan;
    }

    let storage = store.storage();
    storage::clear_legacy(storage);

    let Some(token) = storage::load_token(storage, ACCESS_TOKEN_KEY) else {
        storage::clear_session(storage);
        store.update(Session::reset_anonymous);
        log::info!("bootstrap: no persisted token");
        return BootstrapOutcome::NoToken;
    };

    if let Err(e) = store.update(Session::begin_resolving) {
        log::warn!("bootstrap: {e}");
        return BootstrapOutcome::AlreadyRan;
    }

    let epoch = store.epoch();
    let result = store.api().current_user(&token).await;
    if store.epoch() != epoch {
        return BootstrapOutcome::Cancelled;
    }

    match result {
        Ok(user) => {
            let refresh_token = storage::load_token(storage, REFRESH_TOKEN_KEY);
            store.persist_or_warn(|s| storage::save_json(s, USER_KEY, &user));
            match store.update(|s| s.authenticate(token, refresh_token, user)) {
                Ok(()) => {
                    log::info!("bootstrap: session restored");
                    BootstrapOutcome::Restored
                }
                Err(e) => clear(store, AuthError::Unexpected(e.to_string())),
            }
        }
        Err(err) => {
            log::warn!("bootstrap: persisted token rejected: {err}");
            clear(store, AuthError::from_token_call(err))
        }
    }
}

fn clear<S, A>(store: &SessionStore<S, A>, reason: AuthError) -> BootstrapOutcome
where
    S: KeyValueStore,
    A: AccountApi,
{
    storage::clear_session(store.storage());
    store.update(Session::reset_anonymous);
    BootstrapOutcome::Cleared(reason)
}
