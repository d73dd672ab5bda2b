//! Session store: the single owner of the client's `Session`.
//!
//! SYSTEM CONTEXT
//! ==============
//! One store is created by the app shell, bootstrapped once, and handed to
//! every view through context. Views read the reactive mirror fed by
//! `subscribe`; only the operations here mutate the session.
//!
//! CONCURRENCY
//! ===========
//! Operations do not overlap: a busy flag rejects a second call with
//! `AuthError::InProgress`. `logout` is the exception. It always runs and
//! bumps an epoch so a response that lands afterwards is dropped instead of
//! writing stale credentials back into storage.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::error::AuthError;
use crate::net::api::{AccountApi, HttpAccountApi};
use crate::net::error::ApiError;
use crate::net::types::{AuthResponse, Credentials, RegistrationProfile, User};
use crate::state::session::{Session, SessionStatus, TransitionError};
use crate::util::storage::{self, ACCESS_TOKEN_KEY, KeyValueStore, LocalStorage, REFRESH_TOKEN_KEY, USER_KEY};

/// Store wired to `localStorage` and the HTTP account API.
pub type BrowserSessionStore = SessionStore<LocalStorage, HttpAccountApi>;

type Listener = Box<dyn Fn(&Session) + Send + Sync>;

/// Cheap-to-clone handle; clones share one session.
pub struct SessionStore<S, A> {
    inner: Arc<Inner<S, A>>,
}

struct Inner<S, A> {
    storage: S,
    api: A,
    session: Mutex<Session>,
    busy: AtomicBool,
    epoch: AtomicU64,
    bootstrapped: AtomicBool,
    listeners: Mutex<Vec<Listener>>,
}

impl<S, A> Clone for SessionStore<S, A> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

/// Clears the busy flag when the operation ends, however it ends.
pub(crate) struct OperationGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

impl<S, A> SessionStore<S, A>
where
    S: KeyValueStore,
    A: AccountApi,
{
    /// New store holding an `Unresolved` session.
    #[must_use]
    pub fn new(storage: S, api: A) -> Self {
        Self {
            inner: Arc::new(Inner {
                storage,
                api,
                session: Mutex::new(Session::new()),
                busy: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
                bootstrapped: AtomicBool::new(false),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Synchronous snapshot of the in-memory session.
    #[must_use]
    pub fn current_session(&self) -> Session {
        self.inner.session.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.inner.session.lock().unwrap_or_else(PoisonError::into_inner).status()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    /// Access token for an `Authorization: Bearer` header, if signed in.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        let session = self.inner.session.lock().unwrap_or_else(PoisonError::into_inner);
        if session.is_authenticated() { session.access_token().map(str::to_owned) } else { None }
    }

    /// Register a change listener. It runs after every mutation that changes
    /// the session and must not subscribe further listeners itself.
    pub fn subscribe(&self, listener: impl Fn(&Session) + Send + Sync + 'static) {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    /// Sign in with email and password.
    ///
    /// On failure the session and persisted storage are left as they were.
    ///
    /// # Errors
    ///
    /// `InProgress` while another operation (or the bootstrap) runs,
    /// `AlreadyAuthenticated` when signed in, otherwise the interpreted
    /// backend failure.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let (_guard, epoch) = self.begin_credentials_call()?;
        log::info!("session: login for {}", credentials.email);
        let result = self.inner.api.login(credentials).await;
        self.finish_credentials_call(epoch, result)
    }

    /// Create an account and sign in. The profile's role selects the endpoint.
    ///
    /// # Errors
    ///
    /// Same contract as [`SessionStore::login`].
    pub async fn register(&self, profile: &RegistrationProfile) -> Result<Session, AuthError> {
        let (_guard, epoch) = self.begin_credentials_call()?;
        log::info!("session: register {:?} account for {}", profile.role(), profile.email());
        let result = self.inner.api.register(profile).await;
        self.finish_credentials_call(epoch, result)
    }

    /// Clear persisted credentials and reset to `Anonymous`.
    ///
    /// Purely local, idempotent, and never fails.
    pub fn logout(&self) {
        self.inner.epoch.fetch_add(1, Ordering::AcqRel);
        storage::clear_session(&self.inner.storage);
        self.update(Session::reset_anonymous);
    }

    /// Canonical reaction to a 401 from any endpoint: forced logout.
    ///
    /// Returns the error the caller should surface.
    pub fn handle_unauthorized(&self) -> AuthError {
        if self.is_authenticated() {
            log::warn!("session: access token rejected, signing out");
        }
        self.logout();
        AuthError::ExpiredToken
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// `ExpiredToken` (after a forced logout) when there is no usable refresh
    /// token or the backend rejects it; `Network`/`Unexpected` leave the
    /// session as it was.
    pub async fn refresh_access_token(&self) -> Result<(), AuthError> {
        let _guard = self.begin_operation()?;
        let session = self.current_session();
        if !session.is_authenticated() {
            return Err(AuthError::ExpiredToken);
        }
        let Some(refresh_token) = session.refresh_token() else {
            return Err(self.handle_unauthorized());
        };

        let epoch = self.epoch();
        let result = self.inner.api.refresh(refresh_token).await;
        if self.epoch() != epoch {
            return Err(AuthError::Cancelled);
        }
        match result {
            Ok(tokens) => {
                self.persist_or_warn(|store| {
                    store.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
                    if let Some(refresh) = &tokens.refresh_token {
                        store.set(REFRESH_TOKEN_KEY, refresh)?;
                    }
                    Ok(())
                });
                self.update(|s| s.replace_tokens(tokens.access_token, tokens.refresh_token))
                    .map_err(transition_failure)
            }
            Err(err) => Err(self.token_call_failed(err)),
        }
    }

    /// Re-fetch the signed-in user's profile from `/accounts/me`.
    ///
    /// # Errors
    ///
    /// `ExpiredToken` (after a forced logout) on 401; other failures leave the
    /// session as it was.
    pub async fn reload_user(&self) -> Result<User, AuthError> {
        let _guard = self.begin_operation()?;
        let Some(token) = self.bearer_token() else {
            return Err(AuthError::ExpiredToken);
        };

        let epoch = self.epoch();
        let result = self.inner.api.current_user(&token).await;
        if self.epoch() != epoch {
            return Err(AuthError::Cancelled);
        }
        match result {
            Ok(user) => {
                self.persist_or_warn(|store| storage::save_json(store, USER_KEY, &user));
                self.update(|s| s.replace_user(user.clone())).map_err(transition_failure)?;
                Ok(user)
            }
            Err(err) => Err(self.token_call_failed(err)),
        }
    }

    // -- shared plumbing (also used by the bootstrapper) --------------------

    pub(crate) fn storage(&self) -> &S {
        &self.inner.storage
    }

    pub(crate) fn api(&self) -> &A {
        &self.inner.api
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::Acquire)
    }

    /// Returns `true` exactly once per store.
    pub(crate) fn claim_bootstrap(&self) -> bool {
        !self.inner.bootstrapped.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn begin_operation(&self) -> Result<OperationGuard<'_>, AuthError> {
        if self.inner.busy.swap(true, Ordering::AcqRel) {
            return Err(AuthError::InProgress);
        }
        Ok(OperationGuard { busy: &self.inner.busy })
    }

    /// Apply `f` to the session and notify listeners when it changed.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let (result, changed) = {
            let mut session = self.inner.session.lock().unwrap_or_else(PoisonError::into_inner);
            let before = session.clone();
            let result = f(&mut session);
            let changed = (*session != before).then(|| session.clone());
            (result, changed)
        };
        if let Some(session) = changed {
            log::debug!("session: status {:?}", session.status());
            let listeners = self.inner.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            for listener in listeners.iter() {
                listener(&session);
            }
        }
        result
    }

    /// Run a storage write; on failure log it and drop the partial set so the
    /// durable mirror is never half-written.
    pub(crate) fn persist_or_warn(&self, write: impl FnOnce(&S) -> Result<(), storage::StorageError>) {
        if let Err(e) = write(&self.inner.storage) {
            log::warn!("session: could not persist credentials: {e}");
            storage::clear_session(&self.inner.storage);
        }
    }

    fn begin_credentials_call(&self) -> Result<(OperationGuard<'_>, u64), AuthError> {
        let guard = self.begin_operation()?;
        match self.status() {
            SessionStatus::Authenticated => return Err(AuthError::AlreadyAuthenticated),
            SessionStatus::Unresolved | SessionStatus::Resolving => return Err(AuthError::InProgress),
            SessionStatus::Anonymous => {}
        }
        self.update(Session::begin_resolving).map_err(transition_failure)?;
        Ok((guard, self.epoch()))
    }

    fn finish_credentials_call(
        &self,
        epoch: u64,
        result: Result<AuthResponse, ApiError>,
    ) -> Result<Session, AuthError> {
        if self.epoch() != epoch {
            log::warn!("session: dropping credentials response after logout");
            return Err(AuthError::Cancelled);
        }
        match result {
            Ok(resp) => {
                self.persist_or_warn(|store| {
                    storage::persist_session(store, &resp.access_token, resp.refresh_token.as_deref(), &resp.user)
                });
                self.update(|s| s.authenticate(resp.access_token, resp.refresh_token, resp.user))
                    .map_err(transition_failure)?;
                Ok(self.current_session())
            }
            Err(err) => {
                log::warn!("session: credentials call failed: {err}");
                self.update(Session::reset_anonymous);
                Err(AuthError::from_credentials_call(err))
            }
        }
    }

    fn token_call_failed(&self, err: ApiError) -> AuthError {
        let err = AuthError::from_token_call(err);
        if err.forces_logout() {
            self.handle_unauthorized()
        } else {
            log::warn!("session: token call failed: {err}");
            err
        }
    }
}

fn transition_failure(err: TransitionError) -> AuthError {
    AuthError::Unexpected(err.to_string())
}
