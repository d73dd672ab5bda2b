//! Scripted `AccountApi` and fixtures shared by the auth tests.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::store::SessionStore;
use crate::net::api::AccountApi;
use crate::net::error::{ApiError, FieldErrors};
use crate::net::types::{AuthResponse, Credentials, RefreshResponse, RegistrationProfile, Role, User, UserId};
use crate::util::storage::MemoryStorage;

pub(crate) type TestStore = SessionStore<MemoryStorage, FakeAccountApi>;

type Hook = Box<dyn Fn() + Send + Sync>;

/// Backend double: fixed result per endpoint, call log, optional mid-call hook.
pub(crate) struct FakeAccountApi {
    pub login: Result<AuthResponse, ApiError>,
    pub register: Result<AuthResponse, ApiError>,
    pub current_user: Result<User, ApiError>,
    pub refresh: Result<RefreshResponse, ApiError>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub hook: Mutex<Option<Hook>>,
}

impl Default for FakeAccountApi {
    fn default() -> Self {
        Self {
            login: Err(ApiError::Unavailable),
            register: Err(ApiError::Unavailable),
            current_user: Err(ApiError::Unavailable),
            refresh: Err(ApiError::Unavailable),
            calls: Arc::default(),
            hook: Mutex::new(None),
        }
    }
}

impl FakeAccountApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Run `hook` while the next call is "in flight".
    pub fn set_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.hook.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(hook));
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
        let hook = self.hook.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(hook) = hook {
            hook();
        }
    }
}

#[async_trait(?Send)]
impl AccountApi for FakeAccountApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.record(format!("POST /accounts/login {}", credentials.email));
        self.login.clone()
    }

    async fn register(&self, profile: &RegistrationProfile) -> Result<AuthResponse, ApiError> {
        self.record(format!("POST /accounts/register/{} {}", profile.role().path_segment(), profile.email()));
        self.register.clone()
    }

    async fn current_user(&self, access_token: &str) -> Result<User, ApiError> {
        self.record(format!("GET /accounts/me Bearer {access_token}"));
        self.current_user.clone()
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        self.record(format!("POST /accounts/token/refresh {refresh_token}"));
        self.refresh.clone()
    }
}

pub(crate) fn candidate(email: &str) -> User {
    User {
        id: UserId("1".to_owned()),
        email: email.to_owned(),
        role: Role::Candidate,
        first_name: None,
        last_name: None,
        company_name: None,
    }
}

pub(crate) fn company(email: &str) -> User {
    User {
        id: UserId("2".to_owned()),
        email: email.to_owned(),
        role: Role::Company,
        first_name: None,
        last_name: None,
        company_name: Some("Acme".to_owned()),
    }
}

pub(crate) fn auth_response(access: &str, refresh: &str, user: User) -> AuthResponse {
    AuthResponse {
        access_token: access.to_owned(),
        refresh_token: Some(refresh.to_owned()),
        user,
    }
}

pub(crate) fn unauthorized(detail: &str) -> ApiError {
    ApiError::Unauthorized(FieldErrors::message(detail))
}

pub(crate) fn store_with(api: FakeAccountApi) -> (TestStore, MemoryStorage) {
    let storage = MemoryStorage::default();
    (SessionStore::new(storage.clone(), api), storage)
}
