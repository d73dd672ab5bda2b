//! Account API collaborator.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, each raced against
//! the configured timeout.
//! Server-side (SSR) and tests: `HttpAccountApi` returns
//! `ApiError::Unavailable`; the session layer talks to `AccountApi` so tests
//! substitute their own backend.
//!
//! ERROR HANDLING
//! ==============
//! Every outcome is a `Result`; status codes and error bodies are folded into
//! `ApiError` by `classify_response` so callers never inspect raw responses.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;

use super::error::ApiError;
use super::types::{AuthResponse, Credentials, RefreshResponse, RegistrationProfile, Role, User};
use crate::config::ClientConfig;

pub const LOGIN_PATH: &str = "/accounts/login";
pub const CURRENT_USER_PATH: &str = "/accounts/me";
pub const REFRESH_PATH: &str = "/accounts/token/refresh";

#[must_use]
pub fn register_path(role: Role) -> String {
    format!("/accounts/register/{}", role.path_segment())
}

#[cfg(any(test, feature = "hydrate"))]
fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Remote account endpoints used by the session layer.
#[async_trait(?Send)]
pub trait AccountApi {
    /// `POST /accounts/login`.
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    /// `POST /accounts/register/{role}`.
    async fn register(&self, profile: &RegistrationProfile) -> Result<AuthResponse, ApiError>;

    /// `GET /accounts/me` with `access_token` as bearer credential.
    async fn current_user(&self, access_token: &str) -> Result<User, ApiError>;

    /// `POST /accounts/token/refresh`.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError>;
}

/// `AccountApi` over HTTP against `ClientConfig::api_base_url`.
#[derive(Clone, Debug)]
pub struct HttpAccountApi {
    config: ClientConfig,
}

impl HttpAccountApi {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[cfg(feature = "hydrate")]
    async fn exchange<T: serde::de::DeserializeOwned>(
        &self,
        request: Result<gloo_net::http::Request, gloo_net::Error>,
    ) -> Result<T, ApiError> {
        use futures::future::{Either, select};

        let timeout_ms = self.config.request_timeout_ms;
        let request = request.map_err(|e| ApiError::Network(e.to_string()))?;
        let call = async move {
            let resp = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
            let status = resp.status();
            let body = resp.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
            super::error::classify_response::<T>(status, &body)
        };
        let timeout = gloo_timers::future::TimeoutFuture::new(timeout_ms);
        futures::pin_mut!(call);
        match select(call, timeout).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                log::warn!("request timed out after {timeout_ms} ms");
                Err(ApiError::Timeout(timeout_ms))
            }
        }
    }
}

#[async_trait(?Send)]
impl AccountApi for HttpAccountApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = self.config.endpoint(LOGIN_PATH);
            self.exchange(gloo_net::http::Request::post(&url).json(credentials)).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _unused = credentials;
            Err(ApiError::Unavailable)
        }
    }

    async fn register(&self, profile: &RegistrationProfile) -> Result<AuthResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = self.config.endpoint(&register_path(profile.role()));
            self.exchange(gloo_net::http::Request::post(&url).json(&profile.payload())).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _unused = profile;
            Err(ApiError::Unavailable)
        }
    }

    async fn current_user(&self, access_token: &str) -> Result<User, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = self.config.endpoint(CURRENT_USER_PATH);
            let request = gloo_net::http::Request::get(&url)
                .header("Authorization", &bearer(access_token))
                .build();
            self.exchange(request).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _unused = access_token;
            Err(ApiError::Unavailable)
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = self.config.endpoint(REFRESH_PATH);
            let payload = serde_json::json!({ "refresh": refresh_token });
            self.exchange(gloo_net::http::Request::post(&url).json(&payload)).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _unused = refresh_token;
            Err(ApiError::Unavailable)
        }
    }
}
