//! Session data model and its status state machine.
//!
//! DESIGN
//! ======
//! Fields are private so `Authenticated` is reachable only through
//! `authenticate`, which always supplies a token and a user together.
//!
//! ```text
//! Unresolved -> Resolving -> { Authenticated, Anonymous }
//! Unresolved -> Anonymous                      (no persisted token)
//! Anonymous  -> Resolving                      (login / register)
//! Authenticated -> Anonymous                   (logout / invalidation)
//! ```

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;

use crate::net::types::User;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// Process just started; persisted credentials not yet examined.
    #[default]
    Unresolved,
    /// A bootstrap check or a login/register call is in flight.
    Resolving,
    Authenticated,
    Anonymous,
}

impl SessionStatus {
    /// True until the status settles on `Authenticated` or `Anonymous`.
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Unresolved | Self::Resolving)
    }

    /// Whether `self -> next` is an edge of the state machine.
    ///
    /// Every state may fall back to `Anonymous`; `Anonymous -> Anonymous` is
    /// the idempotent logout.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Unresolved | Self::Anonymous, Self::Resolving)
                | (Self::Resolving, Self::Authenticated)
                | (_, Self::Anonymous)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid session transition {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: SessionStatus,
    pub to: SessionStatus,
}

/// The client's authentication state: tokens, user, and status.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<User>,
    status: SessionStatus,
}

impl Session {
    /// Fresh session at process start (`Unresolved`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settled session with no credentials.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { status: SessionStatus::Anonymous, ..Self::default() }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    fn check(&self, to: SessionStatus) -> Result<(), TransitionError> {
        if self.status.can_transition_to(to) {
            Ok(())
        } else {
            Err(TransitionError { from: self.status, to })
        }
    }

    /// Enter `Resolving` ahead of a bootstrap check or credentials call.
    ///
    /// # Errors
    ///
    /// Fails unless the session is `Unresolved` or `Anonymous`.
    pub fn begin_resolving(&mut self) -> Result<(), TransitionError> {
        self.check(SessionStatus::Resolving)?;
        self.status = SessionStatus::Resolving;
        Ok(())
    }

    /// Settle on `Authenticated` with the given credentials.
    ///
    /// # Errors
    ///
    /// Fails unless the session is `Resolving`.
    pub fn authenticate(
        &mut self,
        access_token: String,
        refresh_token: Option<String>,
        user: User,
    ) -> Result<(), TransitionError> {
        self.check(SessionStatus::Authenticated)?;
        *self = Self {
            access_token: Some(access_token),
            refresh_token,
            user: Some(user),
            status: SessionStatus::Authenticated,
        };
        Ok(())
    }

    /// Drop all credentials and settle on `Anonymous`. Valid from every state.
    pub fn reset_anonymous(&mut self) {
        *self = Self::anonymous();
    }

    /// Swap in refreshed tokens. A `None` refresh token keeps the current one.
    ///
    /// # Errors
    ///
    /// Fails unless the session is `Authenticated`.
    pub fn replace_tokens(&mut self, access_token: String, refresh_token: Option<String>) -> Result<(), TransitionError> {
        self.require_authenticated()?;
        self.access_token = Some(access_token);
        if refresh_token.is_some() {
            self.refresh_token = refresh_token;
        }
        Ok(())
    }

    /// Swap in a freshly fetched profile.
    ///
    /// # Errors
    ///
    /// Fails unless the session is `Authenticated`.
    pub fn replace_user(&mut self, user: User) -> Result<(), TransitionError> {
        self.require_authenticated()?;
        self.user = Some(user);
        Ok(())
    }

    fn require_authenticated(&self) -> Result<(), TransitionError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(TransitionError { from: self.status, to: SessionStatus::Authenticated })
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status)
            .field("user", &self.user.as_ref().map(|u| &u.email))
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
