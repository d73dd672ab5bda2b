//! Wire DTOs for the account API boundary.
//!
//! DESIGN
//! ======
//! Backends in this platform disagree on naming (`accessToken` vs `access`)
//! and on id encoding (number vs string). The aliases and the lenient
//! `UserId` deserializer absorb those differences here so the session layer
//! only ever sees one shape.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Account role. Selects registration endpoint, payload shape, and home view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Candidate,
    Company,
}

impl Role {
    /// Path segment used by `POST /accounts/register/{role}`.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Company => "company",
        }
    }

    /// Dashboard route for accounts of this role.
    #[must_use]
    pub fn home_path(self) -> &'static str {
        match self {
            Self::Candidate => "/candidate",
            Self::Company => "/company",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Candidate => "Candidate",
            Self::Company => "Company",
        }
    }
}

/// Opaque account identifier. Accepts a JSON number or string on input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(id) if !id.is_empty() => Ok(Self(id)),
            serde_json::Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    return Ok(Self(int.to_string()));
                }
                if let Some(uint) = number.as_u64() {
                    return Ok(Self(uint.to_string()));
                }
                Err(D::Error::custom("expected integer id"))
            }
            _ => Err(D::Error::custom("expected non-empty string or integer id")),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated account as returned by login, register, and `/accounts/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier.
    pub id: UserId,
    /// Login email address.
    pub email: String,
    /// Candidate or company account.
    pub role: Role,
    /// Given name (candidate accounts).
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    /// Family name (candidate accounts).
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    /// Registered company name (company accounts).
    #[serde(default, alias = "companyName")]
    pub company_name: Option<String>,
}

impl User {
    /// Name shown in headers and greetings.
    ///
    /// Company accounts use the company name; candidates use their full name.
    /// Falls back to the email address when the profile fields are blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.role == Role::Company {
            if let Some(name) = non_blank(self.company_name.as_deref()) {
                return name.to_owned();
            }
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .filter_map(non_blank)
            .collect();
        if parts.is_empty() {
            self.email.clone()
        } else {
            parts.join(" ")
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Email + password pair. Held only for the duration of a login call.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Candidate sign-up payload.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CandidateProfile {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Company sign-up payload.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CompanyProfile {
    pub email: String,
    pub password: String,
    pub company_name: String,
}

/// Registration request; the variant decides endpoint and payload shape.
#[derive(Clone, PartialEq, Eq)]
pub enum RegistrationProfile {
    Candidate(CandidateProfile),
    Company(CompanyProfile),
}

impl RegistrationProfile {
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::Candidate(_) => Role::Candidate,
            Self::Company(_) => Role::Company,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::Candidate(p) => &p.email,
            Self::Company(p) => &p.email,
        }
    }

    /// JSON body sent to the role-specific registration endpoint.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        match self {
            Self::Candidate(p) => serde_json::json!({
                "email": p.email,
                "password": p.password,
                "first_name": p.first_name,
                "last_name": p.last_name,
            }),
            Self::Company(p) => serde_json::json!({
                "email": p.email,
                "password": p.password,
                "company_name": p.company_name,
            }),
        }
    }
}

impl fmt::Debug for RegistrationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationProfile")
            .field("role", &self.role())
            .field("email", &self.email())
            .finish_non_exhaustive()
    }
}

/// Successful login/register body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(alias = "accessToken", alias = "access")]
    pub access_token: String,
    #[serde(default, alias = "refreshToken", alias = "refresh")]
    pub refresh_token: Option<String>,
    pub user: User,
}

/// Successful token refresh body. Rotation of the refresh token is optional.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    #[serde(alias = "accessToken", alias = "access")]
    pub access_token: String,
    #[serde(default, alias = "refreshToken", alias = "refresh")]
    pub refresh_token: Option<String>,
}
