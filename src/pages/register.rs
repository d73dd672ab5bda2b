//! Registration page with a candidate/company toggle.
//!
//! The selected role decides which profile fields are shown, which backend
//! endpoint is called, and the payload shape. As with login, navigation
//! after success is left to the signed-in redirect.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use super::login::email_problem;
use crate::auth::error::AuthError;
use crate::auth::guard::LOGIN_ROUTE;
use crate::components::form_errors::{FieldMessages, FormBanner};
use crate::net::error::FieldErrors;
use crate::net::types::{CandidateProfile, CompanyProfile, RegistrationProfile, Role};
use crate::util::auth::{install_signed_in_redirect, use_session, use_session_store};

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

/// Inputs that show their own messages.
pub(crate) const REGISTER_FIELDS: &[&str] =
    &["email", "password", "confirm_password", "first_name", "last_name", "company_name"];

/// Raw form values as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RegistrationForm {
    pub role: Role,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let session = use_session();
    let store = use_session_store();
    let query = use_query_map();
    let next = Signal::derive(move || query.with(|q| q.get("next")));
    install_signed_in_redirect(session, next, use_navigate());

    let form = RwSignal::new(RegistrationForm::default());
    let error = RwSignal::new(None::<AuthError>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let profile = match validate_registration(&form.get()) {
            Ok(profile) => profile,
            Err(errors) => {
                error.set(Some(AuthError::Invalid(errors)));
                return;
            }
        };
        error.set(None);
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            let store = store.clone();
            leptos::task::spawn_local(async move {
                if let Err(e) = store.register(&profile).await {
                    error.set(Some(e));
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _unused = (&store, profile);
            busy.set(false);
        }
    };

    let role_button = move |role: Role| {
        view! {
            <button
                type="button"
                class="role-toggle__option"
                class=("role-toggle__option--active", move || form.with(|f| f.role == role))
                on:click=move |_| {
                    form.update(|f| f.role = role);
                    error.set(None);
                }
            >
                {role.label()}
            </button>
        }
    };

    let text_input = move |field: &'static str, kind: &'static str, placeholder: &'static str| {
        view! {
            <input
                class="auth-input"
                type=kind
                placeholder=placeholder
                prop:value=move || form.with(|f| f.value(field).to_owned())
                on:input=move |ev| form.update(|f| f.set_value(field, event_target_value(&ev)))
            />
            <FieldMessages error=error field=field/>
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Create an account"</h1>
                <div class="role-toggle">{role_button(Role::Candidate)} {role_button(Role::Company)}</div>
                <form class="auth-form" on:submit=on_submit>
                    <Show
                        when=move || form.with(|f| f.role == Role::Company)
                        fallback=move || {
                            view! {
                                {text_input("first_name", "text", "First name")}
                                {text_input("last_name", "text", "Last name")}
                            }
                        }
                    >
                        {text_input("company_name", "text", "Company name")}
                    </Show>
                    {text_input("email", "email", "you@example.com")}
                    {text_input("password", "password", "Password")}
                    {text_input("confirm_password", "password", "Confirm password")}
                    <FormBanner error=error fields=REGISTER_FIELDS/>
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating account..." } else { "Create account" }}
                    </button>
                </form>
                <p class="auth-card__footer">
                    "Already registered? " <a href=LOGIN_ROUTE>"Sign in"</a>
                </p>
            </div>
        </div>
    }
}

impl RegistrationForm {
    fn value(&self, field: &str) -> &str {
        match field {
            "email" => &self.email,
            "password" => &self.password,
            "confirm_password" => &self.confirm_password,
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            "company_name" => &self.company_name,
            _ => "",
        }
    }

    fn set_value(&mut self, field: &str, value: String) {
        match field {
            "email" => self.email = value,
            "password" => self.password = value,
            "confirm_password" => self.confirm_password = value,
            "first_name" => self.first_name = value,
            "last_name" => self.last_name = value,
            "company_name" => self.company_name = value,
            _ => {}
        }
    }
}

/// Check the form and build the role-specific profile.
///
/// Field keys match the backend's so server-side messages land under the
/// same inputs.
pub(crate) fn validate_registration(form: &RegistrationForm) -> Result<RegistrationProfile, FieldErrors> {
    let mut errors = FieldErrors::default();
    let email = form.email.trim();
    if let Some(message) = email_problem(email) {
        errors.push("email", message);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push("password", format!("Use at least {MIN_PASSWORD_LEN} characters."));
    }
    if form.confirm_password != form.password {
        errors.push("confirm_password", "Passwords do not match.");
    }

    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    let company_name = form.company_name.trim();
    match form.role {
        Role::Candidate => {
            if first_name.is_empty() {
                errors.push("first_name", "Enter your first name.");
            }
            if last_name.is_empty() {
                errors.push("last_name", "Enter your last name.");
            }
        }
        Role::Company => {
            if company_name.is_empty() {
                errors.push("company_name", "Enter the company name.");
            }
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(match form.role {
        Role::Candidate => RegistrationProfile::Candidate(CandidateProfile {
            email: email.to_owned(),
            password: form.password.clone(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
        }),
        Role::Company => RegistrationProfile::Company(CompanyProfile {
            email: email.to_owned(),
            password: form.password.clone(),
            company_name: company_name.to_owned(),
        }),
    })
}
