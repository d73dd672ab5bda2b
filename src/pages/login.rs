//! Login page: email + password sign-in.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page never navigates on submit itself. A successful `login` flips the
//! session to `Authenticated`, and the signed-in redirect sends the user to
//! `?next=` or their role home.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::auth::error::AuthError;
use crate::auth::guard::REGISTER_ROUTE;
use crate::components::form_errors::{FieldMessages, FormBanner};
use crate::net::error::FieldErrors;
use crate::net::types::Credentials;
use crate::util::auth::{install_signed_in_redirect, use_session, use_session_store};

/// Inputs that show their own messages.
pub(crate) const LOGIN_FIELDS: &[&str] = &["email", "password"];

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let store = use_session_store();
    let query = use_query_map();
    let next = Signal::derive(move || query.with(|q| q.get("next")));
    install_signed_in_redirect(session, next, use_navigate());

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<AuthError>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let credentials = match validate_login_input(&email.get(), &password.get()) {
            Ok(credentials) => credentials,
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
                if let Err(e) = store.login(&credentials).await {
                    password.set(String::new());
                    error.set(Some(e));
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _unused = (&store, credentials);
            busy.set(false);
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign in"</h1>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <FieldMessages error=error field="email"/>
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <FieldMessages error=error field="password"/>
                    <FormBanner error=error fields=LOGIN_FIELDS/>
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <p class="auth-card__footer">
                    "No account yet? " <a href=REGISTER_ROUTE>"Create one"</a>
                </p>
            </div>
        </div>
    }
}

/// Trim and presence-check the form before any request is made.
pub(crate) fn validate_login_input(email: &str, password: &str) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::default();
    let email = email.trim();
    if let Some(message) = email_problem(email) {
        errors.push("email", message);
    }
    if password.is_empty() {
        errors.push("password", "Enter your password.");
    }
    if errors.is_empty() { Ok(Credentials::new(email, password)) } else { Err(errors) }
}

/// Shared email rule for the auth forms.
pub(crate) fn email_problem(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        Some("Enter your email.")
    } else if !email.contains('@') {
        Some("Enter a valid email address.")
    } else {
        None
    }
}
