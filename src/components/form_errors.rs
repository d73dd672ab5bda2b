//! Error display for the auth forms.
//!
//! Both components read the form's `RwSignal<Option<AuthError>>`. Field
//! messages appear under their inputs; the banner carries the form-wide
//! message, plus any field error the form has no input for, so every
//! rejection shows something and none is shown twice.

#[cfg(test)]
#[path = "form_errors_test.rs"]
mod form_errors_test;

use leptos::prelude::*;

use crate::auth::error::AuthError;

const FALLBACK_MESSAGE: &str = "Please correct the highlighted fields.";

/// Form-wide message above the submit button. `fields` lists the inputs
/// that render their own `FieldMessages`.
#[component]
pub fn FormBanner(error: RwSignal<Option<AuthError>>, fields: &'static [&'static str]) -> impl IntoView {
    let text = move || error.get().and_then(|e| banner_message(&e, fields));
    view! {
        <Show when=move || text().is_some()>
            <p class="form-banner" role="alert">{move || text().unwrap_or_default()}</p>
        </Show>
    }
}

/// Messages attached to one input.
#[component]
pub fn FieldMessages(error: RwSignal<Option<AuthError>>, field: &'static str) -> impl IntoView {
    let messages = move || error.get().map(|e| e.field_messages(field)).unwrap_or_default();
    view! {
        <ul class="field-errors">
            {move || messages().into_iter().map(|m| view! { <li>{m}</li> }).collect_view()}
        </ul>
    }
}

/// Banner text for `error`. A validation error whose messages all sit under
/// `shown` inputs gets no banner; otherwise its top-level message, or its
/// first unplaced field message, is surfaced.
pub(crate) fn banner_message(error: &AuthError, shown: &[&str]) -> Option<String> {
    let AuthError::Invalid(errors) = error else {
        return Some(error.user_message());
    };
    if let Some(message) = &errors.message {
        return Some(message.clone());
    }
    let unplaced = errors
        .fields
        .iter()
        .filter(|(field, messages)| !shown.contains(&field.as_str()) && !messages.is_empty())
        .find_map(|(_, messages)| messages.first().cloned());
    let any_placed = shown.iter().any(|field| !errors.messages_for(field).is_empty());
    match unplaced {
        Some(message) => Some(message),
        None if any_placed => None,
        None => Some(FALLBACK_MESSAGE.to_owned()),
    }
}
