//! # talent-match-client
//!
//! Leptos + WASM frontend for the résumé/job matching platform.
//!
//! This crate holds the client-side session lifecycle: the session store,
//! the startup bootstrap that revalidates persisted credentials, the route
//! guard, and the account API client they share. Pages are thin views over
//! those pieces.

pub mod app;
pub mod auth;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: install panic/console logging, then hydrate.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let level = config::ClientConfig::from_env().log_level.to_log_level();
    if let Err(e) = console_log::init_with_level(level) {
        leptos::logging::warn!("console logger already installed: {e}");
    }
    leptos::mount::hydrate_body(app::App);
}
