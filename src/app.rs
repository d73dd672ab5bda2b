//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::auth::store::SessionStore;
use crate::config::ClientConfig;
use crate::net::api::HttpAccountApi;
use crate::pages::{
    dashboard::{CandidateDashboardPage, CompanyDashboardPage, HomePage},
    login::LoginPage,
    register::RegisterPage,
};
use crate::util::auth::provide_session;
use crate::util::storage::LocalStorage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Creates the one session store, mirrors it into context, and starts the
/// bootstrap in the browser. Protected routes stay on their placeholder
/// until the bootstrap settles the session.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_env();
    let store = SessionStore::new(LocalStorage, HttpAccountApi::new(config.clone()));
    provide_context(config);
    provide_session(store.clone());

    #[cfg(feature = "hydrate")]
    crate::util::auth::spawn_bootstrap(store);
    #[cfg(not(feature = "hydrate"))]
    let _unused = store;

    view! {
        <Title text="Talent Match"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegisterPage/>
                <Route path=StaticSegment("candidate") view=CandidateDashboardPage/>
                <Route path=StaticSegment("company") view=CompanyDashboardPage/>
                <Route path=StaticSegment("") view=HomePage/>
            </Routes>
        </Router>
    }
}
