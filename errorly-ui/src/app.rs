//! App Root Component
//!
//! [`Root`] runs startup and decides what to mount; [`App`] is the routed
//! dashboard, mounted only once a router exists.

use futures::future::AbortHandle;
use leptos::*;
use leptos_router::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::api::client::{stored_setting, ROUTE_CONTRACT_KEY};
use crate::api::ApiClient;
use crate::components::{ErrorBanner, Loading, Nav, RouteOutlet, StartupFailure};
use crate::pages::view_registry;
use crate::routes::{RouteContract, RouteTreeBuilder};
use crate::shell::{default_guards, prepare, Shell, StartupError};
use crate::state::{create_session_signals, SessionSignals};

/// Startup: route tree, guards, router, then the dashboard or a failure screen
#[component]
pub fn Root(client: Rc<dyn ApiClient>) -> impl IntoView {
    let session = create_session_signals();
    let startup = create_rw_signal(None::<Result<Shell, StartupError>>);

    let (handle, registration) = AbortHandle::new_pair();
    on_cleanup(move || handle.abort());

    let contract = RouteContract::from_setting(stored_setting(ROUTE_CONTRACT_KEY).as_deref());
    let builder = RouteTreeBuilder::new(view_registry()).contract(contract);
    let injections = default_guards(session);
    let startup_client = client.clone();
    spawn_local(async move {
        match prepare(startup_client.as_ref(), &builder, injections, registration).await {
            Err(StartupError::Cancelled) => tracing::debug!("startup cancelled"),
            result => {
                startup.try_set(Some(result));
            }
        }
    });

    move || match startup.get() {
        None => view! {
            <div class="min-h-screen bg-gray-900 text-white">
                <Loading />
            </div>
        }
        .into_view(),
        Some(Ok(shell)) => view! { <App shell session client=client.clone() /> }.into_view(),
        Some(Err(err)) => view! { <StartupFailure message=err.to_string() /> }.into_view(),
    }
}

/// Routed dashboard. Starts the session bootstrap once mounted.
#[component]
pub fn App(shell: Shell, session: SessionSignals, client: Rc<dyn ApiClient>) -> impl IntoView {
    provide_context(session);
    provide_context(shell.router);

    let bootstrap: Rc<RefCell<Option<AbortHandle>>> = Rc::default();
    let pending = bootstrap.clone();
    create_effect(move |_| {
        if let Some(handle) = session.bootstrap(client.clone()) {
            *pending.borrow_mut() = Some(handle);
        }
    });
    on_cleanup(move || {
        if let Some(handle) = bootstrap.borrow_mut().take() {
            handle.abort();
        }
    });

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                // Navigation header
                <Nav />

                // Main content area
                <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                    <Routes>
                        <Route path="/*any" view=RouteOutlet />
                    </Routes>
                </main>

                // Footer with session status
                <Footer />

                // Session error
                <ErrorBanner />
            </div>
        </Router>
    }
}

/// Footer component showing session status
#[component]
fn Footer() -> impl IntoView {
    let session = use_context::<SessionSignals>().expect("SessionSignals not found");

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm">
                <div class="flex items-center space-x-2">
                    {move || {
                        session.state.with(|state| {
                            if state.is_signed_in() {
                                view! {
                                    <span class="flex items-center space-x-1 text-green-400">
                                        <span class="w-2 h-2 bg-green-400 rounded-full" />
                                        <span>"Signed in"</span>
                                    </span>
                                }.into_view()
                            } else {
                                view! {
                                    <span class="flex items-center space-x-1 text-gray-400">
                                        <span class="w-2 h-2 bg-gray-400 rounded-full" />
                                        <span>"Guest"</span>
                                    </span>
                                }.into_view()
                            }
                        })
                    }}
                </div>

                // Loading indicator
                {move || {
                    if session.state.with(|state| state.loading) {
                        view! {
                            <div class="flex items-center space-x-2 text-primary-400">
                                <div class="loading-spinner w-4 h-4" />
                                <span>"Loading session..."</span>
                            </div>
                        }.into_view()
                    } else {
                        view! {}.into_view()
                    }
                }}
            </div>
        </footer>
    }
}
