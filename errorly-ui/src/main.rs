//! Errorly Dashboard
//!
//! Error tracking dashboard built with Leptos (WASM).
//!
//! # Startup
//!
//! 1. The route tree is fetched from `/api/dictionary`.
//! 2. Navigation guards are attached to their nodes.
//! 3. The router is built and the dashboard mounted.
//! 4. The session is requested from `/api/me`.
//!
//! If the route tree cannot be loaded the dashboard is never mounted and a
//! startup failure screen is shown instead.

use leptos::*;
use std::rc::Rc;

mod api;
mod app;
mod components;
mod pages;
mod routes;
mod shell;
mod state;

use api::{ApiClient, GlooClient};

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let client: Rc<dyn ApiClient> = Rc::new(GlooClient::from_storage());
    tracing::info!("Errorly dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    // Mount the app to the document body
    mount_to_body(move || view! { <app::Root client /> });
}
