//! Startup Failure
//!
//! Shown instead of the dashboard when the route tree could not be loaded.
//! No router exists at this point, so the screen has no links.

use leptos::*;

#[component]
pub fn StartupFailure(#[prop(into)] message: String) -> impl IntoView {
    let reload = |_: ev::MouseEvent| {
        if let Err(err) = window().location().reload() {
            tracing::error!("reload failed: {:?}", err);
        }
    };

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col items-center justify-center text-center px-4">
            <div class="text-6xl mb-4">"⚠"</div>
            <h1 class="text-3xl font-bold mb-2">"Errorly could not start"</h1>
            <p class="text-gray-400 mb-6 max-w-lg">{message}</p>
            <button
                class="px-4 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg transition-colors"
                on:click=reload
            >
                "Try again"
            </button>
        </div>
    }
}
