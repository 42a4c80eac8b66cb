//! Error Banner
//!
//! Shows the session error, if the bootstrap call failed.

use leptos::*;

use crate::state::SessionSignals;

#[component]
pub fn ErrorBanner() -> impl IntoView {
    let session = use_context::<SessionSignals>().expect("SessionSignals not found");
    let message = Signal::derive(move || session.state.with(|s| s.error.clone()));

    view! {
        <Show when=move || !message.with(String::is_empty)>
            <div class="fixed bottom-20 right-4 z-50 flex items-center space-x-3 bg-red-600 text-white px-4 py-3 rounded-lg shadow-lg">
                <span class="text-lg">"✕"</span>
                <span class="text-sm font-medium">{message}</span>
            </div>
        </Show>
    }
}
