//! Navigation Component
//!
//! Header navigation bar with logo, links and the signed-in user.

use leptos::*;
use leptos_router::*;

use crate::state::SessionSignals;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let session = use_context::<SessionSignals>().expect("SessionSignals not found");

    let account = move || {
        session.state.with(|state| {
            if state.loading {
                "…".to_string()
            } else if state.is_signed_in() {
                state
                    .user_field("username")
                    .or_else(|| state.user_field("name"))
                    .unwrap_or_else(|| "Signed in".to_string())
            } else {
                "Guest".to_string()
            }
        })
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Logo and brand
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"🐞"</span>
                        <span class="text-xl font-bold text-white">"Errorly"</span>
                    </A>

                    // Navigation links
                    <div class="flex items-center space-x-1">
                        <NavLink href="/" label="Home" />
                        <NavLink href="/projects" label="Projects" />
                        <NavLink href="/project/create" label="New project" />
                        <span class="ml-4 text-sm text-gray-400">{account}</span>
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
            active_class="bg-gray-700 text-white"
        >
            {label}
        </A>
    }
}
