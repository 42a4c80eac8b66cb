//! Home Page

use leptos::*;
use leptos_router::*;

use crate::components::InlineLoading;
use crate::state::SessionSignals;

#[component]
pub fn Home() -> impl IntoView {
    let session = use_context::<SessionSignals>().expect("SessionSignals not found");

    let summary = move || {
        session.state.with(|state| {
            if state.loading {
                view! { <p class="text-gray-400"><InlineLoading /> " Checking your session"</p> }
                    .into_view()
            } else if !state.error.is_empty() {
                view! { <p class="text-red-400">"Your session could not be loaded."</p> }.into_view()
            } else if state.authenticated {
                let count = state.projects.len();
                view! {
                    <p class="text-gray-300">
                        {format!("You belong to {} project{}.", count, if count == 1 { "" } else { "s" })}
                    </p>
                }
                .into_view()
            } else {
                view! { <p class="text-gray-300">"You are browsing as a guest."</p> }.into_view()
            }
        })
    };

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Errorly"</h1>
                <p class="text-gray-400 mt-1">"Error tracking for your projects"</p>
            </div>

            <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                {summary}
                <A href="/projects" class="inline-block text-primary-400 hover:text-primary-300">
                    "Browse projects →"
                </A>
            </section>
        </div>
    }
}
