//! Projects Page
//!
//! The signed-in user's projects, narrowed by a name filter.

use leptos::*;
use leptos_router::*;

use crate::components::ListSkeleton;
use crate::state::{ProjectSummary, SessionSignals};

#[component]
pub fn Projects() -> impl IntoView {
    let session = use_context::<SessionSignals>().expect("SessionSignals not found");
    let loading = move || session.state.with(|s| s.loading);

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Projects"</h1>
                <input
                    type="search"
                    placeholder="Filter by name"
                    class="bg-gray-800 border border-gray-700 rounded-lg px-3 py-2 text-sm"
                    prop:value=move || session.project_filter.get()
                    on:input=move |ev| session.project_filter.set(event_target_value(&ev))
                />
            </div>

            <Show when=move || !loading() fallback=|| view! { <ListSkeleton /> }>
                <Show
                    when=move || !session.filtered_projects.with(Vec::is_empty)
                    fallback=|| view! { <p class="text-gray-400">"No projects match."</p> }
                >
                    <ul class="space-y-3">
                        <For
                            each=move || session.filtered_projects.get()
                            key=|project| project.id.clone()
                            children=|project| view! { <ProjectRow project /> }
                        />
                    </ul>
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn ProjectRow(project: ProjectSummary) -> impl IntoView {
    let href = format!("/project/{}", project.id);

    view! {
        <li class="bg-gray-800 rounded-lg p-4 flex items-center justify-between">
            <div>
                <A href=href class="font-semibold hover:text-primary-300">{project.name}</A>
                <p class="text-sm text-gray-400">{project.description}</p>
            </div>
            <div class="flex space-x-4 text-sm">
                <span class="text-red-400">{project.open_issues} " open"</span>
                <span class="text-yellow-400">{project.active_issues} " active"</span>
                <span class="text-green-400">{project.resolved_issues} " resolved"</span>
            </div>
        </li>
    }
}
