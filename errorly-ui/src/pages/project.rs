//! Project Pages
//!
//! `/project/:id` renders a layout with tabs; its children fill the outlet.

use leptos::*;
use leptos_router::*;

use crate::components::CurrentRoute;
use crate::routes::{AppRouter, Outlet};
use crate::state::{ProjectSummary, SessionSignals};

/// The project named by the `:id` param, if the user has it
fn use_project() -> Signal<Option<ProjectSummary>> {
    let session = use_context::<SessionSignals>().expect("SessionSignals not found");
    let route = use_context::<CurrentRoute>().expect("CurrentRoute not found");

    Signal::derive(move || {
        let id = route.param("id")?;
        session
            .state
            .with(|s| s.projects.iter().find(|p| p.id.as_str() == id).cloned())
    })
}

/// Href of a sibling tab by route name, or its usual path if the dictionary
/// left it unnamed
fn tab_href(
    router: AppRouter,
    route: CurrentRoute,
    name: &'static str,
    suffix: &'static str,
) -> impl Fn() -> String + 'static {
    move || {
        route
            .0
            .with(|target| {
                let target = target.as_ref()?;
                router
                    .resolve_name(name, &target.params)
                    .map(|resolved| resolved.path)
                    .or_else(|| target.param("id").map(|id| format!("/project/{}{}", id, suffix)))
            })
            .unwrap_or_default()
    }
}

/// Layout around the project tabs
pub fn project_layout(outlet: Outlet) -> View {
    let router = use_context::<AppRouter>().expect("AppRouter not found");
    let route = use_context::<CurrentRoute>().expect("CurrentRoute not found");
    let project = use_project();

    let overview = tab_href(router.clone(), route, "ProjectOverview", "");
    let issues = tab_href(router.clone(), route, "ProjectIssues", "/issues");
    let settings = tab_href(router, route, "ProjectSettings", "/settings");

    view! {
        <div class="space-y-6">
            <div>
                <h1 class="text-3xl font-bold">
                    {move || project.get().map(|p| p.name).unwrap_or_else(|| "Project".to_string())}
                </h1>
                <p class="text-gray-400 mt-1">{move || route.param("id")}</p>
            </div>

            <div class="flex space-x-2 border-b border-gray-700 pb-2">
                <A href=overview exact=true class="px-3 py-1 rounded" active_class="bg-gray-700">"Overview"</A>
                <A href=issues class="px-3 py-1 rounded" active_class="bg-gray-700">"Issues"</A>
                <A href=settings class="px-3 py-1 rounded" active_class="bg-gray-700">"Settings"</A>
            </div>

            {outlet}
        </div>
    }
    .into_view()
}

#[component]
pub fn ProjectOverview() -> impl IntoView {
    let project = use_project();

    move || match project.get() {
        Some(p) => view! {
            <div class="grid grid-cols-3 gap-4">
                <Stat label="Open" value=p.open_issues />
                <Stat label="Active" value=p.active_issues />
                <Stat label="Resolved" value=p.resolved_issues />
            </div>
        }
        .into_view(),
        None => view! { <p class="text-gray-400">"This project is not in your project list."</p> }
            .into_view(),
    }
}

#[component]
fn Stat(label: &'static str, value: u64) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-4">
            <div class="text-sm text-gray-400">{label}</div>
            <div class="text-2xl font-bold">{value}</div>
        </div>
    }
}

#[component]
pub fn ProjectIssues() -> impl IntoView {
    let project = use_project();
    let open = move || project.with(|p| p.as_ref().map(|p| p.open_issues).unwrap_or(0));

    view! {
        <p class="text-gray-300">
            {move || format!("{} open issue(s).", open())}
        </p>
    }
}

#[component]
pub fn ProjectSettings() -> impl IntoView {
    let project = use_project();

    move || {
        project.get().map(|p| {
            view! {
                <dl class="grid grid-cols-2 gap-2 text-sm">
                    <dt class="text-gray-400">"Name"</dt>
                    <dd>{p.name}</dd>
                    <dt class="text-gray-400">"Description"</dt>
                    <dd>{p.description}</dd>
                    <dt class="text-gray-400">"Private"</dt>
                    <dd>{if p.private { "Yes" } else { "No" }}</dd>
                    <dt class="text-gray-400">"Archived"</dt>
                    <dd>{if p.archived { "Yes" } else { "No" }}</dd>
                </dl>
            }
        })
    }
}

#[component]
pub fn CreateProject() -> impl IntoView {
    view! {
        <div class="space-y-4">
            <h1 class="text-3xl font-bold">"New project"</h1>
            <p class="text-gray-400">"Projects are created from the Errorly API by a project owner."</p>
        </div>
    }
}
