//! Route Outlet
//!
//! Binds the dashboard router to the browser location. Every location change
//! goes through [`AppRouter::navigate`] so injected guards run; the matched
//! records are then rendered innermost-first into their parents.

use leptos::*;
use leptos_router::{use_location, use_navigate, NavigateOptions};

use crate::components::Loading;
use crate::pages::NotFound;
use crate::routes::{
    AppRouter, DeferredView, NavigationError, NavigationSequence, Outlet, RouteTarget, ViewLoader,
};

/// The location currently rendered, for views that read route params
#[derive(Clone, Copy)]
pub struct CurrentRoute(pub Signal<Option<RouteTarget>>);

impl CurrentRoute {
    pub fn param(&self, key: &str) -> Option<String> {
        self.0
            .with(|target| target.as_ref().and_then(|t| t.param(key).map(str::to_string)))
    }
}

/// Renders whatever the router resolved for the current location
#[component]
pub fn RouteOutlet() -> impl IntoView {
    let router = use_context::<AppRouter>().expect("AppRouter not found");
    let location = use_location();
    let navigate = use_navigate();

    let current = create_rw_signal(None::<RouteTarget>);
    let missed = create_rw_signal(false);
    provide_context(CurrentRoute(current.into()));

    let nav_router = router.clone();
    let sequence = NavigationSequence::default();
    create_effect(move |_| {
        let path = location.pathname.get();
        // Any newer location outranks a navigation still waiting on guards
        let ticket = sequence.begin();
        if current.with_untracked(|c| c.as_ref().is_some_and(|t| t.path == path)) {
            return;
        }

        let from = current.get_untracked().unwrap_or_else(RouteTarget::start);
        let router = nav_router.clone();
        let navigate = navigate.clone();
        let sequence = sequence.clone();
        let replace = NavigateOptions {
            replace: true,
            ..Default::default()
        };

        spawn_local(async move {
            let outcome = router.navigate(&from, &path).await;
            if !sequence.is_current(ticket) {
                tracing::debug!(path = %path, "navigation superseded");
                return;
            }

            match outcome {
                Ok(target) => {
                    tracing::debug!(path = %target.path, pattern = router.pattern(&target), "navigated");
                    let redirected = target.path != path;
                    let landed = target.path.clone();
                    current.set(Some(target));
                    missed.set(false);
                    if redirected {
                        navigate(&landed, replace);
                    }
                }
                Err(NavigationError::NoMatch(_)) => {
                    current.set(None);
                    missed.set(true);
                }
                Err(err) => {
                    tracing::info!("{}", err);
                    navigate(&from.path, replace);
                }
            }
        });
    });

    move || match current.get() {
        Some(target) => render_chain(router.views(&target)),
        None if missed.get() => view! { <NotFound /> }.into_view(),
        None => view! { <Loading /> }.into_view(),
    }
}

fn render_chain(views: Vec<ViewLoader>) -> View {
    views
        .into_iter()
        .rev()
        .fold(None, |outlet, loader| Some(render_loader(loader, outlet)))
        .unwrap_or_else(|| view! { <NotFound /> }.into_view())
}

fn render_loader(loader: ViewLoader, outlet: Outlet) -> View {
    match loader {
        ViewLoader::Eager(view) => view(outlet),
        ViewLoader::Deferred(deferred) => deferred_view(deferred, outlet),
        ViewLoader::Template(html) => view! {
            <section class="prose prose-invert max-w-none" inner_html=html.to_string() />
            {outlet}
        }
        .into_view(),
        ViewLoader::Unresolved(name) => view! {
            <div class="bg-yellow-900/40 border border-yellow-700 text-yellow-200 rounded-lg p-4">
                {format!("The view \"{}\" is not available in this build.", name)}
            </div>
            {outlet}
        }
        .into_view(),
    }
}

fn deferred_view(deferred: DeferredView, outlet: Outlet) -> View {
    let loaded = create_local_resource(
        || (),
        move |_| {
            let deferred = deferred.clone();
            async move { deferred.load().await }
        },
    );

    view! {
        <Suspense fallback=|| view! { <Loading /> }>
            {
                let outlet = outlet.clone();
                move || loaded.get().map(|render| render(outlet.clone()))
            }
        </Suspense>
    }
    .into_view()
}
