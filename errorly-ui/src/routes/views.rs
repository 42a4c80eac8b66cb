//! View loaders
//!
//! The route payload names views by string. The registry maps those names to
//! render functions, either available immediately or produced by an async
//! loader on first use.

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use leptos::View;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use super::node::ComponentSpec;

/// What a parent view receives: the rendered child route, if any
pub type Outlet = Option<View>;

/// Render function for one route record
pub type ViewFn = Rc<dyn Fn(Outlet) -> View>;

type LoaderFn = Rc<dyn Fn() -> LocalBoxFuture<'static, ViewFn>>;

/// A view whose render function is produced asynchronously, once
#[derive(Clone)]
pub struct DeferredView {
    loader: LoaderFn,
    loaded: Rc<RefCell<Option<ViewFn>>>,
}

impl DeferredView {
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = ViewFn> + 'static,
    {
        Self {
            loader: Rc::new(move || loader().boxed_local()),
            loaded: Rc::new(RefCell::new(None)),
        }
    }

    /// Render function, running the loader on first call only
    pub async fn load(&self) -> ViewFn {
        if let Some(view) = self.loaded.borrow().clone() {
            return view;
        }

        let view = (self.loader)().await;
        *self.loaded.borrow_mut() = Some(view.clone());
        view
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.borrow().is_some()
    }
}

/// A resolved `component` reference
#[derive(Clone)]
pub enum ViewLoader {
    Eager(ViewFn),
    Deferred(DeferredView),
    /// Inline HTML from the page dictionary
    Template(Rc<str>),
    /// The payload named a view this build does not know
    Unresolved(String),
}

impl fmt::Debug for ViewLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eager(_) => f.write_str("Eager"),
            Self::Deferred(view) => write!(f, "Deferred(loaded: {})", view.is_loaded()),
            Self::Template(html) => write!(f, "Template({} bytes)", html.len()),
            Self::Unresolved(name) => write!(f, "Unresolved({:?})", name),
        }
    }
}

#[derive(Clone)]
enum Registered {
    Eager(ViewFn),
    Deferred(DeferredView),
}

/// Views known to this build, by name
#[derive(Clone, Default)]
pub struct ViewRegistry {
    views: HashMap<String, Registered>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view that renders immediately
    pub fn eager<F>(mut self, name: impl Into<String>, view: F) -> Self
    where
        F: Fn(Outlet) -> View + 'static,
    {
        self.views
            .insert(name.into(), Registered::Eager(Rc::new(view)));
        self
    }

    /// Register a view produced by an async loader
    pub fn deferred<F, Fut>(mut self, name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = ViewFn> + 'static,
    {
        self.views
            .insert(name.into(), Registered::Deferred(DeferredView::new(loader)));
        self
    }

    /// Turn a payload reference into the loader the outlet understands
    pub fn resolve(&self, spec: &ComponentSpec) -> ViewLoader {
        match spec {
            ComponentSpec::Template { template } => ViewLoader::Template(Rc::from(template.as_str())),
            ComponentSpec::Named(name) => match self.views.get(name) {
                Some(Registered::Eager(view)) => ViewLoader::Eager(view.clone()),
                Some(Registered::Deferred(view)) => ViewLoader::Deferred(view.clone()),
                None => unresolved(name),
            },
            ComponentSpec::Lazy { lazy } => match self.views.get(lazy) {
                Some(Registered::Deferred(view)) => ViewLoader::Deferred(view.clone()),
                Some(Registered::Eager(view)) => {
                    let view = view.clone();
                    ViewLoader::Deferred(DeferredView::new(move || {
                        let view = view.clone();
                        async move { view }
                    }))
                }
                None => unresolved(lazy),
            },
        }
    }
}

fn unresolved(name: &str) -> ViewLoader {
    tracing::warn!(view = name, "route refers to an unknown view");
    ViewLoader::Unresolved(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use leptos::IntoView;
    use std::cell::Cell;

    fn blank(_: Outlet) -> View {
        ().into_view()
    }

    #[test]
    fn test_deferred_loader_runs_once() {
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let deferred = DeferredView::new(move || {
            counter.set(counter.get() + 1);
            async { Rc::new(blank) as ViewFn }
        });

        assert!(!deferred.is_loaded());
        let first = block_on(deferred.load());
        let second = block_on(deferred.clone().load());

        assert_eq!(runs.get(), 1);
        assert!(deferred.is_loaded());
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_resolve_forms() {
        let registry = ViewRegistry::new()
            .eager("Home", blank)
            .deferred("Settings", || async { Rc::new(blank) as ViewFn });

        assert!(matches!(
            registry.resolve(&ComponentSpec::Named("Home".into())),
            ViewLoader::Eager(_)
        ));
        assert!(matches!(
            registry.resolve(&ComponentSpec::Named("Settings".into())),
            ViewLoader::Deferred(_)
        ));
        assert!(matches!(
            registry.resolve(&ComponentSpec::Lazy {
                lazy: "Home".into()
            }),
            ViewLoader::Deferred(_)
        ));
        match registry.resolve(&ComponentSpec::Template {
            template: "<h1>Hi</h1>".into(),
        }) {
            ViewLoader::Template(html) => assert_eq!(&*html, "<h1>Hi</h1>"),
            other => panic!("unexpected loader {:?}", other),
        }
    }

    #[test]
    fn test_unknown_view_is_unresolved() {
        let registry = ViewRegistry::new();
        match registry.resolve(&ComponentSpec::Named("Missing".into())) {
            ViewLoader::Unresolved(name) => assert_eq!(name, "Missing"),
            other => panic!("unexpected loader {:?}", other),
        }
    }
}
