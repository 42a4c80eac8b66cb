//! Pages
//!
//! Top-level views, registered under the names the route dictionary uses.

pub mod home;
pub mod not_found;
pub mod project;
pub mod projects;

pub use home::Home;
pub use not_found::NotFound;
pub use project::{CreateProject, ProjectIssues, ProjectOverview, ProjectSettings};
pub use projects::Projects;

use leptos::*;
use std::rc::Rc;

use crate::routes::{Outlet, ViewFn, ViewRegistry};

/// Every view this build can render
pub fn view_registry() -> ViewRegistry {
    ViewRegistry::new()
        .eager("Home", |_| view! { <Home /> }.into_view())
        .eager("Projects", |_| view! { <Projects /> }.into_view())
        .eager("Project", project::project_layout)
        .eager("ProjectOverview", |_| view! { <ProjectOverview /> }.into_view())
        .eager("ProjectSettings", |_| view! { <ProjectSettings /> }.into_view())
        .eager("NotFound", |_| view! { <NotFound /> }.into_view())
        .deferred("ProjectIssues", || async {
            Rc::new(|_: Outlet| view! { <ProjectIssues /> }.into_view()) as ViewFn
        })
        .deferred("CreateProject", || async {
            Rc::new(|_: Outlet| view! { <CreateProject /> }.into_view()) as ViewFn
        })
}
