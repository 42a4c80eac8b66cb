//! Route records as sent by the server, and the nodes the router is built from.

use serde::Deserialize;
use std::fmt;

use super::guard::NavigationGuard;
use super::views::ViewLoader;

/// One entry of the route dictionary payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteRecord {
    pub path: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub component: Option<ComponentSpec>,
    #[serde(default)]
    pub children: Vec<RouteRecord>,
}

/// How the payload refers to a view
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ComponentSpec {
    /// A view registered under this name
    Named(String),
    /// Inline HTML generated from a page template
    Template { template: String },
    /// A registered view that must be loaded on first use
    Lazy { lazy: String },
}

/// Hooks attached after the tree is built
#[derive(Clone, Default)]
pub struct Guards {
    pub before_enter: Option<NavigationGuard>,
}

impl Guards {
    pub fn is_empty(&self) -> bool {
        self.before_enter.is_none()
    }
}

/// A node of the route tree handed to the router
#[derive(Clone)]
pub struct RouteNode {
    pub path: String,
    pub name: Option<String>,
    pub component: Option<ViewLoader>,
    pub children: Vec<RouteNode>,
    pub guards: Guards,
}

impl RouteNode {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            component: None,
            children: Vec::new(),
            guards: Guards::default(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn component(mut self, loader: ViewLoader) -> Self {
        self.component = Some(loader);
        self
    }

    pub fn children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = children;
        self
    }
}

impl fmt::Debug for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteNode")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("component", &self.component)
            .field("children", &self.children)
            .field("guarded", &!self.guards.is_empty())
            .finish()
    }
}

/// Whether any segment of `path` swallows the rest of the URL
pub fn is_wildcard_path(path: &str) -> bool {
    path.split('/').any(is_wildcard_segment)
}

pub(crate) fn is_wildcard_segment(segment: &str) -> bool {
    segment.starts_with('*') || (segment.starts_with(':') && segment.ends_with("(.*)*"))
}
