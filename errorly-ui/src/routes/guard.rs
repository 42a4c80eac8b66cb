//! Navigation Guards
//!
//! Guards are attached to nodes of the route tree after it is fetched and
//! before the router is built. Nodes are addressed by the chain of `path`
//! values leading to them, e.g. `["/project/:id", "settings"]`.

use futures::channel::oneshot;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

use super::node::RouteNode;
use super::router::RouteTarget;

/// What a guard decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardResult {
    Proceed,
    Abort,
    Redirect(String),
}

/// Continuation handed to a guard.
///
/// Every method consumes it, so a guard can answer at most once. Dropping it
/// without answering aborts the navigation.
pub struct Next {
    sender: oneshot::Sender<GuardResult>,
}

impl Next {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<GuardResult>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    pub fn proceed(self) {
        self.call(GuardResult::Proceed);
    }

    pub fn abort(self) {
        self.call(GuardResult::Abort);
    }

    pub fn redirect(self, path: impl Into<String>) {
        self.call(GuardResult::Redirect(path.into()));
    }

    pub fn call(self, result: GuardResult) {
        // Receiver gone means the navigation was superseded
        let _ = self.sender.send(result);
    }
}

/// `(to, from, next)` hook run before entering a node
#[derive(Clone)]
pub struct NavigationGuard(Rc<dyn Fn(&RouteTarget, &RouteTarget, Next)>);

impl NavigationGuard {
    pub fn new<F>(guard: F) -> Self
    where
        F: Fn(&RouteTarget, &RouteTarget, Next) + 'static,
    {
        Self(Rc::new(guard))
    }

    pub fn call(&self, to: &RouteTarget, from: &RouteTarget, next: Next) {
        (self.0)(to, from, next)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NavigationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NavigationGuard")
    }
}

/// Where a guard ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attached {
    pub path: Vec<String>,
    pub name: Option<String>,
    /// A previous guard on the node was overwritten
    pub replaced: bool,
}

/// No node matched the requested chain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No route at {} (matched {matched} of {} segments)", .segments.join(" > "), .segments.len())]
pub struct NotFound {
    pub segments: Vec<String>,
    pub matched: usize,
}

/// Attach `guard` as the `before_enter` hook of the node addressed by `path`.
///
/// Each segment must equal a node's `path` exactly at its level; the first
/// match wins. On a miss the tree is left untouched.
pub fn inject<S: AsRef<str>>(
    tree: &mut [RouteNode],
    path: &[S],
    guard: NavigationGuard,
) -> Result<Attached, NotFound> {
    let node = locate(tree, path, 0).map_err(|matched| NotFound {
        segments: owned(path),
        matched,
    })?;

    let replaced = node.guards.before_enter.replace(guard).is_some();
    Ok(Attached {
        path: owned(path),
        name: node.name.clone(),
        replaced,
    })
}

fn locate<'t, S: AsRef<str>>(
    level: &'t mut [RouteNode],
    segments: &[S],
    depth: usize,
) -> Result<&'t mut RouteNode, usize> {
    let (segment, rest) = segments.split_first().ok_or(depth)?;
    let node = level
        .iter_mut()
        .find(|node| node.path == segment.as_ref())
        .ok_or(depth)?;

    if rest.is_empty() {
        Ok(node)
    } else {
        locate(&mut node.children, rest, depth + 1)
    }
}

fn owned<S: AsRef<str>>(path: &[S]) -> Vec<String> {
    path.iter().map(|s| s.as_ref().to_string()).collect()
}

/// A guard waiting to be injected at startup
#[derive(Debug, Clone)]
pub struct GuardInjection {
    pub path: Vec<String>,
    pub guard: NavigationGuard,
}

impl GuardInjection {
    pub fn new<S: AsRef<str>>(path: &[S], guard: NavigationGuard) -> Self {
        Self {
            path: owned(path),
            guard,
        }
    }

    pub fn apply(self, tree: &mut [RouteNode]) -> Result<Attached, NotFound> {
        inject(tree, &self.path, self.guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Vec<RouteNode> {
        vec![
            RouteNode::new("/").named("Home"),
            RouteNode::new("/projects").named("Projects"),
            RouteNode::new("/project/:id").children(vec![
                RouteNode::new("").named("ProjectOverview"),
                RouteNode::new("issues").named("ProjectIssues"),
                RouteNode::new("settings").named("ProjectSettings"),
            ]),
        ]
    }

    fn guard() -> NavigationGuard {
        NavigationGuard::new(|_, _, next| next.proceed())
    }

    fn guarded(nodes: &[RouteNode]) -> Vec<String> {
        let mut out = Vec::new();
        for node in nodes {
            if node.guards.before_enter.is_some() {
                out.push(node.path.clone());
            }
            out.extend(guarded(&node.children));
        }
        out
    }

    #[test]
    fn test_inject_root() {
        let mut tree = tree();
        let attached = inject(&mut tree, &["/"], guard()).unwrap();

        assert_eq!(attached.name.as_deref(), Some("Home"));
        assert!(!attached.replaced);
        assert_eq!(guarded(&tree), vec!["/"]);
    }

    #[test]
    fn test_inject_nested() {
        let mut tree = tree();
        let attached = inject(&mut tree, &["/project/:id", "issues"], guard()).unwrap();

        assert_eq!(attached.name.as_deref(), Some("ProjectIssues"));
        assert!(tree[2].guards.before_enter.is_none());
        assert!(tree[2].children[1].guards.before_enter.is_some());
        assert_eq!(guarded(&tree), vec!["issues"]);
    }

    #[test]
    fn test_inject_missing_path_leaves_tree_unchanged() {
        let mut tree = tree();

        let err = inject(&mut tree, &["/nope"], guard()).unwrap_err();
        assert_eq!(err.matched, 0);

        let err = inject(&mut tree, &["/project/:id", "members"], guard()).unwrap_err();
        assert_eq!(err.matched, 1);
        assert_eq!(
            err.to_string(),
            "No route at /project/:id > members (matched 1 of 2 segments)"
        );

        // Leaf with no children
        let err = inject(&mut tree, &["/projects", "archived"], guard()).unwrap_err();
        assert_eq!(err.matched, 1);

        assert!(guarded(&tree).is_empty());
    }

    #[test]
    fn test_inject_empty_path() {
        let mut tree = tree();
        let empty: [&str; 0] = [];
        assert!(inject(&mut tree, &empty, guard()).is_err());
        assert!(guarded(&tree).is_empty());
    }

    #[test]
    fn test_second_injection_replaces_first() {
        let mut tree = tree();
        let first = guard();
        let second = guard();

        inject(&mut tree, &["/projects"], first.clone()).unwrap();
        let attached = inject(&mut tree, &["/projects"], second.clone()).unwrap();

        assert!(attached.replaced);
        let installed = tree[1].guards.before_enter.as_ref().unwrap();
        assert!(installed.ptr_eq(&second));
        assert!(!installed.ptr_eq(&first));
    }

    #[test]
    fn test_independent_injections() {
        let mut tree = tree();
        let injections = vec![
            GuardInjection::new(&["/"], guard()),
            GuardInjection::new(&["/project/:id", "settings"], guard()),
        ];

        for injection in injections {
            injection.apply(&mut tree).unwrap();
        }

        assert_eq!(guarded(&tree), vec!["/", "settings"]);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let mut tree = vec![RouteNode::new("/a").named("first"), RouteNode::new("/a").named("second")];
        let attached = inject(&mut tree, &["/a"], guard()).unwrap();

        assert_eq!(attached.name.as_deref(), Some("first"));
        assert!(tree[1].guards.before_enter.is_none());
    }

    #[test]
    fn test_dropped_next_is_observable() {
        let (next, mut receiver) = Next::channel();
        drop(next);
        assert!(receiver.try_recv().is_err());
    }
}
