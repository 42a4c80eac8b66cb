//! Client Router
//!
//! Built once from the final route tree and never modified afterwards.
//! Matching follows history-mode conventions: child paths are relative to
//! their parent, `:name` captures one segment and `*name` captures the rest.
//! Routes containing a wildcard are only tried after every other route.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;

use super::guard::{GuardResult, NavigationGuard, Next};
use super::node::{is_wildcard_path, is_wildcard_segment, RouteNode};
use super::views::ViewLoader;

/// Redirects followed before a navigation is considered looping
pub const MAX_REDIRECTS: usize = 10;

/// Identity of a record inside one router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(usize);

/// A resolved location
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteTarget {
    pub path: String,
    pub name: Option<String>,
    pub params: BTreeMap<String, String>,
    /// Matched records, outermost first
    pub matched: Vec<RecordId>,
}

impl RouteTarget {
    /// Location before the first navigation
    pub fn start() -> Self {
        Self {
            path: "/".to_string(),
            ..Self::default()
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No route matches {0}")]
    NoMatch(String),

    #[error("Navigation to {0} was aborted")]
    Aborted(String),

    #[error("Too many redirects navigating to {0}")]
    RedirectLoop(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    Wildcard(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if is_wildcard_segment(raw) {
            let name = raw
                .trim_start_matches(['*', ':'])
                .trim_end_matches("(.*)*");
            Self::Wildcard(if name.is_empty() { "pathMatch" } else { name }.to_string())
        } else if let Some(name) = raw.strip_prefix(':') {
            Self::Param(name.to_string())
        } else {
            Self::Static(raw.to_string())
        }
    }
}

#[derive(Debug)]
struct Record {
    full_path: String,
    segments: Vec<Segment>,
    name: Option<String>,
    component: Option<ViewLoader>,
    guard: Option<NavigationGuard>,
    parent: Option<usize>,
}

/// Router over an immutable route tree
#[derive(Clone)]
pub struct AppRouter {
    records: Rc<[Record]>,
    /// Indices into `records`, in matching order
    order: Rc<[usize]>,
}

impl AppRouter {
    pub fn new(tree: Vec<RouteNode>) -> Self {
        let mut records = Vec::new();
        let mut order = Vec::new();
        flatten(tree, None, "", &mut records, &mut order);

        // Stable: keeps depth-first order within each group
        order.sort_by_key(|&index| is_wildcard_path(&records[index].full_path));

        Self {
            records: records.into(),
            order: order.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Match a URL path, ignoring query and fragment
    pub fn resolve(&self, path: &str) -> Option<RouteTarget> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        self.order.iter().find_map(|&index| {
            let params = match_segments(&self.records[index].segments, &parts)?;
            Some(self.target(index, format!("/{}", parts.join("/")), params))
        })
    }

    /// Location of a named route, filling its parameters
    pub fn resolve_name(
        &self,
        name: &str,
        params: &BTreeMap<String, String>,
    ) -> Option<RouteTarget> {
        let index = self
            .records
            .iter()
            .position(|record| record.name.as_deref() == Some(name))?;

        let mut parts = Vec::new();
        for segment in &self.records[index].segments {
            match segment {
                Segment::Static(value) => parts.push(value.clone()),
                Segment::Param(key) => parts.push(params.get(key)?.clone()),
                Segment::Wildcard(key) => {
                    if let Some(rest) = params.get(key).filter(|rest| !rest.is_empty()) {
                        parts.push(rest.trim_matches('/').to_string());
                    }
                }
            }
        }

        let used = self.records[index]
            .segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Param(key) | Segment::Wildcard(key) => {
                    params.get(key).map(|value| (key.clone(), value.clone()))
                }
                Segment::Static(_) => None,
            })
            .collect();

        Some(self.target(index, format!("/{}", parts.join("/")), used))
    }

    /// Views of every matched record, outermost first
    pub fn views(&self, target: &RouteTarget) -> Vec<ViewLoader> {
        target
            .matched
            .iter()
            .filter_map(|id| self.records.get(id.0)?.component.clone())
            .collect()
    }

    /// Pattern the innermost matched record was declared with
    pub fn pattern(&self, target: &RouteTarget) -> Option<&str> {
        let id = target.matched.last()?;
        self.records.get(id.0).map(|record| record.full_path.as_str())
    }

    /// Resolve `to` and run the guards of every record being entered.
    ///
    /// Guards run outermost first; the first one that does not proceed
    /// decides the outcome. A redirect restarts the navigation.
    pub async fn navigate(
        &self,
        from: &RouteTarget,
        to: &str,
    ) -> Result<RouteTarget, NavigationError> {
        let mut destination = to.to_string();

        for _ in 0..=MAX_REDIRECTS {
            let target = self
                .resolve(&destination)
                .ok_or_else(|| NavigationError::NoMatch(destination.clone()))?;

            match self.run_guards(from, &target).await {
                GuardResult::Proceed => return Ok(target),
                GuardResult::Abort => {
                    tracing::debug!(path = %target.path, "navigation aborted by guard");
                    return Err(NavigationError::Aborted(target.path));
                }
                GuardResult::Redirect(next) => {
                    tracing::debug!(from = %target.path, to = %next, "guard redirected");
                    destination = next;
                }
            }
        }

        tracing::warn!(path = to, "redirect limit reached");
        Err(NavigationError::RedirectLoop(to.to_string()))
    }

    async fn run_guards(&self, from: &RouteTarget, to: &RouteTarget) -> GuardResult {
        let entering = to.matched.iter().filter(|&id| !from.matched.contains(id));

        for id in entering {
            let Some(guard) = self.records.get(id.0).and_then(|r| r.guard.as_ref()) else {
                continue;
            };

            let (next, decision) = Next::channel();
            guard.call(to, from, next);

            match decision.await {
                Ok(GuardResult::Proceed) => continue,
                Ok(other) => return other,
                // Guard dropped its continuation
                Err(_) => return GuardResult::Abort,
            }
        }

        GuardResult::Proceed
    }

    fn target(&self, index: usize, path: String, params: BTreeMap<String, String>) -> RouteTarget {
        let mut matched = Vec::new();
        let mut cursor = Some(index);
        while let Some(current) = cursor {
            matched.push(RecordId(current));
            cursor = self.records[current].parent;
        }
        matched.reverse();

        RouteTarget {
            path,
            name: self.records[index].name.clone(),
            params,
            matched,
        }
    }
}

fn flatten(
    nodes: Vec<RouteNode>,
    parent: Option<usize>,
    parent_path: &str,
    records: &mut Vec<Record>,
    order: &mut Vec<usize>,
) {
    for node in nodes {
        let full_path = join_paths(parent_path, &node.path, parent.is_none());
        let index = records.len();
        records.push(Record {
            segments: full_path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(Segment::parse)
                .collect(),
            full_path: full_path.clone(),
            name: node.name,
            component: node.component,
            guard: node.guards.before_enter,
            parent,
        });

        // Children are tried before their parent
        flatten(node.children, Some(index), &full_path, records, order);
        order.push(index);
    }
}

fn join_paths(parent: &str, child: &str, is_root: bool) -> String {
    if child.starts_with('/') {
        child.to_string()
    } else if is_root {
        format!("/{}", child)
    } else if child.is_empty() {
        parent.to_string()
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), child)
    }
}

fn match_segments(segments: &[Segment], parts: &[&str]) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();

    for (position, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Wildcard(key) => {
                params.insert(key.clone(), parts.get(position..)?.join("/"));
                return Some(params);
            }
            Segment::Static(value) => {
                if parts.get(position) != Some(&value.as_str()) {
                    return None;
                }
            }
            Segment::Param(key) => {
                params.insert(key.clone(), (*parts.get(position)?).to_string());
            }
        }
    }

    (segments.len() == parts.len()).then_some(params)
}

/// Tags navigations so only the most recently started one may commit
#[derive(Debug, Clone, Default)]
pub struct NavigationSequence(Rc<Cell<u64>>);

impl NavigationSequence {
    pub fn begin(&self) -> u64 {
        let ticket = self.0.get().wrapping_add(1);
        self.0.set(ticket);
        ticket
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.0.get() == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::future::Future;

    fn tree() -> Vec<RouteNode> {
        vec![
            RouteNode::new("/").named("Home"),
            RouteNode::new("/projects").named("Projects"),
            RouteNode::new("/project/create").named("CreateProject"),
            RouteNode::new("/project/:id").children(vec![
                RouteNode::new("").named("ProjectOverview"),
                RouteNode::new("issues").named("ProjectIssues"),
                RouteNode::new("settings").named("ProjectSettings"),
            ]),
            RouteNode::new("*rest").named("NotFound"),
        ]
    }

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_static_and_params() {
        let router = AppRouter::new(tree());

        assert_eq!(router.resolve("/").unwrap().name.as_deref(), Some("Home"));
        assert_eq!(
            router.resolve("/project/create").unwrap().name.as_deref(),
            Some("CreateProject")
        );

        let issues = router.resolve("/project/1152921504606846976/issues?page=2").unwrap();
        assert_eq!(issues.name.as_deref(), Some("ProjectIssues"));
        assert_eq!(issues.param("id"), Some("1152921504606846976"));
        assert_eq!(issues.path, "/project/1152921504606846976/issues");
        assert_eq!(issues.matched.len(), 2);
        assert_eq!(router.pattern(&issues), Some("/project/:id/issues"));
    }

    #[test]
    fn test_default_child_wins_over_parent() {
        let router = AppRouter::new(tree());
        let overview = router.resolve("/project/42").unwrap();
        assert_eq!(overview.name.as_deref(), Some("ProjectOverview"));
        assert_eq!(overview.matched.len(), 2);
    }

    #[test]
    fn test_wildcard_is_last_resort() {
        let router = AppRouter::new(vec![
            RouteNode::new("*").named("NotFound"),
            RouteNode::new("/projects").named("Projects"),
        ]);

        assert_eq!(
            router.resolve("/projects").unwrap().name.as_deref(),
            Some("Projects")
        );
        let missing = router.resolve("/nowhere/at/all").unwrap();
        assert_eq!(missing.name.as_deref(), Some("NotFound"));
        assert_eq!(missing.param("pathMatch"), Some("nowhere/at/all"));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let router = AppRouter::new(vec![
            RouteNode::new("/a").named("first"),
            RouteNode::new("/a").named("second"),
        ]);
        assert_eq!(router.resolve("/a").unwrap().name.as_deref(), Some("first"));
    }

    #[test]
    fn test_no_match() {
        let router = AppRouter::new(vec![RouteNode::new("/").named("Home")]);
        assert!(router.resolve("/projects").is_none());
        assert_eq!(
            block_on(router.navigate(&RouteTarget::start(), "/projects")),
            Err(NavigationError::NoMatch("/projects".to_string()))
        );
    }

    #[test]
    fn test_resolve_name() {
        let router = AppRouter::new(tree());

        let target = router
            .resolve_name("ProjectSettings", &params(&[("id", "7")]))
            .unwrap();
        assert_eq!(target.path, "/project/7/settings");
        assert_eq!(target, router.resolve("/project/7/settings").unwrap());

        assert!(router.resolve_name("ProjectSettings", &BTreeMap::new()).is_none());
        assert!(router.resolve_name("Unknown", &BTreeMap::new()).is_none());
    }

    fn guarded_tree(guard: NavigationGuard) -> Vec<RouteNode> {
        let mut tree = tree();
        tree[3].guards.before_enter = Some(guard);
        tree
    }

    #[test]
    fn test_guard_proceeds() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let router = AppRouter::new(guarded_tree(NavigationGuard::new(move |to, from, next| {
            log.borrow_mut().push((to.path.clone(), from.path.clone()));
            next.proceed();
        })));

        let target = block_on(router.navigate(&RouteTarget::start(), "/project/9/issues")).unwrap();
        assert_eq!(target.name.as_deref(), Some("ProjectIssues"));
        assert_eq!(
            *seen.borrow(),
            vec![("/project/9/issues".to_string(), "/".to_string())]
        );

        // Moving between children does not re-enter the parent
        block_on(router.navigate(&target, "/project/9/settings")).unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_guard_aborts() {
        let router = AppRouter::new(guarded_tree(NavigationGuard::new(|_, _, next| next.abort())));
        assert_eq!(
            block_on(router.navigate(&RouteTarget::start(), "/project/1")),
            Err(NavigationError::Aborted("/project/1".to_string()))
        );
    }

    #[test]
    fn test_dropped_next_aborts() {
        let router = AppRouter::new(guarded_tree(NavigationGuard::new(|_, _, next| drop(next))));
        assert!(matches!(
            block_on(router.navigate(&RouteTarget::start(), "/project/1")),
            Err(NavigationError::Aborted(_))
        ));
    }

    #[test]
    fn test_guard_redirects() {
        let router = AppRouter::new(guarded_tree(NavigationGuard::new(|_, _, next| {
            next.redirect("/projects")
        })));

        let target = block_on(router.navigate(&RouteTarget::start(), "/project/1")).unwrap();
        assert_eq!(target.name.as_deref(), Some("Projects"));
    }

    #[test]
    fn test_redirect_loop() {
        let mut tree = tree();
        tree[1].guards.before_enter =
            Some(NavigationGuard::new(|_, _, next| next.redirect("/projects")));
        let router = AppRouter::new(tree);

        assert_eq!(
            block_on(router.navigate(&RouteTarget::start(), "/projects")),
            Err(NavigationError::RedirectLoop("/projects".to_string()))
        );
    }

    #[test]
    fn test_guard_answering_later() {
        let pending: Rc<RefCell<Option<Next>>> = Rc::new(RefCell::new(None));
        let slot = pending.clone();
        let router = AppRouter::new(guarded_tree(NavigationGuard::new(move |_, _, next| {
            *slot.borrow_mut() = Some(next);
        })));

        let start = RouteTarget::start();
        let mut navigation = Box::pin(router.navigate(&start, "/project/3"));
        let waker = futures::task::noop_waker();
        let mut cx = std::task::Context::from_waker(&waker);
        assert!(navigation.as_mut().poll(&mut cx).is_pending());

        pending.borrow_mut().take().unwrap().proceed();
        match navigation.as_mut().poll(&mut cx) {
            std::task::Poll::Ready(Ok(target)) => assert_eq!(target.param("id"), Some("3")),
            other => panic!("unexpected poll result {:?}", other),
        }
    }

    #[test]
    fn test_slow_navigation_superseded() {
        let pending: Rc<RefCell<Option<Next>>> = Rc::new(RefCell::new(None));
        let slot = pending.clone();
        let router = AppRouter::new(guarded_tree(NavigationGuard::new(move |_, _, next| {
            *slot.borrow_mut() = Some(next);
        })));
        let sequence = NavigationSequence::default();
        let start = RouteTarget::start();
        let waker = futures::task::noop_waker();
        let mut cx = std::task::Context::from_waker(&waker);

        let slow_ticket = sequence.begin();
        let mut slow = Box::pin(router.navigate(&start, "/project/3"));
        assert!(slow.as_mut().poll(&mut cx).is_pending());

        let fast_ticket = sequence.begin();
        let fast = block_on(router.navigate(&start, "/projects")).unwrap();
        assert_eq!(fast.name.as_deref(), Some("Projects"));
        assert!(sequence.is_current(fast_ticket));

        pending.borrow_mut().take().unwrap().proceed();
        assert!(matches!(slow.as_mut().poll(&mut cx), std::task::Poll::Ready(Ok(_))));
        assert!(!sequence.is_current(slow_ticket));
        assert!(sequence.is_current(fast_ticket));
    }
}
