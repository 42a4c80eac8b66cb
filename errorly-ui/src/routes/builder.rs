//! Route Tree Builder
//!
//! Fetches the route description from the server and turns it into the
//! [`RouteNode`] tree the router is built from. Only `component` references
//! are rewritten; paths, names and nesting are kept as sent.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use super::node::{is_wildcard_path, RouteNode, RouteRecord};
use super::views::ViewRegistry;
use crate::api::decode::{decode_as, DecodeError};
use crate::api::envelope::Envelope;
use crate::api::error::{normalize_envelope, normalize_failure, CallFailure, NormalizedError};
use crate::api::{ApiClient, DICTIONARY_ENDPOINT};

/// Shape the dictionary endpoint answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteContract {
    /// `{ success, data: { routes }, error? }`
    #[default]
    Enveloped,
    /// A bare array of routes
    Bare,
}

impl RouteContract {
    /// Contract named by a stored setting; anything but `bare` is enveloped
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("bare") => Self::Bare,
            _ => Self::Enveloped,
        }
    }
}

/// Route dictionary generated by the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteDictionary {
    pub routes: Vec<RouteRecord>,
    #[serde(default, rename = "_generated")]
    pub generated: Option<String>,
    #[serde(default, rename = "_processing_ms")]
    pub processing_ms: Option<i64>,
}

/// Dictionary response, decoded according to the configured contract
#[derive(Debug, Clone, PartialEq)]
pub enum RoutePayload {
    Enveloped(Envelope<RouteDictionary>),
    Bare(Vec<RouteRecord>),
}

impl RoutePayload {
    pub fn parse(contract: RouteContract, raw: &str) -> Result<Self, DecodeError> {
        match contract {
            RouteContract::Enveloped => decode_as(raw).map(Self::Enveloped),
            RouteContract::Bare => decode_as(raw).map(Self::Bare),
        }
    }

    pub fn into_records(self) -> Result<Vec<RouteRecord>, NormalizedError> {
        match self {
            Self::Enveloped(envelope) => {
                let dictionary = normalize_envelope(envelope)?;
                if let Some(generated) = &dictionary.generated {
                    tracing::debug!(
                        generated = %generated,
                        processing_ms = dictionary.processing_ms,
                        "route dictionary received"
                    );
                }
                Ok(dictionary.routes)
            }
            Self::Bare(routes) => Ok(routes),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RouteTreeError {
    #[error("Failed to load routes: {0}")]
    Fetch(NormalizedError),

    #[error("The server returned no routes")]
    Empty,
}

/// Problems in a route list that matching tolerates but should not
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteLint {
    /// Later siblings with this path are unreachable
    DuplicatePath { parent: String, path: String },
    /// A wildcard sibling declared before other siblings
    WildcardNotLast { parent: String, path: String },
}

impl fmt::Display for RouteLint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePath { parent, path } => {
                write!(f, "duplicate route path {:?} under {:?}; first one wins", path, parent)
            }
            Self::WildcardNotLast { parent, path } => {
                write!(f, "wildcard route {:?} under {:?} is not the last sibling", path, parent)
            }
        }
    }
}

/// Report duplicate sibling paths and misplaced wildcards, recursively
pub fn lint_duplicate_paths(records: &[RouteRecord]) -> Vec<RouteLint> {
    let mut lints = Vec::new();
    lint_level(records, "", &mut lints);
    lints
}

fn lint_level(records: &[RouteRecord], parent: &str, lints: &mut Vec<RouteLint>) {
    let mut seen = HashSet::new();
    for (position, record) in records.iter().enumerate() {
        if !seen.insert(record.path.as_str()) {
            lints.push(RouteLint::DuplicatePath {
                parent: parent.to_string(),
                path: record.path.clone(),
            });
        }

        let is_wildcard = is_wildcard_path(&record.path);
        let followed = records[position + 1..]
            .iter()
            .any(|sibling| !is_wildcard_path(&sibling.path));
        if is_wildcard && followed {
            lints.push(RouteLint::WildcardNotLast {
                parent: parent.to_string(),
                path: record.path.clone(),
            });
        }

        lint_level(&record.children, &record.path, lints);
    }
}

/// Builds the route tree from the dictionary endpoint
#[derive(Clone)]
pub struct RouteTreeBuilder {
    registry: ViewRegistry,
    contract: RouteContract,
}

impl RouteTreeBuilder {
    pub fn new(registry: ViewRegistry) -> Self {
        Self {
            registry,
            contract: RouteContract::default(),
        }
    }

    pub fn contract(mut self, contract: RouteContract) -> Self {
        self.contract = contract;
        self
    }

    /// Fetch the route description and build the tree from it
    pub async fn fetch<C: ApiClient + ?Sized>(
        &self,
        client: &C,
    ) -> Result<Vec<RouteNode>, RouteTreeError> {
        let raw = client
            .get(DICTIONARY_ENDPOINT)
            .await
            .map_err(|failure| RouteTreeError::Fetch(normalize_failure(&failure)))?;

        let payload = RoutePayload::parse(self.contract, &raw).map_err(|err| {
            RouteTreeError::Fetch(normalize_failure(&CallFailure::Decode(err)))
        })?;
        let records = payload.into_records().map_err(RouteTreeError::Fetch)?;

        if records.is_empty() {
            return Err(RouteTreeError::Empty);
        }

        for lint in lint_duplicate_paths(&records) {
            tracing::warn!("{}", lint);
        }

        let tree = self.build(&records);
        tracing::info!(routes = tree.len(), "route tree built");
        Ok(tree)
    }

    /// Convert records to nodes, resolving each component reference
    pub fn build(&self, records: &[RouteRecord]) -> Vec<RouteNode> {
        records
            .iter()
            .map(|record| {
                let mut node =
                    RouteNode::new(record.path.as_str()).children(self.build(&record.children));
                if let Some(name) = &record.name {
                    node = node.named(name.as_str());
                }
                if let Some(spec) = &record.component {
                    node = node.component(self.registry.resolve(spec));
                }
                node
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::ScriptedClient;
    use crate::api::error::ErrorKind;
    use crate::routes::views::{Outlet, ViewLoader};
    use futures::executor::block_on;
    use leptos::{IntoView, View};

    const ENVELOPED: &str = r#"{
        "success": true,
        "data": {
            "_generated": "2024-05-01T10:00:00Z",
            "_processing_ms": 3,
            "routes": [
                { "path": "/", "name": "Home", "component": "Home" },
                { "path": "/about", "component": { "template": "<p>About</p>" } },
                { "path": "/project/:id", "component": "Project", "children": [
                    { "path": "", "name": "ProjectOverview", "component": { "lazy": "Home" } },
                    { "path": "issues", "name": "ProjectIssues", "component": "Missing" }
                ] }
            ]
        }
    }"#;

    fn registry() -> ViewRegistry {
        fn blank(_: Outlet) -> View {
            ().into_view()
        }
        ViewRegistry::new().eager("Home", blank).eager("Project", blank)
    }

    fn shape(nodes: &[RouteNode]) -> Vec<(String, Option<String>, usize)> {
        nodes
            .iter()
            .map(|n| (n.path.clone(), n.name.clone(), n.children.len()))
            .collect()
    }

    #[test]
    fn test_fetch_enveloped() {
        let client = ScriptedClient::new().with(DICTIONARY_ENDPOINT, Ok(ENVELOPED));
        let tree = block_on(RouteTreeBuilder::new(registry()).fetch(&client)).unwrap();

        assert_eq!(
            shape(&tree),
            vec![
                ("/".to_string(), Some("Home".to_string()), 0),
                ("/about".to_string(), None, 0),
                ("/project/:id".to_string(), None, 2),
            ]
        );
        assert!(matches!(tree[0].component, Some(ViewLoader::Eager(_))));
        assert!(matches!(tree[1].component, Some(ViewLoader::Template(_))));
        assert!(matches!(tree[2].children[0].component, Some(ViewLoader::Deferred(_))));
        assert!(matches!(
            tree[2].children[1].component,
            Some(ViewLoader::Unresolved(_))
        ));
        assert!(tree.iter().all(|n| n.guards.is_empty()));
    }

    #[test]
    fn test_fetch_bare() {
        let client = ScriptedClient::new().with(
            DICTIONARY_ENDPOINT,
            Ok(r#"[{ "path": "/", "name": "Home", "component": "Home" }]"#),
        );
        let tree = block_on(
            RouteTreeBuilder::new(registry())
                .contract(RouteContract::Bare)
                .fetch(&client),
        )
        .unwrap();
        assert_eq!(shape(&tree), vec![("/".to_string(), Some("Home".to_string()), 0)]);
    }

    #[test]
    fn test_contract_setting() {
        assert_eq!(RouteContract::from_setting(None), RouteContract::Enveloped);
        assert_eq!(RouteContract::from_setting(Some(" Bare ")), RouteContract::Bare);
        assert_eq!(RouteContract::from_setting(Some("array")), RouteContract::Enveloped);
    }

    #[test]
    fn test_contracts_are_not_mixed() {
        assert!(RoutePayload::parse(RouteContract::Bare, ENVELOPED).is_err());
        assert!(RoutePayload::parse(RouteContract::Enveloped, r#"[{"path": "/"}]"#).is_err());
    }

    #[test]
    fn test_fetch_failures() {
        let builder = RouteTreeBuilder::new(registry());

        let client = ScriptedClient::new().with(
            DICTIONARY_ENDPOINT,
            Err(CallFailure::Http {
                status: 500,
                body: Some(r#"{"success":false,"error":"template index missing"}"#.into()),
            }),
        );
        match block_on(builder.fetch(&client)) {
            Err(RouteTreeError::Fetch(err)) => {
                assert_eq!(err.kind, ErrorKind::ApplicationFailure);
                assert_eq!(err.message, "template index missing");
            }
            other => panic!("unexpected result {:?}", other.map(|t| t.len())),
        }

        let client = ScriptedClient::new().with(DICTIONARY_ENDPOINT, Err(CallFailure::transport("offline")));
        assert!(matches!(
            block_on(builder.fetch(&client)),
            Err(RouteTreeError::Fetch(NormalizedError {
                kind: ErrorKind::TransportFailure,
                ..
            }))
        ));

        let client = ScriptedClient::new().with(DICTIONARY_ENDPOINT, Ok(r#"{"success":false}"#));
        assert!(matches!(
            block_on(builder.fetch(&client)),
            Err(RouteTreeError::Fetch(_))
        ));
    }

    #[test]
    fn test_empty_route_list() {
        let client = ScriptedClient::new().with(
            DICTIONARY_ENDPOINT,
            Ok(r#"{"success":true,"data":{"routes":[]}}"#),
        );
        assert!(matches!(
            block_on(RouteTreeBuilder::new(registry()).fetch(&client)),
            Err(RouteTreeError::Empty)
        ));
    }

    #[test]
    fn test_lints() {
        let records: Vec<RouteRecord> = serde_json::from_str(
            r#"[
                { "path": "/" },
                { "path": "*" },
                { "path": "/project/:id", "children": [
                    { "path": "issues" },
                    { "path": "issues" }
                ] },
                { "path": "/" }
            ]"#,
        )
        .unwrap();

        assert_eq!(
            lint_duplicate_paths(&records),
            vec![
                RouteLint::WildcardNotLast {
                    parent: "".into(),
                    path: "*".into()
                },
                RouteLint::DuplicatePath {
                    parent: "/project/:id".into(),
                    path: "issues".into()
                },
                RouteLint::DuplicatePath {
                    parent: "".into(),
                    path: "/".into()
                },
            ]
        );
    }
}
