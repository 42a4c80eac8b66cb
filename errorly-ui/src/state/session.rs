//! Session Bootstrap
//!
//! Asks the server who the visitor is, once per page load, and publishes the
//! answer into reactive state. The shell mounts before the answer arrives;
//! views read `loading` to know whether the rest is meaningful yet.

use futures::channel::oneshot;
use futures::future::{AbortHandle, Abortable};
use leptos::*;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::future::Future;
use std::rc::Rc;

use super::projects::{filter_projects, ProjectSummary};
use crate::api::client::{fetch_envelope, ApiClient, ME_ENDPOINT};
use crate::api::error::{normalize, NormalizedError};
use crate::routes::GuardResult;

/// `data` of the `/api/me` envelope
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MeResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<Map<String, Value>>,
    #[serde(default)]
    pub projects: Option<Vec<ProjectSummary>>,
}

/// Who the visitor is, as far as the dashboard knows
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub authenticated: bool,
    pub user: Map<String, Value>,
    pub projects: Vec<ProjectSummary>,
    /// True until the bootstrap call settles, then false for good
    pub loading: bool,
    /// Empty unless the bootstrap call failed
    pub error: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            authenticated: false,
            user: Map::new(),
            projects: Vec::new(),
            loading: true,
            error: String::new(),
        }
    }
}

impl SessionState {
    /// Fold the bootstrap outcome in. Only the first outcome is applied;
    /// returns whether this one was.
    pub fn resolve(&mut self, outcome: Result<MeResponse, NormalizedError>) -> bool {
        if !self.loading {
            tracing::warn!("session already resolved; ignoring late outcome");
            return false;
        }

        match outcome {
            Ok(me) => {
                self.authenticated = me.authenticated;
                self.user = me.user.unwrap_or_default();
                self.projects = me.projects.unwrap_or_default();
            }
            Err(err) => {
                tracing::warn!(kind = ?err.kind, "session bootstrap failed: {}", err);
                self.error = err.message;
            }
        }

        self.loading = false;
        true
    }

    pub fn is_signed_in(&self) -> bool {
        !self.loading && self.error.is_empty() && self.authenticated
    }

    /// String form of a user attribute, whether sent as string or number
    pub fn user_field(&self, key: &str) -> Option<String> {
        match self.user.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Request the session and normalize whatever comes back
pub async fn fetch_session<C: ApiClient + ?Sized>(client: &C) -> Result<MeResponse, NormalizedError> {
    normalize(fetch_envelope(client, ME_ENDPOINT).await)
}

/// Redirect target for views that need a signed-in user
pub fn session_gate(state: &SessionState, fallback: &str) -> GuardResult {
    if state.is_signed_in() {
        GuardResult::Proceed
    } else {
        GuardResult::Redirect(fallback.to_string())
    }
}

/// Reactive session state shared through context
#[derive(Clone, Copy)]
pub struct SessionSignals {
    pub state: RwSignal<SessionState>,
    /// User-editable project name filter
    pub project_filter: RwSignal<String>,
    /// `projects` narrowed by `project_filter`
    pub filtered_projects: Memo<Vec<ProjectSummary>>,
    started: StoredValue<bool>,
    waiters: StoredValue<Vec<oneshot::Sender<()>>>,
}

/// Create the session signals in the current reactive owner
pub fn create_session_signals() -> SessionSignals {
    let state = create_rw_signal(SessionState::default());
    let project_filter = create_rw_signal(String::new());
    let filtered_projects = create_memo(move |_| {
        state.with(|s| project_filter.with(|filter| filter_projects(&s.projects, filter)))
    });

    SessionSignals {
        state,
        project_filter,
        filtered_projects,
        started: store_value(false),
        waiters: store_value(Vec::new()),
    }
}

impl SessionSignals {
    /// Start the bootstrap request. Runs at most once; later calls return
    /// `None`. Aborting the returned handle drops the request without
    /// touching state.
    pub fn bootstrap(&self, client: Rc<dyn ApiClient>) -> Option<AbortHandle> {
        let (handle, task) = self.bootstrap_task(client)?;
        spawn_local(task);
        Some(handle)
    }

    fn bootstrap_task(
        &self,
        client: Rc<dyn ApiClient>,
    ) -> Option<(AbortHandle, impl Future<Output = ()>)> {
        if self.started.try_get_value().unwrap_or(true) {
            return None;
        }
        self.started.set_value(true);

        let (handle, registration) = AbortHandle::new_pair();
        let session = *self;

        let task = async move {
            match Abortable::new(fetch_session(client.as_ref()), registration).await {
                Ok(outcome) => {
                    session.settle(outcome);
                }
                Err(_) => tracing::debug!("session bootstrap cancelled"),
            }
        };

        Some((handle, task))
    }

    /// Apply the bootstrap outcome and wake anyone waiting on it
    pub fn settle(&self, outcome: Result<MeResponse, NormalizedError>) -> bool {
        let applied = self
            .state
            .try_update(|state| state.resolve(outcome))
            .unwrap_or(false);

        self.waiters.try_update_value(|waiters| {
            for waiter in waiters.drain(..) {
                let _ = waiter.send(());
            }
        });

        applied
    }

    /// Resolves once `loading` is false
    pub async fn settled(self) {
        if !self.state.with_untracked(|state| state.loading) {
            return;
        }

        let (sender, receiver) = oneshot::channel();
        self.waiters.update_value(|waiters| waiters.push(sender));
        // A dropped sender means the shell went away
        let _ = receiver.await;
    }
}
