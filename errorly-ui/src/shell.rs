//! Application Shell
//!
//! Startup order: fetch the route tree, inject guards, build the router.
//! Only a successful [`prepare`] yields a [`Shell`]; without one the
//! dashboard shows a startup failure instead of a routerless app. The
//! session bootstrap starts after mount (see [`crate::app::App`]).

use futures::future::{AbortRegistration, Abortable};
use leptos::SignalWithUntracked;
use thiserror::Error;

use crate::api::ApiClient;
use crate::routes::{
    AppRouter, GuardInjection, GuardResult, NavigationGuard, RouteTreeBuilder, RouteTreeError,
};
use crate::state::{session_gate, SessionSignals};

/// Where visitors without a session are sent
pub const SIGN_IN_FALLBACK: &str = "/";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StartupError {
    #[error(transparent)]
    RouteTree(#[from] RouteTreeError),

    #[error("Startup was cancelled")]
    Cancelled,
}

/// Everything the view tree needs that had to be fetched first
#[derive(Clone)]
pub struct Shell {
    pub router: AppRouter,
}

/// Fetch routes, attach `injections` and build the router.
///
/// Injection misses are logged and skipped.
pub async fn prepare<C: ApiClient + ?Sized>(
    client: &C,
    builder: &RouteTreeBuilder,
    injections: Vec<GuardInjection>,
    registration: AbortRegistration,
) -> Result<Shell, StartupError> {
    let mut tree = Abortable::new(builder.fetch(client), registration)
        .await
        .map_err(|_| StartupError::Cancelled)?
        .map_err(|err| {
            tracing::error!("cannot start dashboard: {}", err);
            err
        })?;

    for injection in injections {
        match injection.apply(&mut tree) {
            Ok(attached) => tracing::debug!(
                path = ?attached.path,
                name = ?attached.name,
                replaced = attached.replaced,
                "guard attached"
            ),
            Err(miss) => tracing::warn!("guard not attached: {}", miss),
        }
    }

    let router = AppRouter::new(tree);
    tracing::info!(records = router.len(), "router ready");
    Ok(Shell { router })
}

/// Guard that waits for the session and lets only signed-in users through
pub fn require_session(session: SessionSignals, fallback: &'static str) -> NavigationGuard {
    NavigationGuard::new(move |_to, _from, next| {
        leptos::spawn_local(async move {
            session.settled().await;
            let decision = session
                .state
                .try_with_untracked(|state| session_gate(state, fallback))
                .unwrap_or_else(|| GuardResult::Redirect(fallback.to_string()));
            next.call(decision);
        });
    })
}

/// Guards installed on every startup
pub fn default_guards(session: SessionSignals) -> Vec<GuardInjection> {
    vec![
        GuardInjection::new(&["/project/create"], require_session(session, SIGN_IN_FALLBACK)),
        GuardInjection::new(
            &["/project/:id", "settings"],
            require_session(session, SIGN_IN_FALLBACK),
        ),
    ]
}
