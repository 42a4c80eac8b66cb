//! Routing
//!
//! Route tree construction from the server dictionary, guard injection and
//! the client router that runs those guards.

pub mod builder;
pub mod guard;
pub mod node;
pub mod router;
pub mod views;

pub use builder::{RouteContract, RouteTreeBuilder, RouteTreeError};
pub use guard::{GuardInjection, GuardResult, NavigationGuard};
pub use router::{AppRouter, NavigationError, NavigationSequence, RouteTarget};
pub use views::{DeferredView, Outlet, ViewFn, ViewLoader, ViewRegistry};
