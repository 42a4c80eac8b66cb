//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod error_banner;
pub mod loading;
pub mod nav;
pub mod outlet;
pub mod startup;

pub use error_banner::ErrorBanner;
pub use loading::{InlineLoading, ListSkeleton, Loading};
pub use nav::Nav;
pub use outlet::{CurrentRoute, RouteOutlet};
pub use startup::StartupFailure;
