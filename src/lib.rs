//! # Errorly
//!
//! Backend for the Errorly dashboard. The dashboard is a single-page
//! application that builds its router from a server-supplied route
//! description; this crate produces that description and serves the
//! bootstrap endpoints.
//!
//! ## Modules
//!
//! - [`dictionary`]: Page dictionary generation from a template index
//! - [`api`]: HTTP API server with Axum
//! - [`config`]: TOML configuration with environment overrides

pub mod api;
pub mod config;
pub mod dictionary;

pub use api::{build_router, serve, ApiError, ApiResult, AppState};

pub use config::{ApiConfig, Config, ConfigError, DictionaryConfig, LoggingConfig, WebConfig};

pub use dictionary::{
    DictionaryError, DictionaryResult, DictionarySource, PageComponent, PageDictionary, PageEntry,
    PageTemplate,
};
