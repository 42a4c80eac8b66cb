//! Page Dictionary
//!
//! Converts a template index into the route description the dashboard builds
//! its router from. The index points at HTML files:
//!
//! ```json
//! [ { "path": "/", "file": "web/static/dashboard/index.html" } ]
//! ```
//!
//! and the dictionary inlines each file as a component template:
//!
//! ```json
//! { "_generated": "...", "_processing_ms": 1,
//!   "routes": [ { "path": "/", "component": { "template": "<div>...</div>" } } ] }
//! ```
//!
//! Children are supported at any depth. The last dictionary is cached on disk
//! and reused until a template file changes.

mod error;
mod walk;

pub use error::{DictionaryError, DictionaryResult};
pub use walk::{compact_html, modified_since, walk_children, walk_template};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// One entry of the template index
#[derive(Debug, Clone, Deserialize)]
pub struct PageTemplate {
    pub path: String,
    #[serde(default)]
    pub file: PathBuf,
    #[serde(default)]
    pub children: Vec<PageTemplate>,
}

/// Generated route description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDictionary {
    #[serde(rename = "_generated")]
    pub generated: DateTime<Utc>,
    #[serde(rename = "_processing_ms")]
    pub processing_ms: i64,
    pub routes: Vec<PageEntry>,
}

/// One route of the dictionary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    pub path: String,
    pub component: PageComponent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PageEntry>,
}

/// Inline component built from a template file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageComponent {
    pub template: String,
}

/// Where a dictionary is generated from and cached to
#[derive(Debug, Clone)]
pub struct DictionarySource {
    /// Template index file
    pub index_path: PathBuf,
    /// Cache file for the last generated dictionary
    pub output_path: PathBuf,
}

impl DictionarySource {
    pub fn new(index_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            output_path: output_path.into(),
        }
    }

    /// Template files are resolved relative to the index's directory
    fn base_dir(&self) -> &Path {
        self.index_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    /// Read and parse the template index
    pub fn load_index(&self) -> DictionaryResult<Vec<PageTemplate>> {
        let content =
            std::fs::read_to_string(&self.index_path).map_err(|source| DictionaryError::Io {
                path: self.index_path.clone(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| DictionaryError::Parse {
            path: self.index_path.clone(),
            source,
        })
    }

    /// Return the cached dictionary when no template changed since it was
    /// generated, otherwise generate a new one and refresh the cache.
    pub fn generate(&self) -> DictionaryResult<PageDictionary> {
        let started = Instant::now();
        let now = Utc::now();

        let index = self.load_index()?;
        let base_dir = self.base_dir();

        if let Some(cached) = self.load_cached() {
            if !modified_since(&index, base_dir, cached.generated) {
                tracing::debug!(cache = ?self.output_path, "Serving cached page dictionary");
                return Ok(cached);
            }
        }

        let routes = walk_children(&index, base_dir);
        let dictionary = PageDictionary {
            generated: now,
            processing_ms: started.elapsed().as_millis() as i64,
            routes,
        };

        tracing::info!(
            routes = dictionary.routes.len(),
            processing_ms = dictionary.processing_ms,
            "Generated page dictionary"
        );

        if let Err(e) = self.write_cache(&dictionary) {
            tracing::warn!(cache = ?self.output_path, error = %e, "Failed to write page dictionary cache");
        }

        Ok(dictionary)
    }

    fn load_cached(&self) -> Option<PageDictionary> {
        let content = std::fs::read_to_string(&self.output_path).ok()?;
        match serde_json::from_str(&content) {
            Ok(dictionary) => Some(dictionary),
            Err(e) => {
                tracing::debug!(cache = ?self.output_path, error = %e, "Ignoring unreadable dictionary cache");
                None
            }
        }
    }

    fn write_cache(&self, dictionary: &PageDictionary) -> std::io::Result<()> {
        let body = serde_json::to_vec(dictionary)?;
        std::fs::write(&self.output_path, body)
    }
}
