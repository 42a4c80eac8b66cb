//! Template walking
//!
//! Turns the template index into dictionary entries by reading every
//! template file, and answers whether any template changed since a given
//! instant.

use chrono::{DateTime, Utc};
use minify_html::{minify, Cfg};
use std::path::Path;

use super::{PageComponent, PageEntry, PageTemplate};

/// Build the entry for one template and its subtree.
///
/// Returns `None` when the template file cannot be read; the whole subtree
/// is dropped with it.
pub fn walk_template(template: &PageTemplate, base_dir: &Path) -> Option<PageEntry> {
    let file = base_dir.join(&template.file);

    let body = match std::fs::read_to_string(&file) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(path = %template.path, file = ?file, error = %e, "Could not open page template");
            return None;
        }
    };

    let children = walk_children(&template.children, base_dir);

    Some(PageEntry {
        path: template.path.clone(),
        component: PageComponent {
            template: compact_html(&body),
        },
        children,
    })
}

/// Walk a list of templates, keeping their order
pub fn walk_children(templates: &[PageTemplate], base_dir: &Path) -> Vec<PageEntry> {
    templates
        .iter()
        .filter_map(|template| walk_template(template, base_dir))
        .collect()
}

/// Whether any template in the list (recursively) was modified after `since`.
///
/// Files that cannot be inspected count as unchanged.
pub fn modified_since(templates: &[PageTemplate], base_dir: &Path, since: DateTime<Utc>) -> bool {
    templates.iter().any(|template| {
        if modified_since(&template.children, base_dir, since) {
            return true;
        }

        let file = base_dir.join(&template.file);
        let Ok(modified) = std::fs::metadata(&file).and_then(|meta| meta.modified()) else {
            return false;
        };

        let modified: DateTime<Utc> = modified.into();
        if modified > since {
            tracing::debug!(file = ?file, "Page template updated since last generation");
            true
        } else {
            false
        }
    })
}

/// Minify a template. Whitespace-sensitive content (`pre`, `textarea`,
/// scripts, attribute values) is left as written; closing tags are kept so
/// fragments stay well formed when inlined.
pub fn compact_html(body: &str) -> String {
    let mut cfg = Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;

    String::from_utf8_lossy(&minify(body.as_bytes(), &cfg)).into_owned()
}
