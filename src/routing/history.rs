//! Hash-based navigation over a `RouteTable`.

use super::{hash_href, normalize_path, Resolution, RouteError, RouteTable};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// The location currently shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `None` when the address matched no route (nothing is rendered).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    pub href: String,
}

/// Client-side history keyed on the URL fragment.
///
/// Navigation never leaves the process; the table is shared and read-only.
pub struct HashHistory {
    table: Arc<RouteTable>,
    base: String,
    entries: Vec<Location>,
}

/// Extracts the route path from a full address: `http://h/app/#/inicio?x=1` -> `/inicio`.
pub fn fragment_path(address: &str) -> String {
    match address.split_once('#') {
        Some((_, fragment)) => normalize_path(fragment),
        None => "/".to_string(),
    }
}

impl HashHistory {
    /// Starts from whatever the address bar holds. Unknown paths are kept as
    /// an unmatched location rather than rejected.
    pub fn start(table: Arc<RouteTable>, base: &str, address: &str) -> Self {
        let mut history = Self {
            table,
            base: base.to_string(),
            entries: Vec::new(),
        };
        let path = fragment_path(address);
        let location = match history.locate(&path) {
            Ok(location) => location,
            Err(_) => Location {
                href: hash_href(&history.base, &path),
                path,
                name: None,
                view: None,
            },
        };
        debug!(path = %location.path, "hash history started");
        history.entries.push(location);
        history
    }

    fn locate(&self, path: &str) -> Result<Location, RouteError> {
        let matched = match self.table.resolve(path) {
            Resolution::Render { route } => route,
            Resolution::Redirect { to, .. } => to,
            Resolution::NotFound { path } => return Err(RouteError::NotFound(path)),
        };
        Ok(Location {
            href: hash_href(&self.base, &matched.path),
            path: matched.path,
            name: matched.name,
            view: Some(matched.view),
        })
    }

    pub fn current(&self) -> &Location {
        // `start` always pushes an entry and `back` never pops the last one
        &self.entries[self.entries.len() - 1]
    }

    /// Navigates to `path`, following redirects.
    pub fn push(&mut self, path: &str) -> Result<&Location, RouteError> {
        let location = self.locate(path)?;
        debug!(from = %self.current().path, to = %location.path, "navigate");
        self.entries.push(location);
        Ok(self.current())
    }

    pub fn push_named(&mut self, name: &str) -> Result<&Location, RouteError> {
        let matched = self.table.resolve_name(name)?;
        self.push(&matched.path)
    }

    /// Goes back one entry; `None` when already at the first one.
    pub fn back(&mut self) -> Option<&Location> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop();
        Some(self.current())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
