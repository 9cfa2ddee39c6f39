//! Static client-side route table.
//!
//! Maps hash-fragment paths to the view that renders them. The table is
//! fixed at startup: `/` redirects to the route named `home`, which renders
//! `ViewHome` at `/inicio`. Matching is case-insensitive and ignores a
//! trailing slash.

use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;
use utoipa::ToSchema;

pub mod history;

pub use history::{HashHistory, Location};

pub const HOME_ROUTE: &str = "home";
pub const HOME_PATH: &str = "/inicio";
pub const HOME_VIEW: &str = "ViewHome";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("route name `{0}` is declared more than once")]
    DuplicateName(String),

    #[error("route path `{0}` is declared more than once")]
    DuplicatePath(String),

    #[error("route `{from}` redirects to unknown target {to}")]
    UnknownRedirectTarget { from: String, to: String },

    #[error("redirect loop starting at `{0}`")]
    RedirectLoop(String),

    #[error("invalid route path `{0}`: paths start with `/`")]
    InvalidPath(String),

    #[error("no route matches {0}")]
    NotFound(String),
}

/// Where a redirect points: a named route or a literal path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RouteRef {
    Name(String),
    Path(String),
}

impl std::fmt::Display for RouteRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteRef::Name(name) => write!(f, "name `{}`", name),
            RouteRef::Path(path) => write!(f, "path `{}`", path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RouteTarget {
    View(String),
    Redirect(RouteRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Route {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub target: RouteTarget,
}

impl Route {
    pub fn view(path: &str, name: &str, view: &str) -> Self {
        Self {
            path: path.to_string(),
            name: Some(name.to_string()),
            target: RouteTarget::View(view.to_string()),
        }
    }

    pub fn redirect_to_name(path: &str, name: &str) -> Self {
        Self {
            path: path.to_string(),
            name: None,
            target: RouteTarget::Redirect(RouteRef::Name(name.to_string())),
        }
    }
}

/// A route that renders a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Matched {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub view: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Render { route: Matched },
    Redirect { from: String, to: Matched },
    NotFound { path: String },
}

/// Normalizes a location path: drops query/fragment, ensures a leading `/`
/// and removes a trailing `/` (except for the root).
pub fn normalize_path(raw: &str) -> String {
    let path = raw
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let mut out = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Validates and freezes a table.
    pub fn new(routes: Vec<Route>) -> Result<Self, RouteError> {
        let table = Self { routes };
        table.validate()?;
        Ok(table)
    }

    /// Checks the table invariants: paths start with `/`, names and paths are
    /// unique, and every redirect reaches a view without looping.
    pub fn validate(&self) -> Result<(), RouteError> {
        let mut names = HashSet::new();
        let mut paths = HashSet::new();
        for route in &self.routes {
            if !route.path.starts_with('/') {
                return Err(RouteError::InvalidPath(route.path.clone()));
            }
            if !paths.insert(normalize_path(&route.path).to_lowercase()) {
                return Err(RouteError::DuplicatePath(route.path.clone()));
            }
            if let Some(name) = &route.name {
                if !names.insert(name.clone()) {
                    return Err(RouteError::DuplicateName(name.clone()));
                }
            }
        }

        for route in &self.routes {
            if let RouteTarget::Redirect(to) = &route.target {
                if self.lookup_ref(to).is_none() {
                    return Err(RouteError::UnknownRedirectTarget {
                        from: route.path.clone(),
                        to: to.to_string(),
                    });
                }
                self.follow(route)?;
            }
        }
        Ok(())
    }

    /// The application table: `/` redirects to `home` (`/inicio`, `ViewHome`).
    ///
    /// Built from constants; `validate` confirms it at startup.
    pub fn standard() -> Self {
        Self {
            routes: vec![
                Route::redirect_to_name("/", HOME_ROUTE),
                Route::view(HOME_PATH, HOME_ROUTE, HOME_VIEW),
            ],
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    fn find_path(&self, path: &str) -> Option<&Route> {
        let wanted = normalize_path(path).to_lowercase();
        self.routes
            .iter()
            .find(|r| normalize_path(&r.path).to_lowercase() == wanted)
    }

    pub fn find_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name.as_deref() == Some(name))
    }

    fn lookup_ref(&self, target: &RouteRef) -> Option<&Route> {
        match target {
            RouteRef::Name(name) => self.find_name(name),
            RouteRef::Path(path) => self.find_path(path),
        }
    }

    /// Follows redirects from `route` to the view that finally renders.
    fn follow(&self, route: &Route) -> Result<Matched, RouteError> {
        let mut current = route;
        for _ in 0..=self.routes.len() {
            match &current.target {
                RouteTarget::View(view) => {
                    return Ok(Matched {
                        path: current.path.clone(),
                        name: current.name.clone(),
                        view: view.clone(),
                    })
                }
                RouteTarget::Redirect(to) => {
                    current = self.lookup_ref(to).ok_or_else(|| {
                        RouteError::UnknownRedirectTarget {
                            from: current.path.clone(),
                            to: to.to_string(),
                        }
                    })?;
                }
            }
        }
        Err(RouteError::RedirectLoop(route.path.clone()))
    }

    pub fn resolve(&self, path: &str) -> Resolution {
        let normalized = normalize_path(path);
        let Some(route) = self.find_path(&normalized) else {
            return Resolution::NotFound { path: normalized };
        };
        match (&route.target, self.follow(route)) {
            (RouteTarget::View(_), Ok(matched)) => Resolution::Render { route: matched },
            (RouteTarget::Redirect(_), Ok(matched)) => Resolution::Redirect {
                from: route.path.clone(),
                to: matched,
            },
            // unreachable for a validated table
            (_, Err(_)) => Resolution::NotFound { path: normalized },
        }
    }

    /// The view rendered for the named route, after redirects.
    pub fn resolve_name(&self, name: &str) -> Result<Matched, RouteError> {
        let route = self
            .find_name(name)
            .ok_or_else(|| RouteError::NotFound(format!("name `{}`", name)))?;
        self.follow(route)
    }

    /// Address of a named route under hash history, e.g. `/#/inicio`.
    pub fn href_for(&self, base: &str, name: &str) -> Result<String, RouteError> {
        let matched = self.resolve_name(name)?;
        Ok(hash_href(base, &matched.path))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Joins the history base and a route path into a hash address.
pub fn hash_href(base: &str, path: &str) -> String {
    let base = base.split('#').next().unwrap_or_default();
    let base = if base.is_empty() { "/" } else { base };
    format!("{}#{}", base, normalize_path(path))
}
