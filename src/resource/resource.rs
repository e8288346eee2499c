//! The resource type and its capability traits.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use super::hypermedia::{Hypermedia, Link, ResolvedLink};
use crate::dispatch::RequestContext;
use crate::routing::Bindings;

/// Outcome of a handler: `Ok` after writing the response, or an error.
pub type HandlerResult = Result<(), tower::BoxError>;

/// A request handler bound to one method of a resource.
pub type HandlerFunc = Arc<dyn Fn(&mut RequestContext<'_>) -> HandlerResult + Send + Sync>;

/// Per-method handler lookup.
pub trait HandlerLookup {
    /// Handler for `method`; absence is a normal outcome.
    fn handler(&self, method: &Method) -> Option<&HandlerFunc>;

    /// Methods with a registered handler, sorted by name.
    fn allowed_methods(&self) -> Vec<Method>;
}

/// Access to a resource's hypermedia links.
pub trait LinkRegistry {
    fn hypermedia(&self) -> &Hypermedia;

    /// Resolve all links for one request without touching the stored templates.
    fn resolve_links(&self, bindings: &Bindings) -> Vec<ResolvedLink> {
        self.hypermedia().resolve(bindings)
    }
}

/// The pattern a resource was registered under.
pub trait PathProvider {
    fn path(&self) -> &str;
}

/// A routable resource.
pub struct Resource {
    path: String,
    handlers: HashMap<Method, HandlerFunc>,
    hypermedia: Hypermedia,
}

impl Resource {
    pub(crate) fn new(path: String) -> Self {
        Self {
            path,
            handlers: HashMap::new(),
            hypermedia: Hypermedia::new(),
        }
    }

    /// Bind `handler` to `method`, replacing any earlier one.
    pub fn register_handler(&mut self, method: Method, handler: HandlerFunc) {
        if self.handlers.insert(method.clone(), handler).is_some() {
            tracing::debug!(path = %self.path, method = %method, "handler replaced");
        }
    }

    /// Store a link; link targets are validated by the registry.
    pub(crate) fn insert_link(&mut self, link: Link) {
        if let Some(old) = self.hypermedia.insert(link) {
            tracing::debug!(path = %self.path, relation = old.relation(), "link replaced");
        }
    }
}

impl HandlerLookup for Resource {
    fn handler(&self, method: &Method) -> Option<&HandlerFunc> {
        self.handlers.get(method)
    }

    fn allowed_methods(&self) -> Vec<Method> {
        let mut methods: Vec<Method> = self.handlers.keys().cloned().collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }
}

impl LinkRegistry for Resource {
    fn hypermedia(&self) -> &Hypermedia {
        &self.hypermedia
    }
}

impl PathProvider for Resource {
    fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path)
            .field("methods", &self.allowed_methods())
            .field("hypermedia", &self.hypermedia)
            .finish()
    }
}
