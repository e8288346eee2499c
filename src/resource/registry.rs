//! Resource registry: owns every resource and the route table pointing at them.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::Method;

use super::hypermedia::{Link, LinkError};
use super::resource::{HandlerFunc, HandlerResult, PathProvider, Resource};
use crate::dispatch::RequestContext;
use crate::routing::{normalize, Bindings, RouteError, Router};

/// Index of a resource inside its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ResourceId(usize);

/// All resources of one application plus the router that finds them.
///
/// Mutated only during setup; the dispatcher takes it behind an `Arc`.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    router: Router<ResourceId>,
    resources: Vec<Resource>,
    patterns: HashMap<String, ResourceId>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resource at `pattern` and route to it.
    pub fn register(&mut self, pattern: &str) -> Result<ResourceMut<'_>, RouteError> {
        let key = normalize(pattern);
        let id = ResourceId(self.resources.len());
        self.router.add_route(&key, id)?;

        tracing::debug!(pattern = %key, "resource registered");
        self.resources.push(Resource::new(key.clone()));
        self.patterns.insert(key, id);
        Ok(ResourceMut { registry: self, id })
    }

    /// Re-open a registered resource for further setup.
    pub fn resource_mut(&mut self, pattern: &str) -> Option<ResourceMut<'_>> {
        let id = *self.patterns.get(&normalize(pattern))?;
        Some(ResourceMut { registry: self, id })
    }

    pub fn resource(&self, pattern: &str) -> Option<&Resource> {
        self.patterns
            .get(&normalize(pattern))
            .and_then(|id| self.resources.get(id.0))
    }

    /// Whether `pattern` names a registered resource.
    pub fn resource_exists(&self, pattern: &str) -> bool {
        self.patterns.contains_key(&normalize(pattern))
    }

    /// Match a request path to its resource and parameter bindings.
    pub fn lookup(&self, path: &str) -> Option<(&Resource, Bindings)> {
        let matched = self.router.match_path(path)?;
        let resource = self.resources.get(matched.value.0)?;
        Some((resource, matched.bindings))
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Setup handle for one resource, borrowed from its registry.
pub struct ResourceMut<'a> {
    registry: &'a mut ResourceRegistry,
    id: ResourceId,
}

impl<'a> ResourceMut<'a> {
    fn resource(&mut self) -> &mut Resource {
        &mut self.registry.resources[self.id.0]
    }

    pub fn path(&self) -> &str {
        self.registry.resources[self.id.0].path()
    }

    /// Bind `handler` to `method`, replacing any earlier one.
    pub fn handle<F>(mut self, method: Method, handler: F) -> Self
    where
        F: Fn(&mut RequestContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        let handler: HandlerFunc = Arc::new(handler);
        self.resource().register_handler(method, handler);
        self
    }

    pub fn get<F>(self, handler: F) -> Self
    where
        F: Fn(&mut RequestContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::GET, handler)
    }

    pub fn post<F>(self, handler: F) -> Self
    where
        F: Fn(&mut RequestContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::POST, handler)
    }

    pub fn put<F>(self, handler: F) -> Self
    where
        F: Fn(&mut RequestContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::PUT, handler)
    }

    pub fn patch<F>(self, handler: F) -> Self
    where
        F: Fn(&mut RequestContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::PATCH, handler)
    }

    pub fn delete<F>(self, handler: F) -> Self
    where
        F: Fn(&mut RequestContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::DELETE, handler)
    }

    /// Link to another registered resource under `relation`.
    ///
    /// `href` may carry `:param` placeholders and must equal a registered
    /// pattern.
    pub fn link(mut self, relation: &str, href: &str) -> Result<Self, LinkError> {
        if !self.registry.resource_exists(href) {
            return Err(LinkError::TargetResourceNotFound {
                href: href.to_string(),
            });
        }
        self.resource().insert_link(Link::new(href, relation));
        Ok(self)
    }
}
