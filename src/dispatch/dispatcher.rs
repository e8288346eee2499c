//! Request dispatch: route, invoke, respond.
//!
//! # Responsibilities
//! - Match the request path against the frozen registry
//! - Build a fresh `RequestContext` per request
//! - Invoke the handler for the request method
//! - Translate routing and handler failures into fixed status outcomes
//!
//! # Design Decisions
//! - Failures never escape as panics or errors; every request ends in an `Outcome`
//! - Handler error details are logged, never sent to the client
//! - On success the handler owns the response; nothing is written implicitly

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::header::ALLOW;
use axum::http::{HeaderValue, Request, StatusCode};
use url::Url;

use super::context::{write_error, RequestContext};
use crate::config::RenderingConfig;
use crate::http::response::{ResponseSink, ResponseWriter};
use crate::render::ContentNegotiator;
use crate::resource::{HandlerLookup, PathProvider, ResourceRegistry};

pub const NOT_FOUND_MESSAGE: &str = "Resource does not exist";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Handler does not exist for the request method";
pub const HANDLER_FAILED_MESSAGE: &str = "The request could not be completed";

/// How a dispatched request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The handler returned `Ok`; `status` is `None` if it wrote nothing.
    Handled { status: Option<StatusCode> },
    NotFound,
    MethodNotAllowed,
    /// The handler returned an error; `status` is what the client received.
    HandlerFailed { status: StatusCode },
}

impl Outcome {
    /// Status sent to the client, if one was committed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Outcome::Handled { status } => *status,
            Outcome::NotFound => Some(StatusCode::NOT_FOUND),
            Outcome::MethodNotAllowed => Some(StatusCode::METHOD_NOT_ALLOWED),
            Outcome::HandlerFailed { status } => Some(*status),
        }
    }
}

/// Dispatches requests against a registry that no longer changes.
pub struct Dispatcher {
    registry: Arc<ResourceRegistry>,
    negotiator: ContentNegotiator,
    base_url: Option<Url>,
}

impl Dispatcher {
    /// Freeze `registry` and serve it with default rendering settings.
    pub fn new(registry: ResourceRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            negotiator: ContentNegotiator::default(),
            base_url: None,
        }
    }

    /// Freeze `registry` with the rendering section of the configuration.
    pub fn from_config(
        registry: ResourceRegistry,
        rendering: &RenderingConfig,
    ) -> Result<Self, url::ParseError> {
        let base_url = rendering.base_url.as_deref().map(Url::parse).transpose()?;
        Ok(Self {
            registry: Arc::new(registry),
            negotiator: ContentNegotiator::new(rendering.default_media_type.clone()),
            base_url,
        })
    }

    pub fn with_negotiator(mut self, negotiator: ContentNegotiator) -> Self {
        self.negotiator = negotiator;
        self
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Handle one request, writing the response into `sink`.
    pub fn dispatch(&self, request: &Request<Bytes>, sink: &mut dyn ResponseSink) -> Outcome {
        let method = request.method();
        let path = request.uri().path();
        let mut response = ResponseWriter::new(sink);

        // Routing
        let Some((resource, bindings)) = self.registry.lookup(path) else {
            tracing::warn!(method = %method, path = %path, status = 404, "no resource matched");
            fail(&mut response, StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE);
            return Outcome::NotFound;
        };

        // Invoking
        let Some(handler) = resource.handler(method) else {
            let allowed = resource
                .allowed_methods()
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(value) = HeaderValue::from_str(&allowed) {
                response.set_header(ALLOW, value);
            }
            tracing::warn!(
                method = %method,
                path = %path,
                resource = %resource.path(),
                status = 405,
                "no handler for method"
            );
            fail(&mut response, StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE);
            return Outcome::MethodNotAllowed;
        };

        let mut ctx = RequestContext::new(
            request,
            resource,
            bindings,
            response,
            &self.negotiator,
            self.base_url.as_ref(),
        );
        let result = handler(&mut ctx);
        let mut response = ctx.into_response();

        // Responding
        match result {
            Ok(()) => {
                let status = response.status();
                tracing::info!(
                    method = %method,
                    path = %path,
                    status = status.map(|s| s.as_u16()),
                    bytes = response.bytes_written(),
                    "request handled"
                );
                Outcome::Handled { status }
            }
            Err(err) => {
                if let Some(status) = response.status() {
                    tracing::error!(
                        method = %method,
                        path = %path,
                        status = status.as_u16(),
                        error = %err,
                        "handler failed after committing a response"
                    );
                    return Outcome::HandlerFailed { status };
                }
                tracing::error!(
                    method = %method,
                    path = %path,
                    status = 500,
                    error = %err,
                    "handler failed"
                );
                fail(&mut response, StatusCode::INTERNAL_SERVER_ERROR, HANDLER_FAILED_MESSAGE);
                Outcome::HandlerFailed {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
        }
    }
}

/// Write an error response; transport failures are logged and dropped.
fn fail(response: &mut ResponseWriter<'_>, status: StatusCode, message: &str) {
    if let Err(err) = write_error(response, status, message) {
        tracing::error!(status = status.as_u16(), error = %err, "failed to write error response");
    }
}
