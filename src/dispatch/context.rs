//! Per-request context handed to handlers.

use std::borrow::Cow;

use axum::body::Bytes;
use axum::http::header::{ACCEPT, CONTENT_TYPE, HOST};
use axum::http::{HeaderValue, Method, Request, StatusCode};
use thiserror::Error;
use url::Url;

use crate::http::response::{ResponseError, ResponseWriter};
use crate::http::status::error_body;
use crate::render::{ContentNegotiator, Document, RenderError, Representation};
use crate::resource::{LinkRegistry, Resource};
use crate::routing::Bindings;

/// Errors raised by context helpers; handlers can `?` them.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Response(#[from] ResponseError),
}

/// State for one request: matched resource, bindings and response writer.
///
/// Created by the dispatcher and dropped when the request completes.
pub struct RequestContext<'a> {
    request: &'a Request<Bytes>,
    resource: &'a Resource,
    bindings: Bindings,
    response: ResponseWriter<'a>,
    negotiator: &'a ContentNegotiator,
    base_url: Option<&'a Url>,
}

impl<'a> RequestContext<'a> {
    pub(crate) fn new(
        request: &'a Request<Bytes>,
        resource: &'a Resource,
        bindings: Bindings,
        response: ResponseWriter<'a>,
        negotiator: &'a ContentNegotiator,
        base_url: Option<&'a Url>,
    ) -> Self {
        Self {
            request,
            resource,
            bindings,
            response,
            negotiator,
            base_url,
        }
    }

    pub fn request(&self) -> &Request<Bytes> {
        self.request
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// Request path, percent-decoded; the raw path if it does not decode
    /// to UTF-8.
    pub fn path(&self) -> Cow<'_, str> {
        let raw = self.request.uri().path();
        urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
    }

    /// Request path exactly as it arrived on the wire.
    pub fn raw_path(&self) -> &str {
        self.request.uri().path()
    }

    pub fn body(&self) -> &Bytes {
        self.request.body()
    }

    /// Request header as text, if present and valid.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.headers().get(name).and_then(|v| v.to_str().ok())
    }

    pub fn resource(&self) -> &Resource {
        self.resource
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Value bound to the path parameter `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.bindings.get(name)
    }

    pub fn response(&mut self) -> &mut ResponseWriter<'a> {
        &mut self.response
    }

    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, ResponseError> {
        self.response.write(bytes)
    }

    pub fn write_str(&mut self, text: &str) -> Result<usize, ResponseError> {
        self.response.write(text.as_bytes())
    }

    /// Write an error in the `"<Reason Phrase>: <message>"` format.
    pub fn send_error(&mut self, status: StatusCode, message: &str) -> Result<(), ResponseError> {
        write_error(&mut self.response, status, message)
    }

    /// Render `representation` plus the resource's resolved links in the
    /// negotiated media type.
    pub fn render(&mut self, representation: &Representation) -> Result<(), ContextError> {
        let links = self.resource.resolve_links(&self.bindings);
        let host_base = match self.base_url {
            Some(_) => None,
            None => self
                .header(HOST.as_str())
                .and_then(|host| Url::parse(&format!("http://{}", host)).ok()),
        };
        let document = Document {
            fields: representation.fields(),
            links: &links,
            base_url: self.base_url.or(host_base.as_ref()),
        };

        let negotiator = self.negotiator;
        let renderer = negotiator.select(self.header(ACCEPT.as_str()));
        let bytes = renderer.render(&document)?;
        self.response
            .set_header(CONTENT_TYPE, HeaderValue::from_static(renderer.media_type()));
        self.response.write(&bytes)?;
        Ok(())
    }

    pub(crate) fn into_response(self) -> ResponseWriter<'a> {
        self.response
    }
}

/// Commit `status` and write the plain-text error body.
pub(crate) fn write_error(
    response: &mut ResponseWriter<'_>,
    status: StatusCode,
    message: &str,
) -> Result<(), ResponseError> {
    let (status, body) = error_body(status, message);
    response.set_header(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response.write_header(status)?;
    response.write_str(&body)?;
    Ok(())
}
