//! Representation rendering and content negotiation.
//!
//! # Data Flow
//! ```text
//! Handler builds Representation (fields)
//!     → RequestContext::render
//!     → resource links resolved with request bindings
//!     → negotiate.rs picks a Renderer from the Accept header
//!     → html.rs / json.rs produce bytes
//!     → deferred ResponseWriter commits status and body
//! ```
//!
//! # Design Decisions
//! - Renderers are pure: a `Document` in, bytes out
//! - Missing Accept means HTML; unmatched Accept means the configured default
//! - JSON links are absolute URLs; HTML links keep the resolved path

pub mod html;
pub mod json;
pub mod negotiate;

use thiserror::Error;
use url::Url;

use crate::resource::ResolvedLink;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use negotiate::ContentNegotiator;

pub const MIME_TEXT_HTML: &str = "text/html";
pub const MIME_APPLICATION_JSON: &str = "application/json";

/// Errors raised while rendering a document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fields a handler wants to expose, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Representation {
    fields: Vec<(String, String)>,
}

impl Representation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.fields.push((key.into(), value.to_string()));
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// Everything a renderer needs for one response.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    pub fields: &'a [(String, String)],
    pub links: &'a [ResolvedLink],
    /// Base for absolute link URLs.
    pub base_url: Option<&'a Url>,
}

/// Turns a document into response bytes of one media type.
pub trait Renderer: Send + Sync {
    /// Value sent as `Content-Type`.
    fn media_type(&self) -> &'static str;

    fn render(&self, document: &Document<'_>) -> Result<Vec<u8>, RenderError>;
}
