//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Request<Bytes> + ResponseSink
//!     → Routing:   registry.lookup(path)          (miss → 404)
//!     → Invoking:  resource.handler(method)       (absent → 405)
//!                  handler(&mut RequestContext)   (Err → 500, logged)
//!     → Responding: error body for failures, nothing extra on success
//! ```
//!
//! # Design Decisions
//! - One `RequestContext` per request, never shared
//! - Registry is read-only behind `Arc`; no locks on the hot path
//! - Handlers are synchronous; the server runs each dispatch on a blocking worker

pub mod context;
pub mod dispatcher;

pub use context::{ContextError, RequestContext};
pub use dispatcher::{
    Dispatcher, Outcome, HANDLER_FAILED_MESSAGE, METHOD_NOT_ALLOWED_MESSAGE, NOT_FOUND_MESSAGE,
};
