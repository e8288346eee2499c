//! Embedded HTTP resource router with hypermedia links.
//!
//! Register resources under path patterns, attach per-method handlers and
//! links to other resources, then freeze the registry into a [`Dispatcher`]:
//!
//! ```no_run
//! use restlink::{Dispatcher, Representation, ResourceRegistry};
//!
//! let mut registry = ResourceRegistry::new();
//! registry.register("/widgets/:id")?.get(|ctx| {
//!     let id = ctx.param("id").unwrap_or_default().to_string();
//!     ctx.render(&Representation::new().field("id", id))?;
//!     Ok(())
//! });
//! registry
//!     .register("/widgets")?
//!     .link("item", "/widgets/:id")?;
//!
//! let dispatcher = Dispatcher::new(registry);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod resource;
pub mod routing;

pub use config::AppConfig;
pub use dispatch::{Dispatcher, Outcome, RequestContext};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use render::Representation;
pub use resource::{HandlerResult, Resource, ResourceRegistry};
