//! Resources: per-method handlers plus hypermedia links.
//!
//! # Data Flow
//! ```text
//! Setup (single-threaded):
//!     ResourceRegistry::register(pattern)
//!     → routing::Router::add_route (validated)
//!     → ResourceMut: get/post/... handlers, link(relation, href)
//!     → link target checked against registered patterns
//!
//! Runtime (read-only, shared):
//!     ResourceRegistry::lookup(path) → (&Resource, Bindings)
//!     Resource::handler(method)      → Option<&HandlerFunc>
//!     Resource::resolve_links(b)     → fresh Vec<ResolvedLink>
//! ```
//!
//! # Design Decisions
//! - One concrete `Resource` type exposing three capability traits
//! - Registry is an explicit value, frozen behind `Arc` once serving starts
//! - Link templates are immutable; resolution always allocates new strings

pub mod hypermedia;
pub mod registry;
#[allow(clippy::module_inception)]
pub mod resource;

pub use hypermedia::{Hypermedia, Link, LinkError, ResolvedLink};
pub use registry::{ResourceMut, ResourceRegistry};
pub use resource::{HandlerFunc, HandlerLookup, HandlerResult, LinkRegistry, PathProvider, Resource};
