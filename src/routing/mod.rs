//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup):
//!     pattern "/widgets/:id"
//!     → segment.rs (split into non-empty segments)
//!     → node.rs (walk/create literal or parameter children)
//!     → bind value at terminal node
//!
//! Incoming request path:
//!     → segment.rs (split)
//!     → router.rs (walk tree, literal before parameter)
//!     → Return: RouteMatch { value, bindings } or None
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable at runtime
//! - At most one parameter child per node; conflicting names are rejected
//! - Literal children win over the parameter child
//! - No backtracking: the single-parameter invariant makes the walk unambiguous
//! - Explicit `None` rather than a silent default route

pub mod node;
pub mod router;
pub mod segment;

pub use router::{Bindings, RouteError, RouteMatch, Router};
pub use segment::{normalize, segments};
