//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers, body collection)
//!     → request.rs (request ID)
//!     → [dispatch::Dispatcher on a blocking worker]
//!     → response.rs (deferred-status writer into a BufferedSink)
//!     → status.rs (reason phrases, error bodies)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod status;

pub use request::X_REQUEST_ID;
pub use response::{BufferedSink, ResponseError, ResponseSink, ResponseWriter, StatusState};
pub use server::HttpServer;
pub use status::{error_body, reason_phrase};
