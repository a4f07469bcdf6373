//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → routing (match remap entry)
//!     → headers (apply the entry's add_header rules)
//!     → hyper-util client → origin
//!     → response streamed back to the client
//! ```

pub mod request;
pub mod server;

pub use request::{request_id, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
