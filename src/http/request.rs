//! Request identification.
//!
//! # Responsibilities
//! - Name the request ID header shared by the middleware stack
//! - Read the ID back for log correlation
//!
//! # Design Decisions
//! - IDs are UUIDs assigned by `SetRequestIdLayer` as early as possible
//! - A client-supplied ID is kept and propagated to the origin

use axum::http::header::{HeaderMap, HeaderName};

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// The request ID, or "unknown" when absent or not valid text.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}
