//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (rule creation, injection decisions, upstream errors)
//!     → logging.rs (subscriber: env filter + pretty/JSON formatter)
//!
//! Consumers:
//!     → stdout, collected by the process supervisor
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through every request span

pub mod logging;
