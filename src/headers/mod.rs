//! Request header injection subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration load:
//!     remap entry params [label, target, "KEY:VALUE", flag?]
//!     → rule.rs (parse & validate)
//!     → registry.rs (Arc<RuleConfig> keyed by label)
//!
//! Per request:
//!     matched route's rules (in order)
//!     → injector.rs (find / skip / remove-then-append)
//!     → store.rs (HeaderStore over the live HeaderMap)
//!     → failures → diagnostics.rs (sink), request continues
//! ```
//!
//! # Design Decisions
//! - Rules are immutable once parsed and shared without locks
//! - Misconfigured rules fail closed at load time
//! - Request-time failures degrade to a no-op for that rule

pub mod diagnostics;
pub mod injector;
pub mod registry;
pub mod rule;
pub mod store;

pub use diagnostics::{DiagnosticSink, MemorySink, TracingSink};
pub use injector::{HeaderInjector, Injection, RuntimeError};
pub use registry::RuleRegistry;
pub use rule::{parse_rule, ConfigError, RuleConfig, REMOVE_DUPLICATE_FLAG};
pub use store::{FieldError, HeaderField, HeaderList, HeaderStore};
