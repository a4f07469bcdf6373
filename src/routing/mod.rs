//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request head (host, path)
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: matched Route (backend + header rules) or NoMatch
//!
//! Route Compilation (at startup):
//!     RemapConfig[] + RuleRegistry
//!     → Sort by priority
//!     → Compile matchers, resolve rule chains
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - First match wins (ordered by priority)

pub mod matcher;
pub mod router;

pub use router::{Route, RouteError, Router};
