//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → logging installed from [observability]
//!     → validation.rs (semantic checks, every header rule parsed)
//!     → ProxyConfig (validated, immutable)
//!     → HttpServer builds the rule registry and routes from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, read_config, LoadError};
pub use schema::{
    AddHeaderConfig, BackendConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig,
    RemapConfig, TimeoutConfig,
};
pub use validation::{register_rules, validate_config, ValidationError};
