//! Request header injection for a reverse proxy.
//!
//! Each remap entry carries `add_header` rules. A rule adds a fixed header to the
//! request sent to the origin unless one with the same name is already present,
//! or, with `remove_duplicate`, replaces the first existing one.

pub mod config;
pub mod headers;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use headers::{parse_rule, HeaderInjector, RuleConfig, RuleRegistry};
pub use http::HttpServer;
