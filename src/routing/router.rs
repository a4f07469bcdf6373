//! Remap lookup.
//!
//! # Responsibilities
//! - Compile remap entries into routes with their backend and rule chain
//! - Look up the matching route for a request head
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Routes ordered by priority, highest first; ties keep file order
//! - Rule chains hold `Arc`s taken from the registry

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::request::Parts;
use thiserror::Error;

use crate::config::ProxyConfig;
use crate::headers::{RuleConfig, RuleRegistry};
use crate::routing::matcher::{AndMatcher, HostMatcher, Matcher, PathPrefixMatcher};

/// Errors raised while compiling routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("remap '{remap}' references unknown backend '{backend}'")]
    UnknownBackend { remap: String, backend: String },

    #[error("backend '{name}' has invalid address '{address}'")]
    InvalidAddress { name: String, address: String },

    #[error("remap '{remap}' references unregistered rule '{rule}'")]
    UnknownRule { remap: String, rule: String },
}

/// A compiled remap entry.
#[derive(Debug)]
pub struct Route {
    pub name: String,
    pub backend: SocketAddr,
    pub rules: Vec<Arc<RuleConfig>>,
    pub priority: u32,
    matcher: AndMatcher,
}

impl Route {
    pub fn matches(&self, head: &Parts) -> bool {
        self.matcher.matches(head)
    }
}

/// Ordered set of routes.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Compile the remap entries of `config`, resolving rules from `registry`.
    pub fn build(config: &ProxyConfig, registry: &RuleRegistry) -> Result<Self, RouteError> {
        let mut routes = Vec::with_capacity(config.remap.len());

        for remap in &config.remap {
            let backend = config
                .backend(&remap.backend)
                .ok_or_else(|| RouteError::UnknownBackend {
                    remap: remap.name.clone(),
                    backend: remap.backend.clone(),
                })?;
            let addr: SocketAddr = backend
                .address
                .parse()
                .map_err(|_| RouteError::InvalidAddress {
                    name: backend.name.clone(),
                    address: backend.address.clone(),
                })?;

            let rules = (0..remap.add_header.len())
                .map(|index| {
                    let id = remap.rule_id(index);
                    registry.get(&id).ok_or(RouteError::UnknownRule {
                        remap: remap.name.clone(),
                        rule: id,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let mut matchers: Vec<Box<dyn Matcher>> = Vec::new();
            if let Some(host) = &remap.host {
                matchers.push(Box::new(HostMatcher::new(host.as_str())));
            }
            if let Some(prefix) = &remap.path_prefix {
                matchers.push(Box::new(PathPrefixMatcher::new(prefix.as_str())));
            }

            routes.push(Route {
                name: remap.name.clone(),
                backend: addr,
                rules,
                priority: remap.priority,
                matcher: AndMatcher::new(matchers),
            });
        }

        // Stable sort keeps file order among equal priorities.
        routes.sort_by(|a, b| b.priority.cmp(&a.priority));

        Ok(Self { routes })
    }

    /// First route matching the request head, if any.
    pub fn match_request(&self, head: &Parts) -> Option<&Route> {
        self.routes.iter().find(|r| r.matches(head))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
