//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (remap entries reference existing backends)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Parse every header rule so a bad one never goes live
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Rule registration is shared with the server so both see the same rule set

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::headers::{ConfigError, RuleRegistry};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroRequestTimeout,

    #[error("backend '{0}' is defined more than once")]
    DuplicateBackend(String),

    #[error("backend '{name}' has invalid address '{address}'")]
    InvalidBackendAddress { name: String, address: String },

    #[error("remap '{0}' is defined more than once")]
    DuplicateRemap(String),

    #[error("remap '{remap}' references unknown backend '{backend}'")]
    UnknownBackend { remap: String, backend: String },

    #[error("remap '{remap}': {source}")]
    InvalidRule {
        remap: String,
        #[source]
        source: ConfigError,
    },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let mut backend_names = HashSet::new();
    for backend in &config.backends {
        if !backend_names.insert(backend.name.as_str()) {
            errors.push(ValidationError::DuplicateBackend(backend.name.clone()));
        }
        if backend.address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidBackendAddress {
                name: backend.name.clone(),
                address: backend.address.clone(),
            });
        }
    }

    let mut remap_names = HashSet::new();
    for remap in &config.remap {
        if !remap_names.insert(remap.name.as_str()) {
            errors.push(ValidationError::DuplicateRemap(remap.name.clone()));
        }
        if config.backend(&remap.backend).is_none() {
            errors.push(ValidationError::UnknownBackend {
                remap: remap.name.clone(),
                backend: remap.backend.clone(),
            });
        }
    }

    // Parsed into a scratch registry so duplicate ids surface here too.
    if let Err(rule_errors) = register_rules(config) {
        errors.extend(rule_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse and register every `add_header` entry, in file order.
///
/// Every failing rule is reported, not just the first.
pub fn register_rules(config: &ProxyConfig) -> Result<RuleRegistry, Vec<ValidationError>> {
    let mut registry = RuleRegistry::new();
    let mut errors = Vec::new();

    for remap in &config.remap {
        let target = config
            .backend(&remap.backend)
            .map(|b| b.address.as_str())
            .unwrap_or_default();

        for (index, entry) in remap.add_header.iter().enumerate() {
            if entry.policy.is_some() && !entry.replaces() {
                tracing::warn!(
                    remap = %remap.name,
                    policy = ?entry.policy,
                    "Unrecognized duplicate policy, existing headers will be kept"
                );
            }
            if let Err(source) = registry.register(&remap.rule_params(index, target)) {
                errors.push(ValidationError::InvalidRule {
                    remap: remap.name.clone(),
                    source,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(registry)
    } else {
        Err(errors)
    }
}

/// Render a list of validation errors on one line.
pub(crate) fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{AddHeaderConfig, BackendConfig, RemapConfig};

    fn header(pair: &str) -> AddHeaderConfig {
        AddHeaderConfig {
            header: pair.into(),
            policy: None,
            id: None,
        }
    }

    fn valid_config() -> ProxyConfig {
        let mut config = ProxyConfig::default();
        config.backends.push(BackendConfig {
            name: "origin".into(),
            address: "127.0.0.1:3000".into(),
        });
        config.remap.push(RemapConfig {
            name: "r1".into(),
            host: None,
            path_prefix: Some("/".into()),
            backend: "origin".into(),
            priority: 0,
            add_header: vec![header("X-Added:hello")],
        });
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid_config();
        config.listener.bind_address = "nowhere".into();
        config.timeouts.request_secs = 0;
        config.remap[0].backend = "missing".into();
        config.remap[0].add_header.push(header("broken"));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
        assert!(errors.contains(&ValidationError::UnknownBackend {
            remap: "r1".into(),
            backend: "missing".into(),
        }));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::InvalidRule { source: ConfigError::InvalidFormat { .. }, .. }
        )));
    }

    #[test]
    fn test_duplicate_names() {
        let mut config = valid_config();
        config.backends.push(config.backends[0].clone());
        let mut second = config.remap[0].clone();
        second.add_header[0].id = Some("other".into());
        config.remap.push(second);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateBackend("origin".into())));
        assert!(errors.contains(&ValidationError::DuplicateRemap("r1".into())));
    }

    #[test]
    fn test_duplicate_rule_ids() {
        let mut config = valid_config();
        let mut entry = header("X-Other:1");
        entry.id = Some("r1#0".into());
        config.remap[0].add_header.push(entry);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidRule {
                remap: "r1".into(),
                source: ConfigError::DuplicateRule { label: "r1#0".into() },
            }]
        );
    }

    #[test]
    fn test_register_rules_in_file_order() {
        let mut config = valid_config();
        let mut entry = header("X-Team:core");
        entry.id = Some("team".into());
        entry.policy = Some("remove_duplicate".into());
        config.remap[0].add_header.push(entry);

        let registry = register_rules(&config).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("r1#0").unwrap().key(), "X-Added");
        assert!(registry.get("team").unwrap().replace_existing());
    }

    #[test]
    fn test_register_rules_reports_every_failure() {
        let mut config = valid_config();
        config.remap[0].add_header.push(header("broken"));
        config.remap[0].add_header.push(header(":empty"));

        let errors = register_rules(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::InvalidRule { remap, .. } if remap == "r1")));
    }

    #[test]
    fn test_invalid_backend_address() {
        let mut config = valid_config();
        config.backends[0].address = "localhost".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::InvalidBackendAddress { .. }));
    }
}
