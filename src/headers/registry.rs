//! Rule registry.
//!
//! # Responsibilities
//! - Own every active rule, keyed by its label
//! - Hand out shared references for request-time use
//! - Release rules when their remap entry is unloaded
//!
//! # Design Decisions
//! - Populated during configuration load only; read-only while serving
//! - Rules are `Arc`-shared so a disposed rule outlives in-flight requests
//! - Duplicate labels are rejected rather than silently replaced

use std::collections::HashMap;
use std::sync::Arc;

use crate::headers::rule::{parse_rule, ConfigError, RuleConfig};

/// Active rules keyed by label.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<RuleConfig>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register a rule. The first parameter is its label.
    pub fn register<S: AsRef<str>>(&mut self, params: &[S]) -> Result<Arc<RuleConfig>, ConfigError> {
        let rule = match parse_rule(params) {
            Ok(rule) => rule,
            Err(e) => {
                tracing::error!(error = %e, "Unable to create rule");
                return Err(e);
            }
        };

        if self.rules.contains_key(rule.label()) {
            return Err(ConfigError::DuplicateRule {
                label: rule.label().to_string(),
            });
        }

        tracing::info!(
            label = %rule.label(),
            key = %rule.key(),
            value = %rule.value(),
            replace_existing = rule.replace_existing(),
            "Rule created"
        );

        let rule = Arc::new(rule);
        self.rules.insert(rule.label().to_string(), rule.clone());
        Ok(rule)
    }

    pub fn get(&self, label: &str) -> Option<Arc<RuleConfig>> {
        self.rules.get(label).cloned()
    }

    /// Remove a rule. Returns false if it was never registered or already disposed.
    pub fn dispose(&mut self, label: &str) -> bool {
        match self.rules.remove(label) {
            Some(_) => {
                tracing::debug!(label = %label, "Rule disposed");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
