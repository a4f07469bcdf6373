//! Rule parsing.
//!
//! # Responsibilities
//! - Turn a remap entry's parameter tuple into an immutable `RuleConfig`
//! - Reject malformed `key:value` parameters before a route goes live
//! - Hold the template field copied into every matching request
//!
//! # Parameter Layout
//! ```text
//! [0] label         identifies the rule in logs and in the registry
//! [1] (ignored)     legacy slot, carries the remap target
//! [2] "KEY:VALUE"   mandatory, split at the first colon
//! [3] flag          optional, "remove_duplicate" enables replacement;
//!                   ignored when more parameters follow
//! ```

use thiserror::Error;

use crate::headers::store::HeaderField;

/// Flag token that turns on replacement of an existing header.
pub const REMOVE_DUPLICATE_FLAG: &str = "remove_duplicate";

const LABEL_INDEX: usize = 0;
const PAIR_INDEX: usize = 2;
const FLAG_INDEX: usize = 3;

/// Errors raised while building a rule. A rule that fails here never becomes active.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("rule '{label}' needs a 'key:value' parameter")]
    MissingParameter { label: String },

    #[error("rule '{label}' has an invalid 'key:value' parameter '{param}'")]
    InvalidFormat { label: String, param: String },

    #[error("rule '{label}' is already registered")]
    DuplicateRule { label: String },
}

/// An immutable header injection rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    label: String,
    template: HeaderField,
    replace_existing: bool,
}

impl RuleConfig {
    /// Header name this rule injects.
    pub fn key(&self) -> &str {
        &self.template.key
    }

    /// Header value this rule injects.
    pub fn value(&self) -> &str {
        &self.template.value
    }

    /// Whether an existing header with the same key is removed first.
    pub fn replace_existing(&self) -> bool {
        self.replace_existing
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The stored template field. Stores copy from it, never alias it.
    pub fn template(&self) -> &HeaderField {
        &self.template
    }

    fn policy(&self) -> &'static str {
        if self.replace_existing {
            "remove duplicate"
        } else {
            "not add if exist duplicate"
        }
    }
}

/// Parse a rule from its parameter tuple.
pub fn parse_rule<S: AsRef<str>>(params: &[S]) -> Result<RuleConfig, ConfigError> {
    let label = params
        .get(LABEL_INDEX)
        .map(|p| p.as_ref().to_string())
        .unwrap_or_default();

    let pair = match params.get(PAIR_INDEX) {
        Some(p) => p.as_ref(),
        None => return Err(ConfigError::MissingParameter { label }),
    };

    let (key, value) = pair
        .split_once(':')
        .filter(|(k, v)| !k.trim().is_empty() && !v.trim().is_empty())
        .ok_or_else(|| ConfigError::InvalidFormat {
            label: label.clone(),
            param: pair.to_string(),
        })?;

    // The flag only counts as the last of exactly four parameters.
    let replace_existing = params.len() == FLAG_INDEX + 1
        && params[FLAG_INDEX].as_ref() == REMOVE_DUPLICATE_FLAG;

    let rule = RuleConfig {
        label,
        template: HeaderField::new(key, value),
        replace_existing,
    };

    tracing::debug!(
        label = %rule.label,
        key = %rule.key(),
        value = %rule.value(),
        policy = rule.policy(),
        "Rule parsed"
    );

    Ok(rule)
}
