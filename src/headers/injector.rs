//! Per-request header injection.
//!
//! # Decision Table
//! ```text
//! existing field?   replace_existing   action
//! ---------------   ----------------   -----------------------------------
//! no                any                append (key, value)
//! yes               false              leave the request untouched
//! yes               true               remove first match, then append
//! ```
//!
//! # Design Decisions
//! - Failures never fail the request: they go to the diagnostic sink and the
//!   rule is treated as not having fired
//! - A removal that already happened is not rolled back when the append fails
//! - Only the first duplicate is removed; later ones stay in place

use std::sync::Arc;

use thiserror::Error;

use crate::headers::diagnostics::{DiagnosticSink, TracingSink, PLUGIN_NAME};
use crate::headers::rule::RuleConfig;
use crate::headers::store::{FieldError, HeaderStore};

/// Errors raised while mutating a request's headers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("[{plugin}] rule '{label}': {operation} of field '{key}' failed: {source}")]
    FieldOperationFailed {
        plugin: &'static str,
        label: String,
        key: String,
        operation: &'static str,
        #[source]
        source: FieldError,
    },
}

/// What a single `apply` call did to the header set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injection {
    /// No field with the rule's key existed; one was appended.
    Appended,
    /// The first existing field was removed and a new one appended.
    Replaced,
    /// A field already existed and the rule does not replace.
    Skipped,
    /// A store primitive failed; see the diagnostic sink.
    Abandoned,
}

/// Applies rules to request header sets.
#[derive(Debug, Clone)]
pub struct HeaderInjector {
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for HeaderInjector {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl HeaderInjector {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    /// Apply `rule` to `headers` in place.
    pub fn apply<H: HeaderStore + ?Sized>(&self, rule: &RuleConfig, headers: &mut H) -> Injection {
        match self.try_apply(rule, headers) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.sink.report(&e.to_string());
                Injection::Abandoned
            }
        }
    }

    fn try_apply<H: HeaderStore + ?Sized>(
        &self,
        rule: &RuleConfig,
        headers: &mut H,
    ) -> Result<Injection, RuntimeError> {
        let mut outcome = Injection::Appended;

        if let Some(existing) = headers.find_field(rule.key()) {
            tracing::debug!(
                plugin = PLUGIN_NAME,
                key = %rule.key(),
                "already exist header '{}', we will {}",
                rule.key(),
                if rule.replace_existing() { "remove it and add new one" } else { "not add" }
            );
            if !rule.replace_existing() {
                return Ok(Injection::Skipped);
            }
            headers.remove_field(existing);
            outcome = Injection::Replaced;
        }

        let template = rule.template();
        let field = headers
            .create_field(&template.key, &template.value)
            .map_err(|e| field_failure(rule, "create", e))?;
        headers
            .append_field(field)
            .map_err(|e| field_failure(rule, "append", e))?;

        tracing::debug!(
            plugin = PLUGIN_NAME,
            label = %rule.label(),
            "append success, {}:{}",
            rule.key(),
            rule.value()
        );
        Ok(outcome)
    }
}

fn field_failure(rule: &RuleConfig, operation: &'static str, source: FieldError) -> RuntimeError {
    RuntimeError::FieldOperationFailed {
        plugin: PLUGIN_NAME,
        label: rule.label().to_string(),
        key: rule.key().to_string(),
        operation,
        source,
    }
}
