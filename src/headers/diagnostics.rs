//! Diagnostic reporting for request-time failures.

use std::sync::Mutex;

/// Name reported alongside every diagnostic.
pub const PLUGIN_NAME: &str = "add_header";

/// Version reported at startup.
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Receives failure reports from the injector.
pub trait DiagnosticSink: Send + Sync + std::fmt::Debug {
    fn report(&self, message: &str);
}

/// Forwards reports to the `tracing` subscriber as error events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, message: &str) {
        tracing::error!(plugin = PLUGIN_NAME, "{}", message);
    }
}

/// Keeps reports in memory. Useful for embedding and for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .expect("diagnostic sink mutex poisoned")
            .clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, message: &str) {
        self.messages
            .lock()
            .expect("diagnostic sink mutex poisoned")
            .push(message.to_string());
    }
}
