// SPDX-License-Identifier: MIT OR Apache-2.0
//! Non-fatal warnings raised during one export pass.

/// Warning collector for one export pass.
///
/// Every warning is also logged through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<String>,
}

impl Diagnostics {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.warnings.push(message);
    }

    /// Recorded warnings, oldest first
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Consume the collector
    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}
