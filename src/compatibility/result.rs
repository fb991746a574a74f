//! Aggregate outcome of a compatibility check

use serde::{Deserialize, Serialize};
use std::fmt;

use super::message::{CompatibilityMessage, Severity};
use crate::config::OutputFormat;
use crate::error::Result;

/// Every finding of one check, in the order they were emitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    messages: Vec<CompatibilityMessage>,
}

impl CompatibilityResult {
    pub fn new(messages: Vec<CompatibilityMessage>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[CompatibilityMessage] {
        &self.messages
    }

    /// True iff at least one finding breaks a reader
    pub fn is_error(&self) -> bool {
        self.messages.iter().any(CompatibilityMessage::is_error)
    }

    pub fn is_compatible(&self) -> bool {
        !self.is_error()
    }

    pub fn errors(&self) -> impl Iterator<Item = &CompatibilityMessage> {
        self.messages.iter().filter(|m| m.impact.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CompatibilityMessage> {
        self.messages.iter().filter(|m| m.impact.severity() == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Serialize the findings as a JSON report
    pub fn to_json(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Pretty => serde_json::to_string_pretty(self)?,
            OutputFormat::Compact => serde_json::to_string(self)?,
        })
    }

    /// Format all findings followed by a summary line
    pub fn format_all(&self) -> String {
        let mut output = String::new();

        for message in &self.messages {
            output.push_str(&format!("{}\n", message));
        }

        if self.is_error() {
            output.push_str(&format!(
                "\n{} error(s), {} warning(s)\n",
                self.error_count(),
                self.warning_count()
            ));
        } else if !self.is_empty() {
            output.push_str(&format!("\n{} warning(s)\n", self.warning_count()));
        }

        output
    }
}

impl fmt::Display for CompatibilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_all())
    }
}

impl IntoIterator for CompatibilityResult {
    type Item = CompatibilityMessage;
    type IntoIter = std::vec::IntoIter<CompatibilityMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a CompatibilityResult {
    type Item = &'a CompatibilityMessage;
    type IntoIter = std::slice::Iter<'a, CompatibilityMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
