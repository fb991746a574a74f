//! Compatibility findings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Finding severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Who is affected by a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Impact {
    /// Neither old nor new readers can read the other side's data
    BreaksBothReaders,
    /// Readers built against the new schema cannot read old data
    BreaksNewReader,
    /// Readers built against the old schema cannot read new data
    BreaksOldReader,
    /// A numeric promotion; narrower readers may see lossy values
    ValuesMayBeTruncatedOrOverflow,
    /// Old readers silently skip data the new schema writes
    OldReaderIgnoresData,
    /// New readers silently skip data the old schema wrote
    NewReaderIgnoresData,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BreaksBothReaders => "BREAKS_BOTH_READERS",
            Self::BreaksNewReader => "BREAKS_NEW_READER",
            Self::BreaksOldReader => "BREAKS_OLD_READER",
            Self::ValuesMayBeTruncatedOrOverflow => "VALUES_MAY_BE_TRUNCATED_OR_OVERFLOW",
            Self::OldReaderIgnoresData => "OLD_READER_IGNORES_DATA",
            Self::NewReaderIgnoresData => "NEW_READER_IGNORES_DATA",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::BreaksBothReaders | Self::BreaksNewReader | Self::BreaksOldReader => {
                Severity::Error
            }
            Self::ValuesMayBeTruncatedOrOverflow
            | Self::OldReaderIgnoresData
            | Self::NewReaderIgnoresData => Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding: where, who is affected, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityMessage {
    /// Path segments from the compared roots to the finding
    pub path: Vec<String>,
    pub impact: Impact,
    pub message: String,
}

impl CompatibilityMessage {
    pub fn new(path: Vec<String>, impact: Impact, message: impl Into<String>) -> Self {
        Self {
            path,
            impact,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.impact.is_error()
    }

    /// Path rendered as `/seg1/seg2`
    pub fn path_string(&self) -> String {
        self.path.iter().map(|s| format!("/{}", s)).collect()
    }
}

impl fmt::Display for CompatibilityMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} :: {} :: {} :: {}",
            self.impact.severity(),
            self.impact,
            self.path_string(),
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_severity() {
        assert!(Impact::BreaksBothReaders.is_error());
        assert!(Impact::BreaksNewReader.is_error());
        assert!(Impact::BreaksOldReader.is_error());
        assert!(!Impact::ValuesMayBeTruncatedOrOverflow.is_error());
        assert!(!Impact::OldReaderIgnoresData.is_error());
        assert!(!Impact::NewReaderIgnoresData.is_error());
    }

    #[test]
    fn test_impact_wire_name() {
        let json = serde_json::to_string(&Impact::ValuesMayBeTruncatedOrOverflow).unwrap();
        assert_eq!(json, "\"VALUES_MAY_BE_TRUNCATED_OR_OVERFLOW\"");
        assert_eq!(Impact::BreaksBothReaders.to_string(), "BREAKS_BOTH_READERS");
    }

    #[test]
    fn test_message_display() {
        let message = CompatibilityMessage::new(
            vec!["com.example.User".into(), "age".into(), "long".into()],
            Impact::ValuesMayBeTruncatedOrOverflow,
            "numeric type promoted from int to long",
        );
        assert_eq!(
            message.to_string(),
            "warning :: VALUES_MAY_BE_TRUNCATED_OR_OVERFLOW :: /com.example.User/age/long :: numeric type promoted from int to long"
        );
    }
}
