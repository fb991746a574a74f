//! Options controlling how strictly two schemas are compared

use serde::{Deserialize, Serialize};
use std::fmt;

/// What is being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityMode {
    /// Literal comparison; typeref boundaries are significant
    #[default]
    Schema,
    /// Data-shape comparison; typerefs are transparent
    Data,
}

impl fmt::Display for CompatibilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => write!(f, "schema"),
            Self::Data => write!(f, "data"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityOptions {
    #[serde(default)]
    pub mode: CompatibilityMode,

    /// Report renamed enums, fixeds, records and typerefs
    #[serde(default = "default_true")]
    pub check_names: bool,

    /// Accept numeric widening (int -> long -> float -> double) with a warning
    #[serde(default)]
    pub allow_promotions: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CompatibilityOptions {
    fn default() -> Self {
        Self {
            mode: CompatibilityMode::Schema,
            check_names: true,
            allow_promotions: false,
        }
    }
}

impl CompatibilityOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for data-shape mode
    pub fn data() -> Self {
        Self::default().with_mode(CompatibilityMode::Data)
    }

    pub fn with_mode(mut self, mode: CompatibilityMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_check_names(mut self, check_names: bool) -> Self {
        self.check_names = check_names;
        self
    }

    pub fn with_allow_promotions(mut self, allow_promotions: bool) -> Self {
        self.allow_promotions = allow_promotions;
        self
    }
}

impl fmt::Display for CompatibilityOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mode={}, check_names={}, allow_promotions={}",
            self.mode, self.check_names, self.allow_promotions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompatibilityOptions::default();
        assert_eq!(options.mode, CompatibilityMode::Schema);
        assert!(options.check_names);
        assert!(!options.allow_promotions);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: CompatibilityOptions =
            serde_json::from_str(r#"{ "mode": "data", "allow_promotions": true }"#).unwrap();
        assert_eq!(options, CompatibilityOptions::data().with_allow_promotions(true));
    }
}
