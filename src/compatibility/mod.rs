//! Schema compatibility checking
//!
//! Judges whether an older and a newer version of a schema can exchange data,
//! classifying each difference by which readers it affects.

mod checker;
mod message;
mod options;
mod result;

pub use checker::{
    check_compatibility, CompatibilityChecker, ITEMS_KEY, REF_KEY, SIZE_KEY, SYMBOLS_KEY,
    VALUES_KEY,
};
pub use message::{CompatibilityMessage, Impact, Severity};
pub use options::{CompatibilityMode, CompatibilityOptions};
pub use result::CompatibilityResult;
