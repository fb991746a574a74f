//! Schema Compatibility
//!
//! Decides whether evolving a data schema from an older to a newer version
//! keeps readers and writers built against either version working.
//!
//! ## Features
//!
//! - **Cycle-Safe Walk**: Self-referential and mutually recursive schemas are compared once per node pair
//! - **Classified Findings**: Every difference says whether it breaks old readers, new readers, or both
//! - **Exact Locations**: Each finding carries the path from the compared roots
//! - **Two Modes**: Literal schema comparison, or data-shape comparison that sees through typerefs
//!
//! ## Example
//!
//! ```
//! use schema_compat::{check_compatibility, CompatibilityOptions, Impact};
//! use schema_compat::schema::{Field, PrimitiveType, SchemaGraph};
//!
//! let mut v1 = SchemaGraph::new();
//! let name = v1.primitive(PrimitiveType::String);
//! let user_v1 = v1.record("com.example.User", vec![Field::required("name", name)]);
//!
//! let mut v2 = SchemaGraph::new();
//! let name = v2.primitive(PrimitiveType::String);
//! let email = v2.primitive(PrimitiveType::String);
//! let user_v2 = v2.record(
//!     "com.example.User",
//!     vec![Field::required("name", name), Field::required("email", email)],
//! );
//!
//! let result = check_compatibility(v1.schema(user_v1), v2.schema(user_v2), &CompatibilityOptions::default())?;
//! assert!(result.is_error());
//! assert_eq!(result.messages()[0].impact, Impact::BreaksNewReader);
//! assert_eq!(result.messages()[0].message, "new record added required fields email");
//! # Ok::<(), schema_compat::CompatError>(())
//! ```

pub mod compatibility;
pub mod config;
pub mod error;
pub mod schema;

pub use compatibility::{
    check_compatibility, CompatibilityChecker, CompatibilityMessage, CompatibilityMode,
    CompatibilityOptions, CompatibilityResult, Impact, Severity,
};
pub use config::{CompatConfig, OutputFormat, ReportConfig};
pub use error::{CompatError, Result};
pub use schema::{SchemaGraph, SchemaId, SchemaRef};
