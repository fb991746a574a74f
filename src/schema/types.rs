//! Schema node types
//!
//! The closed set of schema kinds the compatibility checker understands.
//! Child schemas are referenced by [`SchemaId`] into the owning
//! [`SchemaGraph`](super::SchemaGraph), which lets graphs be cyclic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a node inside a [`SchemaGraph`](super::SchemaGraph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(pub(crate) usize);

impl SchemaId {
    /// Position of the node in the arena
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Primitive schema kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    String,
    Bytes,
    Null,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Boolean,
        PrimitiveType::String,
        PrimitiveType::Bytes,
        PrimitiveType::Null,
    ];

    pub fn schema_type(&self) -> SchemaType {
        match self {
            Self::Int => SchemaType::Int,
            Self::Long => SchemaType::Long,
            Self::Float => SchemaType::Float,
            Self::Double => SchemaType::Double,
            Self::Boolean => SchemaType::Boolean,
            Self::String => SchemaType::String,
            Self::Bytes => SchemaType::Bytes,
            Self::Null => SchemaType::Null,
        }
    }
}

/// Kind tag of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    String,
    Bytes,
    Null,
    Enum,
    Fixed,
    Array,
    Map,
    Record,
    Union,
    Typeref,
}

impl SchemaType {
    /// Lower-case name used in messages and member keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Null => "null",
            Self::Enum => "enum",
            Self::Fixed => "fixed",
            Self::Array => "array",
            Self::Map => "map",
            Self::Record => "record",
            Self::Union => "union",
            Self::Typeref => "typeref",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully-qualifiable name of a named type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    /// Unqualified name (e.g., "User")
    pub name: String,
    /// Optional namespace (e.g., "com.example")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    /// Parse a dotted full name: everything before the last `.` is the namespace
    pub fn parse(full_name: &str) -> Self {
        match full_name.rsplit_once('.') {
            Some((namespace, name)) if !namespace.is_empty() => Self {
                name: name.to_string(),
                namespace: Some(namespace.to_string()),
            },
            _ => Self::new(full_name),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}.{}", ns, self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl From<&str> for Name {
    fn from(full_name: &str) -> Self {
        Self::parse(full_name)
    }
}

impl From<String> for Name {
    fn from(full_name: String) -> Self {
        Self::parse(&full_name)
    }
}

/// A record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub schema: SchemaId,
    pub optional: bool,
}

impl Field {
    pub fn required(name: impl Into<String>, schema: SchemaId) -> Self {
        Self {
            name: name.into(),
            schema,
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>, schema: SchemaId) -> Self {
        Self {
            name: name.into(),
            schema,
            optional: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    pub name: Name,
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSchema {
    pub name: Name,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    pub name: Name,
    pub fields: Vec<Field>,
}

impl RecordSchema {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionSchema {
    /// Members in declaration order
    pub members: Vec<SchemaId>,
}

/// A named alias for another schema; the target may itself be an alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TyperefSchema {
    pub name: Name,
    pub target: SchemaId,
}

/// A node of the schema graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSchema {
    Primitive(PrimitiveType),
    Enum(EnumSchema),
    Fixed(FixedSchema),
    Array { items: SchemaId },
    Map { values: SchemaId },
    Record(RecordSchema),
    Union(UnionSchema),
    Typeref(TyperefSchema),
}

impl DataSchema {
    pub fn schema_type(&self) -> SchemaType {
        match self {
            Self::Primitive(p) => p.schema_type(),
            Self::Enum(_) => SchemaType::Enum,
            Self::Fixed(_) => SchemaType::Fixed,
            Self::Array { .. } => SchemaType::Array,
            Self::Map { .. } => SchemaType::Map,
            Self::Record(_) => SchemaType::Record,
            Self::Union(_) => SchemaType::Union,
            Self::Typeref(_) => SchemaType::Typeref,
        }
    }

    /// Declared name for named kinds (enum, fixed, record, typeref)
    pub fn name(&self) -> Option<&Name> {
        match self {
            Self::Enum(e) => Some(&e.name),
            Self::Fixed(f) => Some(&f.name),
            Self::Record(r) => Some(&r.name),
            Self::Typeref(t) => Some(&t.name),
            Self::Primitive(_) | Self::Array { .. } | Self::Map { .. } | Self::Union(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(Name::new("User").full_name(), "User");
        assert_eq!(Name::new("User").with_namespace("com.example").full_name(), "com.example.User");
    }

    #[test]
    fn test_parse_full_name() {
        let name = Name::parse("com.example.User");
        assert_eq!(name.name, "User");
        assert_eq!(name.namespace.as_deref(), Some("com.example"));
        assert_eq!(Name::parse("User").namespace, None);
        assert_eq!(Name::parse(".User").full_name(), ".User");
    }

    #[test]
    fn test_schema_type_names() {
        assert_eq!(SchemaType::Typeref.to_string(), "typeref");
        assert_eq!(PrimitiveType::Double.schema_type().to_string(), "double");
    }
}
