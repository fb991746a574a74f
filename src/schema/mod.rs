//! Schema Graph
//!
//! Arena of immutable schema nodes addressed by [`SchemaId`]. Nodes refer to
//! their children by id, so a record may reach itself through an array, map,
//! union or typeref. Node identity is the id, never structural equality: two
//! records with the same shape are still two nodes.
//!
//! Records can be declared before they are defined, which is how
//! self-referential and mutually recursive types are built:
//!
//! ```
//! use schema_compat::schema::{Field, SchemaGraph};
//!
//! let mut graph = SchemaGraph::new();
//! let node = graph.declare_record("com.example.Node");
//! let children = graph.array(node);
//! graph.define_record(node, vec![Field::required("children", children)]).unwrap();
//! assert!(graph.validate().is_ok());
//! ```

pub mod analysis;
mod types;

pub use analysis::{EdgeKind, RecursiveGroup};
pub use types::{
    DataSchema, EnumSchema, Field, FixedSchema, Name, PrimitiveType, RecordSchema, SchemaId,
    SchemaType, TyperefSchema, UnionSchema,
};

use std::collections::{HashMap, HashSet};

use crate::error::{CompatError, Result};

/// The schema graph
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    /// Node storage; a node's id is its position
    nodes: Vec<DataSchema>,

    /// One shared node per primitive kind
    primitives: HashMap<PrimitiveType, SchemaId>,

    /// Records declared but not yet given their fields
    pending: HashSet<SchemaId>,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Construction ==========

    fn push(&mut self, node: DataSchema) -> SchemaId {
        let id = SchemaId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Get (or create) the node for a primitive kind
    pub fn primitive(&mut self, kind: PrimitiveType) -> SchemaId {
        if let Some(id) = self.primitives.get(&kind) {
            return *id;
        }
        let id = self.push(DataSchema::Primitive(kind));
        self.primitives.insert(kind, id);
        id
    }

    pub fn array(&mut self, items: SchemaId) -> SchemaId {
        self.push(DataSchema::Array { items })
    }

    pub fn map(&mut self, values: SchemaId) -> SchemaId {
        self.push(DataSchema::Map { values })
    }

    pub fn enumeration<S: Into<String>>(
        &mut self,
        name: impl Into<Name>,
        symbols: impl IntoIterator<Item = S>,
    ) -> SchemaId {
        self.push(DataSchema::Enum(EnumSchema {
            name: name.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
        }))
    }

    pub fn fixed(&mut self, name: impl Into<Name>, size: usize) -> SchemaId {
        self.push(DataSchema::Fixed(FixedSchema {
            name: name.into(),
            size,
        }))
    }

    pub fn union(&mut self, members: impl IntoIterator<Item = SchemaId>) -> SchemaId {
        self.push(DataSchema::Union(UnionSchema {
            members: members.into_iter().collect(),
        }))
    }

    pub fn typeref(&mut self, name: impl Into<Name>, target: SchemaId) -> SchemaId {
        self.push(DataSchema::Typeref(TyperefSchema {
            name: name.into(),
            target,
        }))
    }

    /// Add a fully defined record
    pub fn record(&mut self, name: impl Into<Name>, fields: Vec<Field>) -> SchemaId {
        self.push(DataSchema::Record(RecordSchema {
            name: name.into(),
            fields,
        }))
    }

    /// Declare a record whose fields are supplied later by [`Self::define_record`]
    pub fn declare_record(&mut self, name: impl Into<Name>) -> SchemaId {
        let id = self.record(name, Vec::new());
        self.pending.insert(id);
        id
    }

    /// Supply the fields of a declared record
    pub fn define_record(&mut self, id: SchemaId, fields: Vec<Field>) -> Result<()> {
        if !self.pending.remove(&id) {
            return Err(CompatError::invalid(id, "not a declared, undefined record"));
        }
        match self.nodes.get_mut(id.0) {
            Some(DataSchema::Record(record)) => {
                record.fields = fields;
                Ok(())
            }
            _ => Err(CompatError::invalid(id, "not a record")),
        }
    }

    // ========== Access ==========

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: SchemaId) -> Option<&DataSchema> {
        self.nodes.get(id.0)
    }

    /// Like [`Self::get`], but a missing node is an invariant violation
    pub fn node(&self, id: SchemaId) -> Result<&DataSchema> {
        self.get(id)
            .ok_or_else(|| CompatError::invalid(id, "referenced schema is not in the graph"))
    }

    /// Handle for passing a node to the checker
    pub fn schema(&self, id: SchemaId) -> SchemaRef<'_> {
        SchemaRef { graph: self, id }
    }

    pub fn ids(&self) -> impl Iterator<Item = SchemaId> + '_ {
        (0..self.nodes.len()).map(SchemaId)
    }

    pub fn is_defined(&self, id: SchemaId) -> bool {
        id.0 < self.nodes.len() && !self.pending.contains(&id)
    }

    /// Follow typeref indirections until a non-typeref node is reached
    pub fn dereference(&self, id: SchemaId) -> Result<SchemaId> {
        let mut current = id;
        let mut seen = HashSet::new();
        while let DataSchema::Typeref(typeref) = self.node(current)? {
            if !seen.insert(current) {
                return Err(CompatError::invalid(
                    id,
                    format!("typeref {} never resolves to a concrete schema", typeref.name),
                ));
            }
            current = typeref.target;
        }
        Ok(current)
    }

    /// Key identifying a node as a union member
    ///
    /// Named kinds use their full name, typerefs the key of the schema they
    /// resolve to, everything else its lower-case kind name.
    pub fn union_member_key(&self, id: SchemaId) -> Result<String> {
        let node = self.node(self.dereference(id)?)?;
        Ok(match node.name() {
            Some(name) => name.full_name(),
            None => node.schema_type().as_str().to_string(),
        })
    }

    /// Direct children of a node, labelled by the structural role of the edge
    pub fn children(&self, id: SchemaId) -> Result<Vec<(EdgeKind, SchemaId)>> {
        Ok(match self.node(id)? {
            DataSchema::Primitive(_) | DataSchema::Enum(_) | DataSchema::Fixed(_) => Vec::new(),
            DataSchema::Array { items } => vec![(EdgeKind::Items, *items)],
            DataSchema::Map { values } => vec![(EdgeKind::Values, *values)],
            DataSchema::Record(record) => record
                .fields
                .iter()
                .map(|f| (EdgeKind::Field(f.name.clone()), f.schema))
                .collect(),
            DataSchema::Union(union) => union
                .members
                .iter()
                .map(|m| (EdgeKind::Member, *m))
                .collect(),
            DataSchema::Typeref(typeref) => vec![(EdgeKind::Ref, typeref.target)],
        })
    }
}

/// A node together with the graph that owns it
#[derive(Debug, Clone, Copy)]
pub struct SchemaRef<'g> {
    graph: &'g SchemaGraph,
    id: SchemaId,
}

impl<'g> SchemaRef<'g> {
    pub fn graph(&self) -> &'g SchemaGraph {
        self.graph
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// Identity comparison: same graph and same node
    pub fn is_same_node(&self, other: &SchemaRef<'_>) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_are_shared() {
        let mut graph = SchemaGraph::new();
        let a = graph.primitive(PrimitiveType::Int);
        let b = graph.primitive(PrimitiveType::Int);
        let c = graph.primitive(PrimitiveType::Long);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_dereference_chain() {
        let mut graph = SchemaGraph::new();
        let int = graph.primitive(PrimitiveType::Int);
        let inner = graph.typeref("com.example.Inner", int);
        let outer = graph.typeref("com.example.Outer", inner);
        assert_eq!(graph.dereference(outer).unwrap(), int);
        assert_eq!(graph.dereference(int).unwrap(), int);
    }

    #[test]
    fn test_dereference_dangling_target() {
        let mut graph = SchemaGraph::new();
        let alias = graph.typeref("Broken", SchemaId(42));
        assert!(matches!(
            graph.dereference(alias),
            Err(CompatError::InvalidSchema { id, .. }) if id == SchemaId(42)
        ));
    }

    #[test]
    fn test_union_member_keys() {
        let mut graph = SchemaGraph::new();
        let string = graph.primitive(PrimitiveType::String);
        let items = graph.array(string);
        let record = graph.record("com.example.User", Vec::new());
        let alias = graph.typeref("com.example.UserRef", record);
        let color = graph.enumeration("Color", ["RED"]);

        assert_eq!(graph.union_member_key(string).unwrap(), "string");
        assert_eq!(graph.union_member_key(items).unwrap(), "array");
        assert_eq!(graph.union_member_key(record).unwrap(), "com.example.User");
        assert_eq!(graph.union_member_key(alias).unwrap(), "com.example.User");
        assert_eq!(graph.union_member_key(color).unwrap(), "Color");
    }

    #[test]
    fn test_define_record_twice_fails() {
        let mut graph = SchemaGraph::new();
        let node = graph.declare_record("Node");
        assert!(!graph.is_defined(node));
        graph.define_record(node, Vec::new()).unwrap();
        assert!(graph.is_defined(node));
        assert!(graph.define_record(node, Vec::new()).is_err());
    }

    #[test]
    fn test_schema_ref_identity() {
        let mut first = SchemaGraph::new();
        let mut second = SchemaGraph::new();
        let a = first.primitive(PrimitiveType::Int);
        let b = second.primitive(PrimitiveType::Int);
        assert_eq!(a, b);
        assert!(first.schema(a).is_same_node(&first.schema(a)));
        assert!(!first.schema(a).is_same_node(&second.schema(b)));
    }
}
