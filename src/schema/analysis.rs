//! Schema Graph Analysis
//!
//! Provider-contract validation and strongly connected component (SCC)
//! detection over the schema graph.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::{DataSchema, SchemaGraph, SchemaId};
use crate::error::{CompatError, Result};

// =============================================================================
// Edge Kind
// =============================================================================

/// Structural role of a parent -> child reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Record field type
    Field(String),
    /// Array items
    Items,
    /// Map values
    Values,
    /// Union member
    Member,
    /// Typeref target
    Ref,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "field '{}'", name),
            Self::Items => write!(f, "array items"),
            Self::Values => write!(f, "map values"),
            Self::Member => write!(f, "union member"),
            Self::Ref => write!(f, "typeref target"),
        }
    }
}

// =============================================================================
// Recursive Groups
// =============================================================================

/// A set of schemas that reach each other (self or mutual recursion)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursiveGroup {
    /// All schemas in the cycle, ordered by id
    pub members: Vec<SchemaId>,
    /// Full names of the named members, ordered by id
    pub names: Vec<String>,
}

impl RecursiveGroup {
    pub fn is_self_referential(&self) -> bool {
        self.members.len() == 1
    }
}

impl SchemaGraph {
    /// Project the arena into a petgraph graph; `NodeIndex(i)` is `SchemaId(i)`
    ///
    /// References to missing nodes are left out.
    pub fn dependency_graph(&self) -> DiGraph<SchemaId, EdgeKind> {
        let mut graph = DiGraph::with_capacity(self.len(), self.len() * 2);
        for id in self.ids() {
            graph.add_node(id);
        }
        for id in self.ids() {
            let Ok(children) = self.children(id) else {
                continue;
            };
            for (kind, child) in children {
                if self.get(child).is_some() {
                    graph.add_edge(NodeIndex::new(id.index()), NodeIndex::new(child.index()), kind);
                }
            }
        }
        graph
    }

    /// Groups of schemas taking part in a reference cycle
    pub fn recursive_schemas(&self) -> Vec<RecursiveGroup> {
        let graph = self.dependency_graph();
        let mut groups: Vec<RecursiveGroup> = kosaraju_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut members: Vec<SchemaId> = scc.iter().map(|idx| graph[*idx]).collect();
                members.sort();
                let names = members
                    .iter()
                    .filter_map(|id| self.get(*id).and_then(DataSchema::name))
                    .map(|name| name.full_name())
                    .collect();
                RecursiveGroup { members, names }
            })
            .collect();
        groups.sort_by_key(|g| g.members[0]);
        groups
    }

    /// Check the structural invariants the checker relies on
    ///
    /// Reports the first violation found, scanning nodes in id order.
    pub fn validate(&self) -> Result<()> {
        for id in self.ids() {
            if !self.is_defined(id) {
                return Err(CompatError::invalid(id, "record declared but never defined"));
            }

            for (kind, child) in self.children(id)? {
                if self.get(child).is_none() {
                    return Err(CompatError::invalid(
                        id,
                        format!("{} references missing schema {}", kind, child),
                    ));
                }
            }

            match self.node(id)? {
                DataSchema::Record(record) => {
                    let mut seen = HashSet::new();
                    if let Some(dup) = record.fields.iter().find(|f| !seen.insert(f.name.as_str())) {
                        return Err(CompatError::invalid(
                            id,
                            format!("record {} has duplicate field '{}'", record.name, dup.name),
                        ));
                    }
                }
                DataSchema::Enum(enumeration) => {
                    let mut seen = HashSet::new();
                    if let Some(dup) = enumeration.symbols.iter().find(|s| !seen.insert(s.as_str())) {
                        return Err(CompatError::invalid(
                            id,
                            format!("enum {} has duplicate symbol '{}'", enumeration.name, dup),
                        ));
                    }
                }
                DataSchema::Union(union) => {
                    let mut seen = HashSet::new();
                    for member in &union.members {
                        let key = self.union_member_key(*member)?;
                        if !seen.insert(key.clone()) {
                            return Err(CompatError::invalid(
                                id,
                                format!("union has duplicate member '{}'", key),
                            ));
                        }
                    }
                }
                DataSchema::Typeref(_) => {
                    self.dereference(id)?;
                }
                DataSchema::Primitive(_)
                | DataSchema::Fixed(_)
                | DataSchema::Array { .. }
                | DataSchema::Map { .. } => {}
            }
        }
        Ok(())
    }
}
