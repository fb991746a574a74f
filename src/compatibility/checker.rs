//! Schema compatibility checker
//!
//! Walks an older and a newer schema graph in lock-step and reports every
//! difference that matters to readers built against either version.
//!
//! The walk is guarded by the set of `(older, newer)` node pairs already
//! compared, so cyclic graphs terminate and each pair is examined at most once
//! per check. The current position is tracked as a stack of path segments that
//! is copied into every finding and restored on every exit from a comparator.

use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, Level};

use super::message::{CompatibilityMessage, Impact};
use super::options::{CompatibilityMode, CompatibilityOptions};
use super::result::CompatibilityResult;
use crate::error::Result;
use crate::schema::{
    DataSchema, EnumSchema, FixedSchema, Name, PrimitiveType, RecordSchema, SchemaGraph, SchemaId,
    SchemaRef, SchemaType, TyperefSchema, UnionSchema,
};

pub const REF_KEY: &str = "ref";
pub const ITEMS_KEY: &str = "items";
pub const VALUES_KEY: &str = "values";
pub const SYMBOLS_KEY: &str = "symbols";
pub const SIZE_KEY: &str = "size";

/// Older kinds that may be widened into each numeric kind
const PROMOTIONS: [(PrimitiveType, &[PrimitiveType]); 3] = [
    (PrimitiveType::Long, &[PrimitiveType::Int]),
    (PrimitiveType::Float, &[PrimitiveType::Int, PrimitiveType::Long]),
    (
        PrimitiveType::Double,
        &[PrimitiveType::Int, PrimitiveType::Long, PrimitiveType::Float],
    ),
];

fn promotable_from(newer: PrimitiveType) -> Option<&'static [PrimitiveType]> {
    PROMOTIONS
        .iter()
        .find(|(target, _)| *target == newer)
        .map(|(_, sources)| *sources)
}

/// Compare two schemas with the given options
pub fn check_compatibility(
    older: SchemaRef<'_>,
    newer: SchemaRef<'_>,
    options: &CompatibilityOptions,
) -> Result<CompatibilityResult> {
    CompatibilityChecker::new(*options).check(older, newer)
}

/// Compatibility checker for schema versions
#[derive(Debug, Clone, Default)]
pub struct CompatibilityChecker {
    options: CompatibilityOptions,
}

impl CompatibilityChecker {
    pub fn new(options: CompatibilityOptions) -> Self {
        Self { options }
    }

    /// Check whether evolving `older` into `newer` keeps readers working
    ///
    /// Both graphs are validated first. A malformed graph aborts the check
    /// with [`crate::CompatError::InvalidSchema`] and no findings.
    pub fn check(&self, older: SchemaRef<'_>, newer: SchemaRef<'_>) -> Result<CompatibilityResult> {
        debug!(
            older = %older.id(),
            newer = %newer.id(),
            options = %self.options,
            "checking schema compatibility"
        );

        older.graph().validate()?;
        if !std::ptr::eq(older.graph(), newer.graph()) {
            newer.graph().validate()?;
        }
        if tracing::enabled!(Level::DEBUG) {
            log_recursive_schemas("older", older.graph());
            log_recursive_schemas("newer", newer.graph());
        }

        let mut walk = Walk {
            older: older.graph(),
            newer: newer.graph(),
            options: self.options,
            path: Vec::new(),
            checked: HashSet::new(),
            messages: Vec::new(),
        };
        walk.check(older.id(), newer.id())?;

        let result = CompatibilityResult::new(walk.messages);
        debug!(
            pairs = walk.checked.len(),
            errors = result.error_count(),
            warnings = result.warning_count(),
            "compatibility check finished"
        );
        Ok(result)
    }
}

fn log_recursive_schemas(side: &str, graph: &SchemaGraph) {
    for group in graph.recursive_schemas() {
        debug!(side, names = ?group.names, "schema graph contains recursive types");
    }
}

/// State of a single check; discarded once the result is returned
struct Walk<'g> {
    older: &'g SchemaGraph,
    newer: &'g SchemaGraph,
    options: CompatibilityOptions,
    path: Vec<String>,
    checked: HashSet<(SchemaId, SchemaId)>,
    messages: Vec<CompatibilityMessage>,
}

impl<'g> Walk<'g> {
    // ========== Dispatch ==========

    fn check(&mut self, older: SchemaId, newer: SchemaId) -> Result<()> {
        if !self.checked.insert((older, newer)) {
            trace!(%older, %newer, "pair already checked");
            return Ok(());
        }
        if std::ptr::eq(self.older, self.newer) && older == newer {
            return Ok(());
        }

        let depth = self.path.len();
        let outcome = self.check_pair(older, newer);
        self.path.truncate(depth);
        outcome
    }

    fn check_pair(&mut self, mut older: SchemaId, mut newer: SchemaId) -> Result<()> {
        let (older_graph, newer_graph) = (self.older, self.newer);

        if self.options.mode == CompatibilityMode::Data {
            older = older_graph.dereference(older)?;
            let target = newer_graph.dereference(newer)?;
            while newer != target {
                let DataSchema::Typeref(typeref) = newer_graph.node(newer)? else {
                    break;
                };
                self.path.push(typeref.name.full_name());
                self.path.push(REF_KEY.to_string());
                newer = typeref.target;
            }
        }

        let older_node = older_graph.node(older)?;
        let newer_node = newer_graph.node(newer)?;
        let segment = match newer_node {
            DataSchema::Typeref(typeref) => typeref.name.full_name(),
            _ => newer_graph.union_member_key(newer)?,
        };
        self.path.push(segment);

        match (older_node, newer_node) {
            (_, DataSchema::Primitive(newer_kind)) => {
                self.check_primitive(older_node.schema_type(), *newer_kind);
                Ok(())
            }
            (DataSchema::Typeref(o), DataSchema::Typeref(n)) => self.check_typeref(older, o, newer, n),
            (DataSchema::Record(o), DataSchema::Record(n)) => self.check_record(o, n),
            (DataSchema::Array { items: o }, DataSchema::Array { items: n }) => {
                let (o, n) = (*o, *n);
                self.descend(ITEMS_KEY, |walk| walk.check(o, n))
            }
            (DataSchema::Map { values: o }, DataSchema::Map { values: n }) => {
                let (o, n) = (*o, *n);
                self.descend(VALUES_KEY, |walk| walk.check(o, n))
            }
            (DataSchema::Enum(o), DataSchema::Enum(n)) => {
                self.check_enum(o, n);
                Ok(())
            }
            (DataSchema::Fixed(o), DataSchema::Fixed(n)) => {
                self.check_fixed(o, n);
                Ok(())
            }
            (DataSchema::Union(o), DataSchema::Union(n)) => self.check_union(o, n),
            (
                _,
                DataSchema::Typeref(_)
                | DataSchema::Record(_)
                | DataSchema::Array { .. }
                | DataSchema::Map { .. }
                | DataSchema::Enum(_)
                | DataSchema::Fixed(_)
                | DataSchema::Union(_),
            ) => {
                self.type_changed(older_node.schema_type(), newer_node.schema_type());
                Ok(())
            }
        }
    }

    /// Run `f` with `segment` appended to the path; the path is restored on every exit
    fn descend<F>(&mut self, segment: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.path.push(segment.to_string());
        let outcome = f(self);
        self.path.pop();
        outcome
    }

    // ========== Per-kind rules ==========

    fn check_primitive(&mut self, older: SchemaType, newer: PrimitiveType) {
        let newer_type = newer.schema_type();
        match promotable_from(newer) {
            Some(sources) if self.options.allow_promotions => {
                if older == newer_type {
                    return;
                }
                if sources.iter().any(|source| source.schema_type() == older) {
                    self.append(
                        Impact::ValuesMayBeTruncatedOrOverflow,
                        format!("numeric type promoted from {} to {}", older, newer_type),
                    );
                } else {
                    self.type_changed(older, newer_type);
                }
            }
            _ => {
                if older != newer_type {
                    self.type_changed(older, newer_type);
                }
            }
        }
    }

    fn check_record(&mut self, older: &'g RecordSchema, newer: &'g RecordSchema) -> Result<()> {
        self.check_name(&older.name, &newer.name);

        let mut common = Vec::with_capacity(newer.fields.len());
        let mut required_added = Vec::new();
        let mut optional_added = Vec::new();
        let mut required_to_optional = Vec::new();
        let mut optional_to_required = Vec::new();
        let mut required_removed = Vec::new();
        let mut optional_removed = Vec::new();

        for newer_field in &newer.fields {
            let name = newer_field.name.as_str();
            match older.field(name) {
                None => {
                    let added = if newer_field.optional {
                        &mut optional_added
                    } else {
                        &mut required_added
                    };
                    added.push(name);
                }
                Some(older_field) => {
                    common.push((older_field.schema, newer_field));
                    if newer_field.optional != older_field.optional {
                        let flipped = if newer_field.optional {
                            &mut required_to_optional
                        } else {
                            &mut optional_to_required
                        };
                        flipped.push(name);
                    }
                }
            }
        }
        for older_field in &older.fields {
            let name = older_field.name.as_str();
            if newer.field(name).is_none() {
                let removed = if older_field.optional {
                    &mut optional_removed
                } else {
                    &mut required_removed
                };
                removed.push(name);
            }
        }

        self.append_names(Impact::BreaksNewReader, "new record added required fields", &required_added);
        self.append_names(Impact::BreaksOldReader, "new record removed required fields", &required_removed);
        self.append_names(
            Impact::BreaksNewReader,
            "new record changed optional fields to required fields",
            &optional_to_required,
        );
        self.append_names(
            Impact::BreaksOldReader,
            "new record changed required fields to optional fields",
            &required_to_optional,
        );
        self.append_names(Impact::OldReaderIgnoresData, "new record added optional fields", &optional_added);
        self.append_names(Impact::NewReaderIgnoresData, "new record removed optional fields", &optional_removed);

        for (older_schema, newer_field) in common {
            self.descend(&newer_field.name, |walk| walk.check(older_schema, newer_field.schema))?;
        }
        Ok(())
    }

    /// Union members are matched by member key, never by position
    fn check_union(&mut self, older: &'g UnionSchema, newer: &'g UnionSchema) -> Result<()> {
        let (older_graph, newer_graph) = (self.older, self.newer);

        let older_members = member_keys(older_graph, older)?;
        let newer_members = member_keys(newer_graph, newer)?;
        let older_by_key: HashMap<&str, SchemaId> =
            older_members.iter().map(|(key, id)| (key.as_str(), *id)).collect();
        let newer_keys: HashSet<&str> = newer_members.iter().map(|(key, _)| key.as_str()).collect();

        let mut common = Vec::with_capacity(newer_members.len());
        let mut added = Vec::new();
        for (key, newer_id) in &newer_members {
            match older_by_key.get(key.as_str()) {
                Some(older_id) => common.push((*older_id, *newer_id)),
                None => added.push(key.as_str()),
            }
        }
        let removed: Vec<&str> = older_members
            .iter()
            .map(|(key, _)| key.as_str())
            .filter(|key| !newer_keys.contains(key))
            .collect();

        self.append_names(Impact::BreaksOldReader, "new union added members", &added);
        self.append_names(Impact::BreaksNewReader, "new union removed members", &removed);

        for (older_id, newer_id) in common {
            self.check(older_id, newer_id)?;
        }
        Ok(())
    }

    fn check_enum(&mut self, older: &EnumSchema, newer: &EnumSchema) {
        self.check_name(&older.name, &newer.name);

        let older_symbols: HashSet<&str> = older.symbols.iter().map(String::as_str).collect();
        let newer_symbols: HashSet<&str> = newer.symbols.iter().map(String::as_str).collect();
        let added: Vec<&str> = newer
            .symbols
            .iter()
            .map(String::as_str)
            .filter(|s| !older_symbols.contains(s))
            .collect();
        let removed: Vec<&str> = older
            .symbols
            .iter()
            .map(String::as_str)
            .filter(|s| !newer_symbols.contains(s))
            .collect();

        self.path.push(SYMBOLS_KEY.to_string());
        self.append_names(Impact::BreaksOldReader, "new enum added symbols", &added);
        self.append_names(Impact::BreaksNewReader, "new enum removed symbols", &removed);
        self.path.pop();
    }

    fn check_fixed(&mut self, older: &FixedSchema, newer: &FixedSchema) {
        self.check_name(&older.name, &newer.name);

        self.path.push(SIZE_KEY.to_string());
        if older.size != newer.size {
            self.append(
                Impact::BreaksBothReaders,
                format!("fixed size changed from {} to {}", older.size, newer.size),
            );
        }
        self.path.pop();
    }

    fn check_typeref(
        &mut self,
        older_id: SchemaId,
        older: &TyperefSchema,
        newer_id: SchemaId,
        newer: &TyperefSchema,
    ) -> Result<()> {
        self.check_name(&older.name, &newer.name);

        let older_target = self.older.dereference(older_id)?;
        let newer_target = self.newer.dereference(newer_id)?;
        self.descend(REF_KEY, |walk| walk.check(older_target, newer_target))
    }

    fn check_name(&mut self, older: &Name, newer: &Name) {
        if !self.options.check_names {
            return;
        }
        let (older, newer) = (older.full_name(), newer.full_name());
        if older != newer {
            self.append(
                Impact::BreaksBothReaders,
                format!("name changed from {} to {}", older, newer),
            );
        }
    }

    // ========== Findings ==========

    fn type_changed(&mut self, older: SchemaType, newer: SchemaType) {
        self.append(
            Impact::BreaksBothReaders,
            format!("schema type changed from {} to {}", older, newer),
        );
    }

    fn append_names(&mut self, impact: Impact, what: &str, names: &[&str]) {
        if !names.is_empty() {
            self.append(impact, format!("{} {}", what, names.join(", ")));
        }
    }

    fn append(&mut self, impact: Impact, message: String) {
        trace!(path = ?self.path, %impact, %message, "compatibility finding");
        self.messages
            .push(CompatibilityMessage::new(self.path.clone(), impact, message));
    }
}

fn member_keys(graph: &SchemaGraph, union: &UnionSchema) -> Result<Vec<(String, SchemaId)>> {
    union
        .members
        .iter()
        .map(|member| Ok((graph.union_member_key(*member)?, *member)))
        .collect()
}
