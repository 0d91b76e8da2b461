use std::collections::{BTreeMap, HashSet};

use rand::RngCore;
use rand::seq::IndexedRandom;
use tracing::debug;

use datasynth_core::{GeneratedValue, RecordSet};

use crate::model::ReferenceUsage;

/// Source of previously generated key values.
///
/// `None` means "unavailable": the table is missing, empty, or has no such
/// column. Implementations must read current state on every call.
pub trait ReferenceResolver {
    fn resolve(&self, table: &str, key_column: &str) -> Option<Vec<GeneratedValue>>;
}

/// A dependent field that can sample keys from another entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceRole {
    /// Role name used in requests, e.g. `customers`.
    pub role: &'static str,
    /// Field of the generated row the sampled key is written to.
    pub field: &'static str,
    /// Column of the referenced table holding the keys.
    pub key_column: &'static str,
}

impl ReferenceRole {
    pub const fn new(role: &'static str, field: &'static str, key_column: &'static str) -> Self {
        Self {
            role,
            field,
            key_column,
        }
    }
}

/// Record sets held in memory, keyed by table name.
#[derive(Debug, Default, Clone)]
pub struct InMemoryReferences {
    tables: BTreeMap<String, RecordSet>,
}

impl InMemoryReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous contents of `table`.
    pub fn ingest_table(&mut self, table: impl Into<String>, records: RecordSet) {
        self.tables.insert(table.into(), records);
    }
}

impl ReferenceResolver for InMemoryReferences {
    fn resolve(&self, table: &str, key_column: &str) -> Option<Vec<GeneratedValue>> {
        let records = self.tables.get(table)?;
        if !records.columns().iter().any(|column| column == key_column) {
            return None;
        }
        let mut seen = HashSet::new();
        let mut keys: Vec<GeneratedValue> = Vec::new();
        for value in records.column_values(key_column) {
            let Some(kind) = value.kind() else {
                continue;
            };
            if seen.insert((kind, value.to_text())) {
                keys.push(value);
            }
        }
        if keys.is_empty() { None } else { Some(keys) }
    }
}

/// Key lists fetched for one generation invocation, by field name.
#[derive(Debug, Default)]
pub struct ReferencePool {
    keys: BTreeMap<&'static str, Vec<GeneratedValue>>,
}

impl ReferencePool {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve every requested role once. Returns the pool and per-role usage.
    ///
    /// Roles that are not requested, unknown to the entity, or unavailable
    /// from the resolver fall back to synthesized identifiers.
    pub fn load(
        roles: &[ReferenceRole],
        requested: &BTreeMap<String, String>,
        resolver: Option<&dyn ReferenceResolver>,
    ) -> (Self, BTreeMap<&'static str, ReferenceUsage>) {
        let mut pool = Self::default();
        let mut usage = BTreeMap::new();
        for role in roles {
            let Some(table) = requested.get(role.role) else {
                continue;
            };
            let keys = resolver.and_then(|resolver| resolver.resolve(table, role.key_column));
            match keys {
                Some(keys) if !keys.is_empty() => {
                    debug!(
                        role = role.role,
                        table = %table,
                        column = role.key_column,
                        keys = keys.len(),
                        "reference keys loaded"
                    );
                    usage.insert(
                        role.role,
                        ReferenceUsage::Sampled {
                            table: table.clone(),
                            keys: keys.len(),
                        },
                    );
                    pool.keys.insert(role.field, keys);
                }
                _ => {
                    debug!(
                        role = role.role,
                        table = %table,
                        column = role.key_column,
                        "reference unavailable, synthesizing keys"
                    );
                    usage.insert(role.role, ReferenceUsage::Synthesized);
                }
            }
        }
        (pool, usage)
    }

    pub fn with_keys(mut self, field: &'static str, keys: Vec<GeneratedValue>) -> Self {
        if !keys.is_empty() {
            self.keys.insert(field, keys);
        }
        self
    }

    /// Uniform sample with replacement; `None` when no keys were loaded for `field`.
    pub fn sample(&self, field: &str, rng: &mut dyn RngCore) -> Option<GeneratedValue> {
        self.keys.get(field)?.choose(rng).cloned()
    }
}

#[cfg(test)]
mod tests {
    use datasynth_core::Row;

    use super::*;

    fn customers() -> RecordSet {
        let mut records = RecordSet::new();
        for id in ["a", "b", "a", "c"] {
            let mut row = Row::new();
            row.insert("customer_id", GeneratedValue::text(id));
            records.push(row);
        }
        records
    }

    #[test]
    fn in_memory_resolver_returns_distinct_keys_in_order() {
        let mut refs = InMemoryReferences::new();
        refs.ingest_table("customers", customers());
        let keys = refs.resolve("customers", "customer_id").expect("keys");
        assert_eq!(
            keys,
            vec![
                GeneratedValue::text("a"),
                GeneratedValue::text("b"),
                GeneratedValue::text("c")
            ]
        );
        assert!(refs.resolve("customers", "missing").is_none());
        assert!(refs.resolve("unknown", "customer_id").is_none());
    }

    #[test]
    fn in_memory_resolver_keeps_kinds_apart_on_large_tables() {
        let mut records = RecordSet::new();
        for idx in 0..30_000_i64 {
            let mut row = Row::new();
            let key = idx % 3_000;
            let value = if key % 2 == 0 {
                GeneratedValue::Int(key)
            } else {
                GeneratedValue::Text(key.to_string())
            };
            row.insert("customer_id", value);
            records.push(row);
        }
        let mut null_row = Row::new();
        null_row.insert("customer_id", GeneratedValue::Null);
        records.push(null_row);
        let mut int_row = Row::new();
        int_row.insert("customer_id", GeneratedValue::Int(1));
        records.push(int_row);

        let mut refs = InMemoryReferences::new();
        refs.ingest_table("customers", records);
        let keys = refs.resolve("customers", "customer_id").expect("keys");
        assert_eq!(keys.len(), 3_001);
        assert_eq!(keys[0], GeneratedValue::Int(0));
        assert_eq!(keys[1], GeneratedValue::text("1"));
        assert_eq!(keys[3_000], GeneratedValue::Int(1));
        assert!(!keys.contains(&GeneratedValue::Null));
    }

    #[test]
    fn empty_tables_are_unavailable() {
        let mut refs = InMemoryReferences::new();
        refs.ingest_table("customers", RecordSet::new());
        assert!(refs.resolve("customers", "customer_id").is_none());
    }
}
