//! Write-once lookup tables from record keys to byte offsets.

use std::collections::{BTreeSet, HashMap};

use log::trace;

use crate::sdf::format::scanner::ScannedRecord;
use crate::sdf::types::config::IndexConfig;
use crate::sdf::types::models::KeyKind;

/// Offsets recorded for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Offsets {
    One(u64),
    Many(BTreeSet<u64>),
}

/// Per key kind, a mapping from key value to record offsets.
///
/// `Id` and `Name` keys are unique: a repeated insert overwrites the offset.
/// `Synonym` keys accumulate every offset they were seen at.
/// The store is filled by a single indexing pass and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStore {
    tables: HashMap<KeyKind, HashMap<String, Offsets>>,
    /// Record ids in the order they were first seen.
    order: Vec<String>,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table for `kind` so it is reported by [`key_kinds`](Self::key_kinds).
    pub fn register(&mut self, kind: KeyKind) {
        self.tables.entry(kind).or_default();
    }

    pub fn insert(&mut self, kind: KeyKind, key: &str, offset: u64) {
        if kind == KeyKind::Id && !self.contains(&KeyKind::Id, key) {
            self.order.push(key.to_string());
        }
        let unique = kind.is_unique();
        let table = self.tables.entry(kind).or_default();
        if unique {
            table.insert(key.to_string(), Offsets::One(offset));
            return;
        }
        if let Some(Offsets::Many(set)) = table.get_mut(key) {
            set.insert(offset);
            return;
        }
        table.insert(key.to_string(), Offsets::Many(BTreeSet::from([offset])));
    }

    /// Indexes one scanned record under every key the configuration asks for.
    pub fn add_record(&mut self, scanned: &ScannedRecord, config: &IndexConfig) {
        let record = &scanned.record;
        let offset = scanned.offset;

        self.insert(KeyKind::Id, &record.id, offset);

        for (tag, label) in &config.names {
            if let Some(value) = record.name(tag) {
                self.insert(KeyKind::Name(label.clone()), value, offset);
            }
        }

        let synonym_sources = [config.synonym_tag.as_deref(), config.common_name_tag.as_deref()];
        for tag in synonym_sources.into_iter().flatten() {
            if let Some(raw) = record.name(tag) {
                for alias in config.normalizer.normalize(raw) {
                    self.insert(KeyKind::Synonym, &alias, offset);
                }
            }
        }

        trace!("Indexed `{}` at byte {}", record.id, offset);
    }

    /// Offsets for `key`, ascending for multi-valued kinds; empty if unknown.
    pub fn lookup(&self, kind: &KeyKind, key: &str) -> Vec<u64> {
        match self.tables.get(kind).and_then(|table| table.get(key)) {
            Some(Offsets::One(offset)) => vec![*offset],
            Some(Offsets::Many(set)) => set.iter().copied().collect(),
            None => Vec::new(),
        }
    }

    pub fn contains(&self, kind: &KeyKind, key: &str) -> bool {
        self.tables
            .get(kind)
            .map_or(false, |table| table.contains_key(key))
    }

    /// Every key kind with a table, sorted.
    pub fn key_kinds(&self) -> BTreeSet<KeyKind> {
        self.tables.keys().cloned().collect()
    }

    /// All keys of one kind, sorted.
    pub fn keys(&self, kind: &KeyKind) -> BTreeSet<&str> {
        self.tables
            .get(kind)
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// The current offset of every record id, in first-seen order.
    pub fn all_offsets(&self) -> Vec<u64> {
        self.order
            .iter()
            .flat_map(|id| self.lookup(&KeyKind::Id, id))
            .collect()
    }

    /// Record ids in first-seen order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Number of distinct record ids.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
