//! Canonical-key lookup over a set of aggregated records.

use std::collections::BTreeMap;

use crime_atlas_crime_models::{CrimeRecord, GeoLevel};

use crate::normalize::normalize;

/// Records keyed by canonical region key, iterated in insertion order.
///
/// Insertion order matters: the substring fallback in
/// [`crate::matcher::resolve`] lets the last matching key win. Re-inserting
/// an existing key replaces its record but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionIndex {
    entries: Vec<(String, CrimeRecord)>,
    positions: BTreeMap<String, usize>,
}

impl RegionIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from API records, keying each by
    /// [`normalize`]`(record.geo, level)`.
    #[must_use]
    pub fn build(records: impl IntoIterator<Item = CrimeRecord>, level: GeoLevel) -> Self {
        let mut index = Self::new();
        for record in records {
            let key = normalize(&record.geo, level);
            index.insert(key, record);
        }
        log::debug!("Built region index with {} keys", index.len());
        index
    }

    /// Inserts or replaces the record for `key`.
    pub fn insert(&mut self, key: String, record: CrimeRecord) {
        if let Some(&pos) = self.positions.get(&key) {
            self.entries[pos].1 = record;
        } else {
            self.positions.insert(key.clone(), self.entries.len());
            self.entries.push((key, record));
        }
    }

    /// Exact key lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CrimeRecord> {
        self.positions.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Exact key lookup returning the stored key alongside the record.
    #[must_use]
    pub fn get_entry(&self, key: &str) -> Option<(&str, &CrimeRecord)> {
        self.positions.get(key).map(|&pos| {
            let (k, r) = &self.entries[pos];
            (k.as_str(), r)
        })
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Iterates `(key, record)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CrimeRecord)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    /// Iterates records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &CrimeRecord> {
        self.entries.iter().map(|(_, r)| r)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
