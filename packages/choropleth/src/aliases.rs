//! Compile-time registry of geometry-name aliases.
//!
//! The geometry files and the aggregation API name some regions differently
//! (`"Comunidad de Madrid"` vs `"CCAA 13 Madrid"`). Known mismatches are
//! listed per level in TOML files under `aliases/`, embedded at compile time
//! and parsed once on first use.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crime_atlas_crime_models::GeoLevel;
use serde::Deserialize;

/// Read-only mapping from a geometry display name to a canonical key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AliasTable {
    /// Level whose geometry names these aliases apply to.
    pub level: Option<GeoLevel>,
    /// Geometry display name → canonical key.
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    /// Builds a table from explicit pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(level: Option<GeoLevel>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            level,
            aliases: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the embedded table for `level`, or an empty table when the
    /// level has no known mismatches.
    #[must_use]
    pub fn for_level(level: GeoLevel) -> &'static Self {
        ALIAS_TABLES
            .iter()
            .find(|t| t.level == Some(level))
            .unwrap_or(&EMPTY)
    }

    /// Canonical key for a geometry display name.
    #[must_use]
    pub fn get(&self, display_name: &str) -> Option<&str> {
        self.aliases.get(display_name).map(String::as_str)
    }

    /// Number of aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether the table has no aliases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const ALIAS_TOMLS: &[(&str, &str)] = &[("ccaa", include_str!("../aliases/ccaa.toml"))];

static EMPTY: AliasTable = AliasTable {
    level: None,
    aliases: BTreeMap::new(),
};

/// # Panics
///
/// Panics on first access if an embedded TOML file is malformed.
static ALIAS_TABLES: LazyLock<Vec<AliasTable>> = LazyLock::new(|| {
    ALIAS_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse alias table '{name}': {e}"))
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_table_is_embedded() {
        let table = AliasTable::for_level(GeoLevel::Region);
        assert_eq!(table.level, Some(GeoLevel::Region));
        assert_eq!(table.len(), 19);
        assert_eq!(table.get("Comunidad de Madrid"), Some("MADRID"));
        assert_eq!(table.get("Cataluña/Catalunya"), Some("CATALUÑA"));
    }

    #[test]
    fn other_levels_have_empty_tables() {
        for level in [GeoLevel::National, GeoLevel::Province, GeoLevel::Municipality] {
            assert!(AliasTable::for_level(level).is_empty(), "{level:?}");
        }
    }

    #[test]
    fn alias_targets_are_canonical_keys() {
        for (name, key) in &AliasTable::for_level(GeoLevel::Region).aliases {
            assert_eq!(*key, key.to_uppercase(), "alias for {name}");
            assert!(!key.starts_with("CCAA"), "alias for {name}");
        }
    }

    #[test]
    fn every_embedded_table_parses() {
        assert_eq!(ALIAS_TABLES.len(), ALIAS_TOMLS.len());
    }
}
