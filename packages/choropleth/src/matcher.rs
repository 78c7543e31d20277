//! Joins geometry features to API records by name.
//!
//! The geometry source and the aggregation API are maintained independently
//! and disagree on diacritics, abbreviations and administrative prefixes.
//! Resolution tries, in order, and stops at the first hit:
//!
//! 1. the alias table, if the aliased key is present in the index;
//! 2. an exact key match on the uppercased display name;
//! 3. bidirectional substring containment against every key.
//!
//! Step 3 is best effort. When several keys match, the one inserted last
//! wins, so the result depends on the order the API returned the rows in.
//! That tie-break is kept as-is; changing it changes which region some
//! features are colored as.

use crime_atlas_crime_models::CrimeRecord;

use crate::aliases::AliasTable;
use crate::index::RegionIndex;

/// Which resolution step produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Alias table hit.
    Alias,
    /// Exact canonical key.
    Exact,
    /// Substring containment fallback.
    Substring,
}

impl MatchKind {
    /// Lowercase name of the step.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alias => "alias",
            Self::Exact => "exact",
            Self::Substring => "substring",
        }
    }
}

/// A resolved record together with the key it was found under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionMatch<'a> {
    /// Canonical key in the index.
    pub key: &'a str,
    /// The matched record.
    pub record: &'a CrimeRecord,
    /// How the match was made.
    pub kind: MatchKind,
}

/// Resolves the record for a geometry display name.
#[must_use]
pub fn resolve<'a>(
    display_name: &str,
    index: &'a RegionIndex,
    aliases: &AliasTable,
) -> Option<&'a CrimeRecord> {
    resolve_match(display_name, index, aliases).map(|m| m.record)
}

/// Like [`resolve`], but also reports the key and the step that matched.
#[must_use]
pub fn resolve_match<'a>(
    display_name: &str,
    index: &'a RegionIndex,
    aliases: &AliasTable,
) -> Option<RegionMatch<'a>> {
    if let Some(alias) = aliases.get(display_name)
        && let Some((key, record)) = index.get_entry(alias)
    {
        return Some(RegionMatch {
            key,
            record,
            kind: MatchKind::Alias,
        });
    }

    let wanted = display_name.to_uppercase();

    if let Some((key, record)) = index.get_entry(&wanted) {
        return Some(RegionMatch {
            key,
            record,
            kind: MatchKind::Exact,
        });
    }

    let mut found = None;
    for (key, record) in index.iter() {
        if key.contains(wanted.as_str()) || wanted.contains(key) {
            found = Some(RegionMatch {
                key,
                record,
                kind: MatchKind::Substring,
            });
        }
    }

    if found.is_none() {
        log::trace!("No record for geometry '{display_name}'");
    }
    found
}
