//! Region label normalization.
//!
//! The API labels regions with an administrative prefix that depends on the
//! level (`"CCAA 01 Andalucía"`, `"Provincia 28 Madrid"`, `"28079 Madrid"`).
//! Joining against geometry names needs the prefix stripped and the rest
//! uppercased; pickers need the prefix stripped and the case preserved.

use std::borrow::Cow;
use std::sync::LazyLock;

use crime_atlas_crime_models::GeoLevel;
use regex::Regex;

static REGION_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CCAA [0-9]+ ").expect("valid regex"));

static PROVINCE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Provincia [0-9]+ ").expect("valid regex"));

/// Municipality labels start with the INE municipality code.
static MUNICIPALITY_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+ ").expect("valid regex"));

/// Strips the level's administrative prefix, preserving case.
///
/// Labels without the expected prefix are returned unchanged, as are all
/// national-level labels.
#[must_use]
pub fn display_name(raw_label: &str, level: GeoLevel) -> String {
    strip_prefix(raw_label, level).into_owned()
}

/// Canonical join key: the prefix-stripped label, uppercased.
#[must_use]
pub fn normalize(raw_label: &str, level: GeoLevel) -> String {
    strip_prefix(raw_label, level).to_uppercase()
}

fn strip_prefix(raw_label: &str, level: GeoLevel) -> Cow<'_, str> {
    let prefix = match level {
        GeoLevel::National => return Cow::Borrowed(raw_label),
        GeoLevel::Region => &*REGION_PREFIX_RE,
        GeoLevel::Province => &*PROVINCE_PREFIX_RE,
        GeoLevel::Municipality => &*MUNICIPALITY_PREFIX_RE,
    };
    prefix.replace(raw_label, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_region_label() {
        assert_eq!(normalize("CCAA 01 Andalucía", GeoLevel::Region), "ANDALUCÍA");
    }

    #[test]
    fn normalizes_province_label() {
        assert_eq!(normalize("Provincia 28 Madrid", GeoLevel::Province), "MADRID");
    }

    #[test]
    fn normalizes_municipality_label() {
        assert_eq!(normalize("28079 Madrid", GeoLevel::Municipality), "MADRID");
    }

    #[test]
    fn national_label_is_only_uppercased() {
        assert_eq!(normalize("Nacional", GeoLevel::National), "NACIONAL");
        assert_eq!(
            normalize("CCAA 01 Andalucía", GeoLevel::National),
            "CCAA 01 ANDALUCÍA"
        );
    }

    #[test]
    fn prefix_of_another_level_is_kept() {
        assert_eq!(
            normalize("Provincia 28 Madrid", GeoLevel::Region),
            "PROVINCIA 28 MADRID"
        );
    }

    #[test]
    fn only_the_leading_prefix_is_stripped() {
        assert_eq!(
            display_name("28079 28 Calle", GeoLevel::Municipality),
            "28 Calle"
        );
    }

    #[test]
    fn display_name_preserves_case() {
        assert_eq!(display_name("CCAA 09 Cataluña", GeoLevel::Region), "Cataluña");
        assert_eq!(display_name("Provincia 01 Álava", GeoLevel::Province), "Álava");
        assert_eq!(
            display_name("46250 València", GeoLevel::Municipality),
            "València"
        );
    }

    #[test]
    fn degenerate_labels_do_not_panic() {
        assert_eq!(normalize("", GeoLevel::Region), "");
        assert_eq!(normalize("CCAA 01 ", GeoLevel::Region), "");
        assert_eq!(normalize("12345", GeoLevel::Municipality), "12345");
    }
}
