//! Spanish (`es-ES`) display formatting for counts, rates and periods.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};

const MONTHS_LONG: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTHS_SHORT: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Groups thousands with `.`.
///
/// Four-digit numbers are left ungrouped, as `es-ES` does (`1234`,
/// `12.345`).
#[must_use]
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 4 {
        return digits;
    }

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Long period label, e.g. `"junio de 2024"`.
#[must_use]
pub fn month_long(date: NaiveDate) -> String {
    format!("{} de {}", MONTHS_LONG[date.month0() as usize], date.year())
}

/// Short period label, e.g. `"jun 24"`.
#[must_use]
pub fn month_short(date: NaiveDate) -> String {
    format!(
        "{} {:02}",
        MONTHS_SHORT[date.month0() as usize],
        date.year().rem_euclid(100)
    )
}

/// Sort key approximating Spanish collation: case and accents are ignored,
/// and `ñ` sorts after `n`.
#[must_use]
pub fn collation_key(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    for c in value.chars().flat_map(char::to_lowercase) {
        match c {
            'á' | 'à' | 'â' | 'ä' => key.push('a'),
            'é' | 'è' | 'ê' | 'ë' => key.push('e'),
            'í' | 'ì' | 'î' | 'ï' => key.push('i'),
            'ó' | 'ò' | 'ô' | 'ö' => key.push('o'),
            'ú' | 'ù' | 'û' | 'ü' => key.push('u'),
            'ç' => key.push('c'),
            'ñ' => {
                key.push('n');
                key.push('\u{10FFFF}');
            }
            other => key.push(other),
        }
    }
    key
}

/// Compares two labels by [`collation_key`], falling back to byte order.
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}
