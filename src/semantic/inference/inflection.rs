//! Singularization for table-name matching.
//!
//! Uses the `inflector` crate with additional handling for irregular plurals
//! that show up as table and dataset names.

use inflector::Inflector;

/// Irregular plurals that inflector doesn't handle well for table names.
static IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("address", "addresses"),
    ("status", "statuses"),
    ("analysis", "analyses"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("medium", "media"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
];

/// Singularize a word, checking irregulars before falling back to inflector.
///
/// Lowercases its input; table matching is case-insensitive anyway.
///
/// # Examples
/// ```ignore
/// assert_eq!(singularize("categories"), "category");
/// assert_eq!(singularize("people"), "person");
/// assert_eq!(singularize("orders"), "order");
/// ```
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    for (singular, plural) in IRREGULAR_PLURALS {
        if lower == *plural || lower == *singular {
            return singular.to_string();
        }
    }

    lower.to_singular()
}

/// Drop exactly one trailing `s`, the literal rule used for key names.
///
/// `customers` becomes `customer`, `addresses` becomes `addresse`, and a
/// name without a trailing `s` is returned unchanged.
pub fn strip_trailing_s(word: &str) -> &str {
    word.strip_suffix('s').unwrap_or(word)
}
