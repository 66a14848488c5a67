//! Extras search
//!
//! Accent- and case-insensitive filtering of an extras catalog, so that
//! `τυρι` finds `Τυρί`.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::menu::Ingredient;

/// Fold text for comparison: decompose, strip combining marks, trim,
/// lowercase and fold final sigma into sigma.
pub fn fold(text: &str) -> String {
    let stripped: String = text.nfd().filter(|c| !is_combining_mark(*c)).collect();

    stripped.trim().to_lowercase().replace('ς', "σ")
}

/// Return the ingredients whose folded name contains the folded query.
///
/// An empty (or whitespace-only) query returns every ingredient.
pub fn filter_extras<'a>(extras: &'a [Ingredient], query: &str) -> Vec<&'a Ingredient> {
    let needle = fold(query);

    if needle.is_empty() {
        return extras.iter().collect();
    }

    extras
        .iter()
        .filter(|ingredient| fold(&ingredient.name).contains(&needle))
        .collect()
}
